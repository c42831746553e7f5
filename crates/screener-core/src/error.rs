//! 스크리닝 시스템의 에러 타입.
//!
//! 메소돌로지 계산 실패는 에러가 아니라 결과 데이터(무효 결과)로 표현됩니다.
//! 여기의 에러 타입은 설정/입력 경계에서만 사용됩니다.

use thiserror::Error;

/// 핵심 스크리너 에러.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 스크리닝 작업을 위한 Result 타입.
pub type ScreenerResult<T> = Result<T, ScreenerError>;

impl From<serde_json::Error> for ScreenerError {
    fn from(err: serde_json::Error) -> Self {
        ScreenerError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for ScreenerError {
    fn from(err: config::ConfigError) -> Self {
        ScreenerError::Config(err.to_string())
    }
}
