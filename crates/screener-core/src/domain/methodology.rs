//! 밸류에이션 메소돌로지 결과 타입.
//!
//! 계산 불가(필수 입력 누락, 음수 입력 등)는 에러가 아니라 무효 결과로
//! 표현됩니다. 다운스트림 단계는 무효 결과를 결측 데이터로 취급합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::indicator::Indicator;

/// 밸류에이션 메소돌로지 종류.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MethodologyKind {
    /// Graham Number: √(22.5 × EPS × BPS)
    Graham,
    /// Barsi 천장가: (배당성향 × EPS) / 목표 배당수익률
    Barsi,
    /// 서브섹터 평균 PER 대비 할인
    PerDiscount,
}

impl MethodologyKind {
    /// 모든 메소돌로지.
    pub const ALL: [MethodologyKind; 3] = [
        MethodologyKind::Graham,
        MethodologyKind::Barsi,
        MethodologyKind::PerDiscount,
    ];

    /// 직렬화 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodologyKind::Graham => "graham",
            MethodologyKind::Barsi => "barsi",
            MethodologyKind::PerDiscount => "per_discount",
        }
    }
}

impl std::fmt::Display for MethodologyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 무효 결과의 원인.
///
/// 제외 사유를 보존하여 호출자가 진단할 수 있게 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// 필수 입력 지표 누락
    MissingInput(Indicator),
    /// 필수 입력 지표가 0 이하
    NonPositiveInput(Indicator),
    /// 서브섹터 유효 피어 부족
    InsufficientPeers {
        /// 필요한 최소 피어 수
        required: usize,
        /// 실제 유효 피어 수
        available: usize,
    },
    /// 실수 범위를 벗어난 계산 결과
    NonRealResult,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::MissingInput(ind) => write!(f, "입력 지표 누락: {}", ind),
            InvalidReason::NonPositiveInput(ind) => write!(f, "입력 지표가 0 이하: {}", ind),
            InvalidReason::InsufficientPeers {
                required,
                available,
            } => write!(f, "유효 피어 부족: 필요 {}개, 실제 {}개", required, available),
            InvalidReason::NonRealResult => write!(f, "실수 범위를 벗어난 계산 결과"),
        }
    }
}

/// 메소돌로지 계산 결과.
///
/// 기업당 메소돌로지당 한 번 생성되며 불변입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodologyResult {
    /// 종목 티커
    pub ticker: String,
    /// 메소돌로지 종류
    pub methodology: MethodologyKind,
    /// 현재가
    pub current_price: Decimal,
    /// 적정가 추정치 (무효 시 None)
    pub fair_value: Option<Decimal>,
    /// 안전마진 (%): (적정가 - 현재가) / 적정가 × 100
    pub safety_margin_pct: Option<Decimal>,
    /// 무효 사유 (유효 시 None)
    pub invalid_reason: Option<InvalidReason>,
}

impl MethodologyResult {
    /// 유효 결과 생성. 안전마진은 적정가 기준으로 계산됩니다.
    pub fn valid(
        ticker: impl Into<String>,
        methodology: MethodologyKind,
        current_price: Decimal,
        fair_value: Decimal,
    ) -> Self {
        let margin_pct = (fair_value - current_price) / fair_value * dec!(100);
        Self {
            ticker: ticker.into(),
            methodology,
            current_price,
            fair_value: Some(fair_value),
            safety_margin_pct: Some(margin_pct),
            invalid_reason: None,
        }
    }

    /// 무효 결과 생성.
    pub fn invalid(
        ticker: impl Into<String>,
        methodology: MethodologyKind,
        current_price: Decimal,
        reason: InvalidReason,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            methodology,
            current_price,
            fair_value: None,
            safety_margin_pct: None,
            invalid_reason: Some(reason),
        }
    }

    /// 유효 여부.
    pub fn is_valid(&self) -> bool {
        self.invalid_reason.is_none()
    }
}
