//! 랭킹 타입.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 랭킹 엔트리.
///
/// 실행마다 새로 생성되며 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 종목 티커
    pub ticker: String,
    /// 랭킹 기준 점수
    pub score: Decimal,
    /// 순위 (1이 가장 높음)
    pub rank: u32,
}

/// WSM 랭킹 변형.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WsmVariant {
    /// 원시 점수
    #[serde(rename = "wsm")]
    Raw,
    /// 페널티 적용 점수
    #[serde(rename = "wsm_penalized")]
    Penalized,
}

impl WsmVariant {
    /// 모든 변형.
    pub const ALL: [WsmVariant; 2] = [WsmVariant::Raw, WsmVariant::Penalized];

    /// 직렬화 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            WsmVariant::Raw => "wsm",
            WsmVariant::Penalized => "wsm_penalized",
        }
    }
}

impl std::fmt::Display for WsmVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
