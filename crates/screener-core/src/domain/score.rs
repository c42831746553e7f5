//! 지표 상태 및 WSM 점수 타입.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::indicator::Category;

/// 필터링/정규화 파이프라인을 통과하는 지표 상태.
///
/// 결측과 아웃라이어 제거를 구분하여 보존하므로, 특정 기업이 왜
/// 스코어링에서 빠졌는지 추적할 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    /// 사용 가능한 값
    Available(Decimal),
    /// 원본 데이터에 없음
    Missing,
    /// IQR 필터로 제거됨
    OutlierRemoved,
}

impl IndicatorState {
    /// 사용 가능한 값이면 반환.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            IndicatorState::Available(v) => Some(*v),
            _ => None,
        }
    }

    /// 사용 가능 여부.
    pub fn is_available(&self) -> bool {
        matches!(self, IndicatorState::Available(_))
    }
}

/// 카테고리 점수.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    /// 카테고리
    pub category: Category,
    /// 가용 멤버 지표의 가중 평균 (가용 지표가 없으면 None)
    pub score: Option<Decimal>,
    /// 상위 카테고리 가중치
    pub weight: Decimal,
    /// 가용 멤버 지표 수
    pub available_indicators: usize,
}

impl CategoryScore {
    /// 이 카테고리가 종합 점수에 기여하는지 여부.
    pub fn is_available(&self) -> bool {
        self.score.is_some()
    }
}

/// 종합 점수 부재 사유.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAbsence {
    /// 가용 카테고리 가중치 합이 최소 커버리지 미달
    LowCoverage {
        /// 실제 커버리지
        coverage: Decimal,
        /// 요구 최소 커버리지
        minimum: Decimal,
    },
}

/// WSM 종합 점수.
///
/// 커버리지 재정규화 가중합으로, 원시 점수와 페널티 적용 점수를
/// 모두 포함합니다. 커버리지 미달 기업은 점수가 None이며 사유가
/// 보존됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeScore {
    /// 종목 티커
    pub ticker: String,
    /// 5개 카테고리 점수 (고정 순서)
    pub categories: Vec<CategoryScore>,
    /// 커버리지: 가용 카테고리 가중치 합 / 전체 가중치 합
    pub coverage: Decimal,
    /// 원시 종합 점수 (커버리지 미달 시 None)
    pub score: Option<Decimal>,
    /// 페널티 적용 종합 점수 (커버리지 미달 시 None)
    pub penalized_score: Option<Decimal>,
    /// 발동된 페널티 규칙의 대상 지표
    pub triggered_penalties: Vec<super::indicator::Indicator>,
    /// 점수 부재 사유
    pub absence: Option<ScoreAbsence>,
}

impl CompositeScore {
    /// 점수 산출 여부.
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    /// 특정 카테고리 점수 조회.
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_indicator_state_value() {
        assert_eq!(IndicatorState::Available(dec!(0.5)).value(), Some(dec!(0.5)));
        assert_eq!(IndicatorState::Missing.value(), None);
        assert_eq!(IndicatorState::OutlierRemoved.value(), None);
        assert!(!IndicatorState::OutlierRemoved.is_available());
    }

    #[test]
    fn test_composite_score_lookup() {
        let composite = CompositeScore {
            ticker: "TEST4".to_string(),
            categories: vec![CategoryScore {
                category: Category::Profitability,
                score: Some(dec!(0.7)),
                weight: dec!(0.30),
                available_indicators: 3,
            }],
            coverage: dec!(0.30),
            score: None,
            penalized_score: None,
            triggered_penalties: vec![],
            absence: Some(ScoreAbsence::LowCoverage {
                coverage: dec!(0.30),
                minimum: dec!(0.5),
            }),
        };

        assert!(!composite.is_scored());
        assert!(composite.category(Category::Profitability).is_some());
        assert!(composite.category(Category::Growth).is_none());
    }
}
