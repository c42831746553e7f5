//! min-max 지표 정규화.
//!
//! 필터링 후 표본을 기준으로 (서브섹터, 지표) 쌍마다 값을 [0, 1]
//! 범위로 재조정합니다. 낮을수록 좋은 지표는 방향을 뒤집어 1이 항상
//! 최선이 되게 합니다. 그룹 분산이 0이면 0 나눗셈 대신 중앙값 0.5로
//! 정규화합니다.
//!
//! 결측/아웃라이어 상태는 그대로 통과하며 0으로 취급되지 않습니다.
//! 필터링된 데이터셋에 대한 순수 함수이므로 같은 입력에 다시 실행해도
//! 동일한 출력을 냅니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use screener_core::domain::{Direction, Indicator, IndicatorState};

use crate::sector::{IndicatorDataset, SectorGroups};

/// min-max 정규화기.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxNormalizer;

impl MinMaxNormalizer {
    /// 새 정규화기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 서브섹터 그룹 기준으로 전체 데이터셋 정규화.
    pub fn normalize(
        &self,
        groups: &SectorGroups<'_>,
        filtered: &IndicatorDataset,
    ) -> IndicatorDataset {
        let mut normalized = IndicatorDataset::default();

        for (_, members) in groups.iter() {
            for indicator in Indicator::scored() {
                let Some(policy) = indicator.policy() else {
                    continue;
                };

                let values: Vec<Decimal> = members
                    .iter()
                    .filter_map(|c| filtered.available(&c.ticker, indicator))
                    .collect();

                let bounds = match (values.iter().min(), values.iter().max()) {
                    (Some(min), Some(max)) => Some((*min, *max)),
                    _ => None,
                };

                for company in members {
                    let state = match filtered.state(&company.ticker, indicator) {
                        IndicatorState::Available(value) => {
                            let (min, max) = bounds.unwrap_or((value, value));
                            IndicatorState::Available(scale(value, min, max, policy.direction))
                        }
                        other => other,
                    };

                    normalized.insert(&company.ticker, indicator, state);
                }
            }
        }

        normalized
    }
}

/// 단일 값 스케일링.
fn scale(value: Decimal, min: Decimal, max: Decimal, direction: Direction) -> Decimal {
    let range = max - min;
    if range <= Decimal::ZERO {
        return dec!(0.5);
    }

    let scaled = (value - min) / range;
    match direction {
        Direction::HigherBetter => scaled,
        Direction::LowerBetter => Decimal::ONE - scaled,
    }
}
