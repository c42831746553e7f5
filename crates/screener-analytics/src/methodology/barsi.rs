//! Luiz Barsi 메소돌로지.
//!
//! 배당 기반 천장가를 적정가로 사용합니다:
//!
//! ```text
//! 기대 DPA = 배당성향 × EPS
//! 적정가   = DPA / 목표 배당수익률
//! ```
//!
//! 목표 배당수익률은 설정 상수입니다 (Barsi 표준 6%).

use rust_decimal::Decimal;

use screener_core::config::BarsiConfig;
use screener_core::domain::{
    CompanyRecord, Indicator, InvalidReason, MethodologyKind, MethodologyResult,
};

use super::Methodology;
use crate::sector::SectorContext;

/// Barsi 계산기.
#[derive(Debug, Clone)]
pub struct BarsiCalculator {
    desired_yield: Decimal,
}

impl BarsiCalculator {
    /// 설정으로부터 계산기 생성.
    pub fn new(config: &BarsiConfig) -> Self {
        Self {
            desired_yield: config.desired_yield,
        }
    }
}

impl Default for BarsiCalculator {
    fn default() -> Self {
        Self::new(&BarsiConfig::default())
    }
}

impl Methodology for BarsiCalculator {
    fn kind(&self) -> MethodologyKind {
        MethodologyKind::Barsi
    }

    fn compute(&self, company: &CompanyRecord, _context: &SectorContext) -> MethodologyResult {
        let kind = self.kind();
        let ticker = company.ticker.as_str();
        let price = company.price;

        let eps = match company.indicator(Indicator::Eps) {
            None => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::MissingInput(Indicator::Eps),
                )
            }
            Some(v) if v <= Decimal::ZERO => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::NonPositiveInput(Indicator::Eps),
                )
            }
            Some(v) => v,
        };

        let payout = match company.indicator(Indicator::PayoutRatio) {
            None => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::MissingInput(Indicator::PayoutRatio),
                )
            }
            Some(v) if v <= Decimal::ZERO => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::NonPositiveInput(Indicator::PayoutRatio),
                )
            }
            Some(v) => v,
        };

        // 설정 오류로 0 이하의 목표 수익률이 들어오면 0 나눗셈 대신 무효 처리
        if self.desired_yield <= Decimal::ZERO {
            return MethodologyResult::invalid(ticker, kind, price, InvalidReason::NonRealResult);
        }

        let expected_dpa = payout * eps;
        let fair_value = expected_dpa / self.desired_yield;

        MethodologyResult::valid(ticker, kind, price, fair_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn company(price: Decimal, indicators: &[(Indicator, Decimal)]) -> CompanyRecord {
        CompanyRecord {
            ticker: "TEST4".to_string(),
            name: "Test".to_string(),
            sector: "Setor".to_string(),
            subsector: "Subsetor".to_string(),
            price,
            market_cap: None,
            indicators: indicators.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_ceiling_price() {
        // 배당성향 0.70, EPS=2 → DPA=1.4, 적정가 = 1.4/0.06 ≈ 23.33
        let calculator = BarsiCalculator::default();
        let company = company(
            dec!(20),
            &[
                (Indicator::Eps, dec!(2)),
                (Indicator::PayoutRatio, dec!(0.70)),
            ],
        );

        let result = calculator.compute(&company, &SectorContext::default());

        assert!(result.is_valid());
        let fair = result.fair_value.unwrap();
        assert!((fair - dec!(23.3333)).abs() < dec!(0.001));
    }

    #[test]
    fn test_custom_desired_yield() {
        // 목표 수익률 8% → 적정가 = 1.4/0.08 = 17.5
        let calculator = BarsiCalculator::new(&BarsiConfig {
            desired_yield: dec!(0.08),
        });
        let company = company(
            dec!(20),
            &[
                (Indicator::Eps, dec!(2)),
                (Indicator::PayoutRatio, dec!(0.70)),
            ],
        );

        let result = calculator.compute(&company, &SectorContext::default());

        assert_eq!(result.fair_value, Some(dec!(17.5)));
    }

    #[test]
    fn test_non_positive_inputs_are_invalid() {
        let calculator = BarsiCalculator::default();

        let negative_eps = company(
            dec!(20),
            &[
                (Indicator::Eps, dec!(-1)),
                (Indicator::PayoutRatio, dec!(0.70)),
            ],
        );
        let result = calculator.compute(&negative_eps, &SectorContext::default());
        assert_eq!(
            result.invalid_reason,
            Some(InvalidReason::NonPositiveInput(Indicator::Eps))
        );

        let zero_payout = company(
            dec!(20),
            &[
                (Indicator::Eps, dec!(2)),
                (Indicator::PayoutRatio, Decimal::ZERO),
            ],
        );
        let result = calculator.compute(&zero_payout, &SectorContext::default());
        assert_eq!(
            result.invalid_reason,
            Some(InvalidReason::NonPositiveInput(Indicator::PayoutRatio))
        );
    }

    #[test]
    fn test_missing_payout_is_invalid() {
        let calculator = BarsiCalculator::default();
        let company = company(dec!(20), &[(Indicator::Eps, dec!(2))]);

        let result = calculator.compute(&company, &SectorContext::default());

        assert_eq!(
            result.invalid_reason,
            Some(InvalidReason::MissingInput(Indicator::PayoutRatio))
        );
    }
}
