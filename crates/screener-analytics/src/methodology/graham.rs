//! Benjamin Graham 메소돌로지.
//!
//! Graham Number를 적정가(천장가)로 사용합니다:
//!
//! ```text
//! 적정가 = √(22.5 × EPS × BPS)
//! ```
//!
//! EPS와 BPS가 모두 양수일 때만 정의됩니다. 음수 피제곱근을 복소수나
//! 음수 적정가로 계산하는 일은 없습니다.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use screener_core::domain::{
    CompanyRecord, Indicator, InvalidReason, MethodologyKind, MethodologyResult,
};

use super::Methodology;
use crate::sector::SectorContext;

/// Graham Number 배수 (15 P/E × 1.5 P/B).
const GRAHAM_MULTIPLIER: Decimal = dec!(22.5);

/// Graham 계산기.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrahamCalculator;

impl GrahamCalculator {
    /// 새 계산기 생성.
    pub fn new() -> Self {
        Self
    }
}

impl Methodology for GrahamCalculator {
    fn kind(&self) -> MethodologyKind {
        MethodologyKind::Graham
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

        let bps = match company.indicator(Indicator::Bps) {
            None => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::MissingInput(Indicator::Bps),
                )
            }
            Some(v) if v <= Decimal::ZERO => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::NonPositiveInput(Indicator::Bps),
                )
            }
            Some(v) => v,
        };

        match (GRAHAM_MULTIPLIER * eps * bps).sqrt() {
            Some(fair_value) if fair_value > Decimal::ZERO => {
                MethodologyResult::valid(ticker, kind, price, fair_value)
            }
            _ => MethodologyResult::invalid(ticker, kind, price, InvalidReason::NonRealResult),
        }
    }
}
