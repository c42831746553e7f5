//! 서브섹터 PER 할인 메소돌로지.
//!
//! 기업 PER을 아웃라이어 필터링된 서브섹터 평균 PER과 비교합니다:
//!
//! ```text
//! 적정가 = 현재가 × (서브섹터 평균 PER / 기업 PER)
//! ```
//!
//! 기업 PER이 0 이하이거나, 서브섹터에 비교 가능한 유효 피어가 최소
//! 인원 미만이면 무효입니다.

use rust_decimal::Decimal;

use screener_core::domain::{
    CompanyRecord, Indicator, InvalidReason, MethodologyKind, MethodologyResult,
};

use super::Methodology;
use crate::sector::SectorContext;

/// PER 할인 계산기.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerDiscountCalculator;

impl PerDiscountCalculator {
    /// 새 계산기 생성.
    pub fn new() -> Self {
        Self
    }
}

impl Methodology for PerDiscountCalculator {
    fn kind(&self) -> MethodologyKind {
        MethodologyKind::PerDiscount
    }

    fn compute(&self, company: &CompanyRecord, context: &SectorContext) -> MethodologyResult {
        let kind = self.kind();
        let ticker = company.ticker.as_str();
        let price = company.price;

        let per = match company.indicator(Indicator::Per) {
            None => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::MissingInput(Indicator::Per),
                )
            }
            Some(v) if v <= Decimal::ZERO => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::NonPositiveInput(Indicator::Per),
                )
            }
            Some(v) => v,
        };

        let required = context.min_peers();
        let stats = match context.per_stats(&company.subsector) {
            None => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::InsufficientPeers {
                        required,
                        available: 0,
                    },
                )
            }
            Some(stats) if stats.peer_count < required => {
                return MethodologyResult::invalid(
                    ticker,
                    kind,
                    price,
                    InvalidReason::InsufficientPeers {
                        required,
                        available: stats.peer_count,
                    },
                )
            }
            Some(stats) => stats,
        };

        let fair_value = price * stats.mean_per / per;

        MethodologyResult::valid(ticker, kind, price, fair_value)
    }
}
