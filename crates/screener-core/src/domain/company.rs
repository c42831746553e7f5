//! 기업 레코드.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::indicator::Indicator;

/// 기업 레코드.
///
/// 한 번의 분석 실행 동안 불변이며, 파이프라인이 소유합니다.
/// 지표 맵은 `BTreeMap`으로 순회 순서가 결정적입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// 종목 티커
    pub ticker: String,
    /// 기업명
    pub name: String,
    /// 섹터
    pub sector: String,
    /// 서브섹터 (상대 평가 및 아웃라이어 탐지 범위)
    pub subsector: String,
    /// 현재가 (인제스트 검증 후 항상 양수)
    pub price: Decimal,
    /// 시가총액
    pub market_cap: Option<Decimal>,
    /// 원시 펀더멘털 지표
    pub indicators: BTreeMap<Indicator, Decimal>,
}

impl CompanyRecord {
    /// 지표 값 조회.
    pub fn indicator(&self, indicator: Indicator) -> Option<Decimal> {
        self.indicators.get(&indicator).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_indicator_lookup() {
        let mut indicators = BTreeMap::new();
        indicators.insert(Indicator::Eps, dec!(2));

        let company = CompanyRecord {
            ticker: "PETR4".to_string(),
            name: "Petrobras".to_string(),
            sector: "Petróleo".to_string(),
            subsector: "Exploração".to_string(),
            price: dec!(20),
            market_cap: Some(dec!(100_000_000)),
            indicators,
        };

        assert_eq!(company.indicator(Indicator::Eps), Some(dec!(2)));
        assert_eq!(company.indicator(Indicator::Pbr), None);
    }
}
