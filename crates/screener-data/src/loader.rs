//! 배치 로더 및 인제스트 검증.
//!
//! 데이터 제공자가 구체화해 둔 JSON 배치를 읽어 `CompanyRecord`로
//! 변환합니다. 필수 필드(티커, 양수 현재가, 서브섹터)가 깨진
//! 레코드는 실행 전체를 실패시키는 대신 레코드 단위로 탈락시키고
//! 사유와 함께 보고합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use screener_core::config::EligibilityConfig;
use screener_core::domain::{CompanyRecord, Indicator};

use crate::error::Result;

/// 구체화된 배치의 원시 레코드.
///
/// 모든 필드가 선택적이며, 검증은 변환 단계에서 수행됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCompanyRecord {
    /// 종목 티커
    #[serde(default)]
    pub ticker: Option<String>,
    /// 기업명
    #[serde(default)]
    pub name: Option<String>,
    /// 섹터
    #[serde(default)]
    pub sector: Option<String>,
    /// 서브섹터
    #[serde(default)]
    pub subsector: Option<String>,
    /// 현재가
    #[serde(default)]
    pub price: Option<Decimal>,
    /// 시가총액
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    /// 2개월 유동성 (적격성 필터 전용, 코어로 전달되지 않음)
    #[serde(default)]
    pub liquidity_2m: Option<Decimal>,
    /// 지표 이름 → 값
    #[serde(default)]
    pub indicators: BTreeMap<String, Option<Decimal>>,
}

impl RawCompanyRecord {
    fn indicator(&self, name: &str) -> Option<Decimal> {
        self.indicators.get(name).copied().flatten()
    }
}

/// 인제스트에서 탈락한 레코드 보고.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedRecord {
    /// 티커 (누락일 수 있음)
    pub ticker: Option<String>,
    /// 탈락 사유
    pub reason: String,
}

/// 배치 로드 결과.
#[derive(Debug)]
pub struct LoadedBatch {
    /// 검증을 통과한 레코드
    pub records: Vec<CompanyRecord>,
    /// 탈락 레코드 보고
    pub dropped: Vec<DroppedRecord>,
    /// 적격성 필터로 걸러진 수
    pub ineligible: usize,
}

/// 기본 적격성 필터.
///
/// 원시 배치에 대한 사전 필터로, 코어 파이프라인보다 먼저
/// 적용됩니다 (흑자, 5년 매출 성장, 최소 유동성).
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    config: EligibilityConfig,
}

impl EligibilityFilter {
    /// 설정으로부터 필터 생성.
    pub fn new(config: &EligibilityConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 적격 여부 판정.
    ///
    /// 판정에 필요한 값이 없으면 부적격으로 처리합니다.
    pub fn passes(&self, raw: &RawCompanyRecord) -> bool {
        if self.config.require_positive_earnings
            && !raw
                .indicator(Indicator::Eps.as_str())
                .is_some_and(|v| v > Decimal::ZERO)
        {
            return false;
        }

        if self.config.require_revenue_growth
            && !raw
                .indicator(Indicator::RevenueGrowth5y.as_str())
                .is_some_and(|v| v > Decimal::ZERO)
        {
            return false;
        }

        raw.liquidity_2m
            .is_some_and(|v| v >= self.config.min_liquidity)
    }
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::new(&EligibilityConfig::default())
    }
}

/// JSON 배치 파일 로드.
///
/// `eligibility`가 `Some`이면 검증 전에 적격성 필터를 적용합니다.
pub fn load_batch<P: AsRef<Path>>(
    path: P,
    eligibility: Option<&EligibilityFilter>,
) -> Result<LoadedBatch> {
    let contents = fs::read_to_string(path.as_ref())?;
    let batch = parse_batch(&contents, eligibility)?;

    info!(
        path = %path.as_ref().display(),
        loaded = batch.records.len(),
        dropped = batch.dropped.len(),
        ineligible = batch.ineligible,
        "배치 로드 완료"
    );

    Ok(batch)
}

/// JSON 문자열에서 배치 파싱.
pub fn parse_batch(contents: &str, eligibility: Option<&EligibilityFilter>) -> Result<LoadedBatch> {
    let raw_records: Vec<RawCompanyRecord> = serde_json::from_str(contents)?;

    let mut records = Vec::with_capacity(raw_records.len());
    let mut dropped = Vec::new();
    let mut ineligible = 0usize;

    for raw in raw_records {
        if let Some(filter) = eligibility {
            if !filter.passes(&raw) {
                ineligible += 1;
                continue;
            }
        }

        match convert(raw) {
            Ok(record) => records.push(record),
            Err(report) => {
                warn!(ticker = ?report.ticker, reason = %report.reason, "레코드 탈락");
                dropped.push(report);
            }
        }
    }

    Ok(LoadedBatch {
        records,
        dropped,
        ineligible,
    })
}

/// 원시 레코드를 검증하여 도메인 레코드로 변환.
fn convert(raw: RawCompanyRecord) -> std::result::Result<CompanyRecord, DroppedRecord> {
    let ticker = match raw.ticker.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_uppercase(),
        _ => {
            return Err(DroppedRecord {
                ticker: raw.ticker.clone(),
                reason: "티커 누락".to_string(),
            })
        }
    };

    let price = match raw.price {
        Some(p) if p > Decimal::ZERO => p,
        Some(_) => {
            return Err(DroppedRecord {
                ticker: Some(ticker),
                reason: "현재가가 0 이하".to_string(),
            })
        }
        None => {
            return Err(DroppedRecord {
                ticker: Some(ticker),
                reason: "현재가 누락".to_string(),
            })
        }
    };

    let subsector = match raw.subsector.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            return Err(DroppedRecord {
                ticker: Some(ticker),
                reason: "서브섹터 누락".to_string(),
            })
        }
    };

    let mut indicators = BTreeMap::new();
    for (name, value) in &raw.indicators {
        let Some(value) = value else {
            continue;
        };

        match name.parse::<Indicator>() {
            Ok(indicator) => {
                indicators.insert(indicator, *value);
            }
            Err(_) => {
                warn!(ticker = %ticker, indicator = %name, "알 수 없는 지표, 무시");
            }
        }
    }

    Ok(CompanyRecord {
        name: raw.name.unwrap_or_else(|| ticker.clone()),
        sector: raw.sector.unwrap_or_default(),
        subsector,
        ticker,
        price,
        market_cap: raw.market_cap,
        indicators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(ticker: Option<&str>, price: Option<Decimal>, subsector: Option<&str>) -> RawCompanyRecord {
        RawCompanyRecord {
            ticker: ticker.map(str::to_string),
            subsector: subsector.map(str::to_string),
            price,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record_conversion() {
        let mut record = raw(Some("petr4"), Some(dec!(32.5)), Some("Exploração"));
        record
            .indicators
            .insert("eps".to_string(), Some(dec!(4.2)));
        record.indicators.insert("roe".to_string(), None);

        let company = convert(record).unwrap();

        assert_eq!(company.ticker, "PETR4");
        assert_eq!(company.price, dec!(32.5));
        assert_eq!(company.indicator(Indicator::Eps), Some(dec!(4.2)));
        // null 값은 결측으로 유지
        assert_eq!(company.indicator(Indicator::Roe), None);
    }

    #[test]
    fn test_malformed_records_are_dropped_with_reason() {
        assert!(convert(raw(None, Some(dec!(10)), Some("X"))).is_err());
        assert!(convert(raw(Some("  "), Some(dec!(10)), Some("X"))).is_err());
        assert!(convert(raw(Some("AAA3"), None, Some("X"))).is_err());
        assert!(convert(raw(Some("AAA3"), Some(dec!(0)), Some("X"))).is_err());
        assert!(convert(raw(Some("AAA3"), Some(dec!(-1)), Some("X"))).is_err());
        assert!(convert(raw(Some("AAA3"), Some(dec!(10)), None)).is_err());

        let dropped = convert(raw(Some("AAA3"), Some(dec!(-1)), Some("X"))).unwrap_err();
        assert_eq!(dropped.ticker.as_deref(), Some("AAA3"));
        assert_eq!(dropped.reason, "현재가가 0 이하");
    }

    #[test]
    fn test_unknown_indicator_skipped_record_kept() {
        let mut record = raw(Some("AAA3"), Some(dec!(10)), Some("Varejo"));
        record
            .indicators
            .insert("mystery_metric".to_string(), Some(dec!(1)));
        record
            .indicators
            .insert("roe".to_string(), Some(dec!(12)));

        let company = convert(record).unwrap();

        assert_eq!(company.indicators.len(), 1);
        assert_eq!(company.indicator(Indicator::Roe), Some(dec!(12)));
    }

    #[test]
    fn test_parse_batch_continues_after_bad_record() {
        let json = r#"[
            {"ticker": "AAA3", "subsector": "Varejo", "price": 10,
             "indicators": {"eps": 2.0}},
            {"subsector": "Varejo", "price": 10},
            {"ticker": "CCC3", "subsector": "Varejo", "price": -5}
        ]"#;

        let batch = parse_batch(json, None).unwrap();

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].ticker, "AAA3");
        assert_eq!(batch.dropped.len(), 2);
    }

    #[test]
    fn test_eligibility_filter() {
        let filter = EligibilityFilter::default();

        let mut eligible = raw(Some("AAA3"), Some(dec!(10)), Some("Varejo"));
        eligible.liquidity_2m = Some(dec!(5_000_000));
        eligible
            .indicators
            .insert("eps".to_string(), Some(dec!(2)));
        eligible
            .indicators
            .insert("revenue_growth_5y".to_string(), Some(dec!(4)));
        assert!(filter.passes(&eligible));

        // 적자 기업
        let mut loss_maker = eligible.clone();
        loss_maker
            .indicators
            .insert("eps".to_string(), Some(dec!(-1)));
        assert!(!filter.passes(&loss_maker));

        // 역성장
        let mut shrinking = eligible.clone();
        shrinking
            .indicators
            .insert("revenue_growth_5y".to_string(), Some(dec!(-2)));
        assert!(!filter.passes(&shrinking));

        // 유동성 미달
        let mut illiquid = eligible.clone();
        illiquid.liquidity_2m = Some(dec!(500_000));
        assert!(!filter.passes(&illiquid));

        // 판정 데이터 누락 → 부적격
        let mut unknown = eligible.clone();
        unknown.liquidity_2m = None;
        assert!(!filter.passes(&unknown));
    }

    #[test]
    fn test_parse_batch_with_eligibility() {
        let json = r#"[
            {"ticker": "AAA3", "subsector": "Varejo", "price": 10, "liquidity_2m": 2000000,
             "indicators": {"eps": 2.0, "revenue_growth_5y": 5.0}},
            {"ticker": "BBB3", "subsector": "Varejo", "price": 10, "liquidity_2m": 2000000,
             "indicators": {"eps": -2.0, "revenue_growth_5y": 5.0}}
        ]"#;

        let filter = EligibilityFilter::default();
        let batch = parse_batch(json, Some(&filter)).unwrap();

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.ineligible, 1);
        assert!(batch.dropped.is_empty());
    }
}
