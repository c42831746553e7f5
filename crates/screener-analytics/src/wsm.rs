//! WSM(Weighted Sum Model) 종합 스코어러.
//!
//! 정규화된 지표를 5개 카테고리로 집계한 뒤 상위 가중치로 합산합니다.
//!
//! # 커버리지 재정규화
//!
//! 가용 지표가 하나도 없는 카테고리는 null이 되고, 그 상위 가중치는
//! 가중합의 분모에서 제외됩니다. 섹터 구조상 카테고리 전체가 없는
//! 기업(예: 금융업)을 0점 취급으로 부당하게 깎는 대신, 남은
//! 카테고리에 비례 재배분합니다.
//!
//! 커버리지(가용 카테고리 가중치 비율)가 최소 임계값 미만이면 종합
//! 점수 자체를 산출하지 않습니다. 이것이 특정 섹터가 WSM 랭킹에서
//! 빠지는 공식 규칙입니다.
//!
//! # 페널티 변형
//!
//! 설정된 레드 플래그 규칙(음수 EBIT/자산, 과도한 레버리지 등)이
//! 원시 지표 값에서 발동하면 점수에 곱셈 계수를 적용합니다. 복수
//! 발동 시 복리이며 하한은 0입니다.

use rust_decimal::Decimal;

use screener_core::config::WsmConfig;
use screener_core::domain::{
    Category, CategoryScore, CompanyRecord, CompositeScore, Indicator, ScoreAbsence,
};

use crate::sector::IndicatorDataset;

/// WSM 스코어러.
#[derive(Debug, Clone)]
pub struct WsmScorer {
    config: WsmConfig,
}

impl WsmScorer {
    /// 설정으로부터 스코어러 생성.
    pub fn new(config: &WsmConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 단일 기업의 종합 점수 계산.
    ///
    /// 중간 점수는 실수 그대로 유지되며 표시 전까지 반올림하지
    /// 않습니다.
    pub fn score(&self, company: &CompanyRecord, normalized: &IndicatorDataset) -> CompositeScore {
        let categories: Vec<CategoryScore> = Category::ALL
            .iter()
            .map(|category| self.category_score(*category, company, normalized))
            .collect();

        let total_weight: Decimal = categories.iter().map(|c| c.weight).sum();
        let available_weight: Decimal = categories
            .iter()
            .filter(|c| c.is_available())
            .map(|c| c.weight)
            .sum();

        let coverage = if total_weight > Decimal::ZERO {
            available_weight / total_weight
        } else {
            Decimal::ZERO
        };

        if coverage < self.config.min_coverage {
            return CompositeScore {
                ticker: company.ticker.clone(),
                categories,
                coverage,
                score: None,
                penalized_score: None,
                triggered_penalties: vec![],
                absence: Some(ScoreAbsence::LowCoverage {
                    coverage,
                    minimum: self.config.min_coverage,
                }),
            };
        }

        // 가용 카테고리로 재정규화된 가중합
        let weighted_sum: Decimal = categories
            .iter()
            .filter_map(|c| c.score.map(|s| s * c.weight))
            .sum();
        let raw_score = weighted_sum / available_weight;

        let (penalized_score, triggered_penalties) = self.apply_penalties(raw_score, company);

        CompositeScore {
            ticker: company.ticker.clone(),
            categories,
            coverage,
            score: Some(raw_score),
            penalized_score: Some(penalized_score),
            triggered_penalties,
            absence: None,
        }
    }

    /// 카테고리 점수: 가용 멤버 지표의 가중 평균.
    fn category_score(
        &self,
        category: Category,
        company: &CompanyRecord,
        normalized: &IndicatorDataset,
    ) -> CategoryScore {
        let mut weighted_sum = Decimal::ZERO;
        let mut weight_sum = Decimal::ZERO;
        let mut available = 0usize;

        for indicator in Indicator::members_of(category) {
            let Some(policy) = indicator.policy() else {
                continue;
            };

            if let Some(value) = normalized.available(&company.ticker, indicator) {
                weighted_sum += value * policy.weight;
                weight_sum += policy.weight;
                available += 1;
            }
        }

        let score = if available > 0 {
            Some(weighted_sum / weight_sum)
        } else {
            None
        };

        CategoryScore {
            category,
            score,
            weight: category.weight(),
            available_indicators: available,
        }
    }

    /// 페널티 규칙 적용 (원시 지표 값 기준).
    fn apply_penalties(&self, raw_score: Decimal, company: &CompanyRecord) -> (Decimal, Vec<Indicator>) {
        let mut penalized = raw_score;
        let mut triggered = Vec::new();

        for rule in &self.config.penalties {
            if let Some(value) = company.indicator(rule.indicator) {
                if rule.triggered(value) {
                    penalized *= rule.factor;
                    triggered.push(rule.indicator);
                }
            }
        }

        (penalized.max(Decimal::ZERO), triggered)
    }
}

impl Default for WsmScorer {
    fn default() -> Self {
        Self::new(&WsmConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use screener_core::domain::IndicatorState;
    use std::collections::BTreeMap;

    fn company(ticker: &str, indicators: &[(Indicator, Decimal)]) -> CompanyRecord {
        CompanyRecord {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            sector: "Setor".to_string(),
            subsector: "Subsetor".to_string(),
            price: dec!(10),
            market_cap: None,
            indicators: indicators.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    fn dataset(ticker: &str, values: &[(Indicator, Decimal)]) -> IndicatorDataset {
        let mut dataset = IndicatorDataset::default();
        for (indicator, value) in values {
            dataset.insert(ticker, *indicator, IndicatorState::Available(*value));
        }
        dataset
    }

    #[test]
    fn test_category_score_is_weighted_mean() {
        let scorer = WsmScorer::default();
        let company = company("TEST4", &[]);
        // 수익성: ROE 0.09, ROIC 0.08만 가용
        let normalized = dataset(
            "TEST4",
            &[(Indicator::Roe, dec!(1)), (Indicator::Roic, dec!(0.5))],
        );

        let composite = scorer.score(&company, &normalized);
        let profitability = composite.category(Category::Profitability).unwrap();

        // (1×0.09 + 0.5×0.08) / 0.17 = 0.13/0.17
        let expected = dec!(0.13) / dec!(0.17);
        assert_eq!(profitability.score, Some(expected));
        assert_eq!(profitability.available_indicators, 2);
    }

    #[test]
    fn test_empty_category_is_null_not_zero() {
        let scorer = WsmScorer::default();
        let company = company("TEST4", &[]);
        let normalized = dataset("TEST4", &[(Indicator::Roe, dec!(0.8))]);

        let composite = scorer.score(&company, &normalized);

        let growth = composite.category(Category::Growth).unwrap();
        assert_eq!(growth.score, None);
        assert_eq!(growth.available_indicators, 0);
    }

    #[test]
    fn test_coverage_renormalization_excludes_missing_categories() {
        let scorer = WsmScorer::default();
        let company = company("TEST4", &[]);
        // 전통(0.20) + 수익성(0.30) + 고급(0.20) 가용 → 커버리지 0.70
        let normalized = dataset(
            "TEST4",
            &[
                (Indicator::Per, dec!(0.6)),
                (Indicator::Pbr, dec!(0.6)),
                (Indicator::EvEbitda, dec!(0.6)),
                (Indicator::DividendYield, dec!(0.6)),
                (Indicator::Roe, dec!(0.4)),
                (Indicator::Roic, dec!(0.4)),
                (Indicator::NetMargin, dec!(0.4)),
                (Indicator::EbitMargin, dec!(0.4)),
                (Indicator::GrahamMargin, dec!(0.9)),
                (Indicator::BarsiMargin, dec!(0.9)),
            ],
        );

        let composite = scorer.score(&company, &normalized);

        assert_eq!(composite.coverage, dec!(0.70));
        // 재정규화: (0.6×0.20 + 0.4×0.30 + 0.9×0.20) / 0.70
        let expected = (dec!(0.6) * dec!(0.20) + dec!(0.4) * dec!(0.30) + dec!(0.9) * dec!(0.20))
            / dec!(0.70);
        assert_eq!(composite.score, Some(expected));
    }

    #[test]
    fn test_low_coverage_yields_absent_score() {
        let scorer = WsmScorer::default();
        let company = company("BANK3", &[]);
        // 수익성(0.30)만 가용 → 커버리지 0.30 < 0.50
        let normalized = dataset(
            "BANK3",
            &[(Indicator::Roe, dec!(0.9)), (Indicator::Roic, dec!(0.9))],
        );

        let composite = scorer.score(&company, &normalized);

        assert!(!composite.is_scored());
        assert_eq!(composite.penalized_score, None);
        assert_eq!(composite.coverage, dec!(0.30));
        assert_eq!(
            composite.absence,
            Some(ScoreAbsence::LowCoverage {
                coverage: dec!(0.30),
                minimum: dec!(0.5),
            })
        );
    }

    #[test]
    fn test_coverage_at_threshold_is_scored() {
        let scorer = WsmScorer::default();
        let company = company("TEST4", &[]);
        // 성장(0.15) + 건전성(0.15) + 고급(0.20) = 커버리지 정확히 0.50
        let normalized = dataset(
            "TEST4",
            &[
                (Indicator::Eps, dec!(0.5)),
                (Indicator::EbitAssets, dec!(0.5)),
                (Indicator::GrahamMargin, dec!(0.5)),
            ],
        );

        let composite = scorer.score(&company, &normalized);

        assert_eq!(composite.coverage, dec!(0.50));
        assert!(composite.is_scored());
    }

    #[test]
    fn test_partial_advanced_category_still_scores() {
        // Graham 무효 기업도 Barsi 마진만으로 고급 카테고리 점수 산출
        let scorer = WsmScorer::default();
        let company = company("TEST4", &[]);
        let normalized = dataset("TEST4", &[(Indicator::BarsiMargin, dec!(0.7))]);

        let composite = scorer.score(&company, &normalized);
        let advanced = composite.category(Category::AdvancedValuation).unwrap();

        assert_eq!(advanced.score, Some(dec!(0.7)));
        assert_eq!(advanced.available_indicators, 1);
    }

    #[test]
    fn test_penalties_compound_multiplicatively() {
        let scorer = WsmScorer::default();
        // 레드 플래그 2건: EBIT/자산 음수(×0.85), 부채/자본 > 2(×0.90)
        let company = company(
            "RISK3",
            &[
                (Indicator::EbitAssets, dec!(-0.05)),
                (Indicator::DebtEquity, dec!(3)),
            ],
        );
        let normalized = dataset(
            "RISK3",
            &[
                (Indicator::Eps, dec!(0.8)),
                (Indicator::EbitAssets, dec!(0.2)),
                (Indicator::GrahamMargin, dec!(0.6)),
            ],
        );

        let composite = scorer.score(&company, &normalized);

        let raw = composite.score.unwrap();
        let penalized = composite.penalized_score.unwrap();
        assert_eq!(penalized, raw * dec!(0.85) * dec!(0.90));
        assert_eq!(
            composite.triggered_penalties,
            vec![Indicator::EbitAssets, Indicator::DebtEquity]
        );
    }

    #[test]
    fn test_no_triggered_penalties_keeps_score() {
        let scorer = WsmScorer::default();
        let company = company(
            "SAFE3",
            &[
                (Indicator::EbitAssets, dec!(0.1)),
                (Indicator::DebtEquity, dec!(0.5)),
            ],
        );
        let normalized = dataset(
            "SAFE3",
            &[
                (Indicator::Eps, dec!(0.8)),
                (Indicator::EbitAssets, dec!(0.2)),
                (Indicator::GrahamMargin, dec!(0.6)),
            ],
        );

        let composite = scorer.score(&company, &normalized);

        assert_eq!(composite.penalized_score, composite.score);
        assert!(composite.triggered_penalties.is_empty());
    }
}
