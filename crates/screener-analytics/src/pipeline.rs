//! 스크리닝 파이프라인.
//!
//! 단계 순서:
//!
//! 1. 제외 목록 적용
//! 2. 서브섹터 그룹핑 + IQR 아웃라이어 필터
//! 3. 서브섹터 PER 통계 (섹터 컨텍스트)
//! 4. 메소돌로지 계산 (Graham, Barsi, PER 할인)
//! 5. 안전마진 클램프 후 고급 지표로 주입
//! 6. min-max 정규화
//! 7. WSM 종합 스코어링
//! 8. 랭킹 생성
//!
//! 모든 단계 산출물은 완성된 불변 값이므로 순차 실행에 동기화가
//! 필요 없습니다. 서브섹터 그룹이 겹치지 않고 메소돌로지가 상호
//! 독립이므로, 단계 구조를 바꾸지 않고도 병렬화할 수 있습니다.
//!
//! 동일한 입력 레코드 집합에 대해 리포트는 비트 단위로 재현됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use screener_core::config::AnalysisConfig;
use screener_core::domain::{
    CompanyRecord, CompositeScore, Indicator, IndicatorState, MethodologyKind, MethodologyResult,
    RankingEntry, WsmVariant,
};

use crate::methodology::MethodologyRegistry;
use crate::normalizer::MinMaxNormalizer;
use crate::outlier::OutlierFilter;
use crate::ranking::RankingGenerator;
use crate::sector::{IndicatorDataset, SectorContext, SectorGroups};
use crate::wsm::WsmScorer;

/// 기업별 전체 분석 결과.
///
/// 랭킹에서 제외된 기업도 여기에는 부재 사유와 함께 유지됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    /// 원본 레코드
    pub record: CompanyRecord,
    /// 메소돌로지별 결과
    pub methodology_results: BTreeMap<MethodologyKind, MethodologyResult>,
    /// WSM 종합 점수
    pub composite: CompositeScore,
    /// 정규화된 지표 상태 (진단/내보내기용)
    pub normalized: BTreeMap<Indicator, IndicatorState>,
}

/// 분석 리포트.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 생성 시각 (UTC)
    pub generated_at: DateTime<Utc>,
    /// 티커 순 전체 데이터셋
    pub companies: Vec<CompanyAnalysis>,
    /// 메소돌로지별 랭킹 (안전마진 기준)
    pub methodology_rankings: BTreeMap<MethodologyKind, Vec<RankingEntry>>,
    /// WSM 변형별 랭킹
    pub wsm_rankings: BTreeMap<WsmVariant, Vec<RankingEntry>>,
    /// 제외 목록으로 빠진 티커
    pub excluded: Vec<String>,
}

impl AnalysisReport {
    /// 특정 기업 분석 결과 조회.
    pub fn company(&self, ticker: &str) -> Option<&CompanyAnalysis> {
        self.companies.iter().find(|c| c.record.ticker == ticker)
    }
}

/// 스크리닝 파이프라인.
pub struct Screener {
    config: AnalysisConfig,
    registry: MethodologyRegistry,
}

impl Screener {
    /// 기본 메소돌로지 레지스트리로 생성.
    pub fn new(config: AnalysisConfig) -> Self {
        let registry = MethodologyRegistry::with_defaults(&config);
        Self { config, registry }
    }

    /// 커스텀 레지스트리로 생성.
    pub fn with_registry(config: AnalysisConfig, registry: MethodologyRegistry) -> Self {
        Self { config, registry }
    }

    /// 전체 분석 실행.
    ///
    /// `exclusions`의 티커는 어떤 계산에도 참여하지 않습니다.
    pub fn run(
        &self,
        records: Vec<CompanyRecord>,
        exclusions: &BTreeSet<String>,
    ) -> AnalysisReport {
        // 1. 제외 목록 적용
        let mut excluded = Vec::new();
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if exclusions.contains(&record.ticker) {
                excluded.push(record.ticker);
            } else {
                kept.push(record);
            }
        }
        excluded.sort();

        info!(
            companies = kept.len(),
            excluded = excluded.len(),
            "스크리닝 분석 시작"
        );

        // 2. 그룹핑 + 아웃라이어 필터
        let groups = SectorGroups::build(&kept);
        let filter = OutlierFilter::new(&self.config.outlier);
        let mut filtered = IndicatorDataset::build(&groups, &filter);

        for (subsector, members) in groups.iter() {
            debug!(subsector, companies = members.len(), "서브섹터 처리");
        }

        // 3. 섹터 컨텍스트 (PER 할인용 서브섹터 통계)
        let context = SectorContext::build(&groups, &filtered, &self.config.per_discount);

        // 4. 메소돌로지 계산
        let mut methodology_results: BTreeMap<String, BTreeMap<MethodologyKind, MethodologyResult>> =
            BTreeMap::new();
        for record in &kept {
            let results = methodology_results
                .entry(record.ticker.clone())
                .or_default();
            for method in self.registry.iter() {
                results.insert(method.kind(), method.compute(record, &context));
            }
        }

        // 5. 안전마진을 고급 지표로 주입 (클램프 적용)
        let floor = self.config.wsm.margin_floor_pct;
        let cap = self.config.wsm.margin_cap_pct;
        for record in &kept {
            let Some(results) = methodology_results.get(&record.ticker) else {
                continue;
            };
            for (kind, indicator) in [
                (MethodologyKind::Graham, Indicator::GrahamMargin),
                (MethodologyKind::Barsi, Indicator::BarsiMargin),
            ] {
                if let Some(margin) = results.get(&kind).and_then(|r| r.safety_margin_pct) {
                    filtered.insert(
                        &record.ticker,
                        indicator,
                        IndicatorState::Available(margin.clamp(floor, cap)),
                    );
                }
            }
        }

        // 6. 정규화
        let normalized = MinMaxNormalizer::new().normalize(&groups, &filtered);

        // 7. WSM 스코어링
        let scorer = WsmScorer::new(&self.config.wsm);
        let mut composites: BTreeMap<String, CompositeScore> = kept
            .iter()
            .map(|record| (record.ticker.clone(), scorer.score(record, &normalized)))
            .collect();

        let scored_count = composites.values().filter(|c| c.is_scored()).count();
        info!(
            scored = scored_count,
            unscored = composites.len() - scored_count,
            "WSM 스코어링 완료"
        );

        // 8. 랭킹 생성
        let generator = RankingGenerator::new(self.config.top_n);

        let mut methodology_rankings = BTreeMap::new();
        for method in self.registry.iter() {
            let kind = method.kind();
            let scored = kept.iter().map(|record| {
                let margin = methodology_results
                    .get(&record.ticker)
                    .and_then(|results| results.get(&kind))
                    .and_then(|result| result.safety_margin_pct);
                (record.ticker.clone(), margin)
            });
            methodology_rankings.insert(kind, generator.generate(scored));
        }

        let mut wsm_rankings = BTreeMap::new();
        for variant in WsmVariant::ALL {
            let scored = kept.iter().map(|record| {
                let composite = composites.get(&record.ticker);
                let score = match variant {
                    WsmVariant::Raw => composite.and_then(|c| c.score),
                    WsmVariant::Penalized => composite.and_then(|c| c.penalized_score),
                };
                (record.ticker.clone(), score)
            });
            wsm_rankings.insert(variant, generator.generate(scored));
        }

        // 9. 티커 순 전체 데이터셋
        let mut kept_sorted = kept;
        kept_sorted.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        let companies = kept_sorted
            .into_iter()
            .map(|record| {
                let ticker = record.ticker.clone();
                let results = methodology_results.remove(&ticker).unwrap_or_default();
                let composite = composites
                    .remove(&ticker)
                    .expect("kept 레코드마다 종합 점수가 계산됨");
                let states = normalized.states_for(&ticker);

                CompanyAnalysis {
                    record,
                    methodology_results: results,
                    composite,
                    normalized: states,
                }
            })
            .collect();

        info!("스크리닝 분석 완료");

        AnalysisReport {
            generated_at: Utc::now(),
            companies,
            methodology_rankings,
            wsm_rankings,
            excluded,
        }
    }
}
