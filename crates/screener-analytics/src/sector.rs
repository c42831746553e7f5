//! 서브섹터 그룹핑 및 섹터 범위 통계.
//!
//! 모든 섹터 통계는 암묵적 전역 상태가 아니라 명시적 그룹핑 키
//! (서브섹터)로 계산되며, 스코어링 전에 불변 아티팩트로 완성됩니다.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use screener_core::config::PerDiscountConfig;
use screener_core::domain::{CompanyRecord, Indicator, IndicatorState};

use crate::outlier::OutlierFilter;

/// 서브섹터별 기업 그룹.
///
/// `BTreeMap` 키로 그룹 순회 순서가 결정적입니다. 서브섹터 그룹은
/// 서로 겹치지 않습니다.
#[derive(Debug)]
pub struct SectorGroups<'a> {
    groups: BTreeMap<String, Vec<&'a CompanyRecord>>,
}

impl<'a> SectorGroups<'a> {
    /// 레코드를 서브섹터로 그룹핑.
    pub fn build(records: &'a [CompanyRecord]) -> Self {
        let mut groups: BTreeMap<String, Vec<&'a CompanyRecord>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.subsector.clone())
                .or_default()
                .push(record);
        }

        Self { groups }
    }

    /// (서브섹터, 멤버) 순회.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a CompanyRecord])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// 서브섹터 수.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// 비어 있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// 아웃라이어 필터링을 통과한 지표 상태 데이터셋 (정규화 전 원시 값).
///
/// 결측/아웃라이어 제거 여부를 `IndicatorState`로 보존합니다.
#[derive(Debug, Clone, Default)]
pub struct IndicatorDataset {
    states: BTreeMap<String, BTreeMap<Indicator, IndicatorState>>,
}

impl IndicatorDataset {
    /// 그룹별로 아웃라이어 필터를 적용하여 데이터셋 구축.
    ///
    /// (서브섹터, 지표) 쌍마다 독립적으로 펜스를 계산합니다. 필터
    /// 면제 지표(파생 마진)는 그대로 통과합니다.
    pub fn build(groups: &SectorGroups<'_>, filter: &OutlierFilter) -> Self {
        let mut states: BTreeMap<String, BTreeMap<Indicator, IndicatorState>> = BTreeMap::new();

        for (_, members) in groups.iter() {
            for indicator in Indicator::scored() {
                let Some(policy) = indicator.policy() else {
                    continue;
                };

                let fence = if policy.outlier_filtered {
                    let values: Vec<Decimal> = members
                        .iter()
                        .filter_map(|c| c.indicator(indicator))
                        .collect();
                    filter.fence(&values)
                } else {
                    None
                };

                for company in members {
                    let state = match company.indicator(indicator) {
                        None => IndicatorState::Missing,
                        Some(value) => match fence {
                            Some(f) if !f.contains(value) => IndicatorState::OutlierRemoved,
                            _ => IndicatorState::Available(value),
                        },
                    };

                    states
                        .entry(company.ticker.clone())
                        .or_default()
                        .insert(indicator, state);
                }
            }
        }

        Self { states }
    }

    /// 지표 상태 조회 (미등록은 결측으로 간주).
    pub fn state(&self, ticker: &str, indicator: Indicator) -> IndicatorState {
        self.states
            .get(ticker)
            .and_then(|m| m.get(&indicator))
            .copied()
            .unwrap_or(IndicatorState::Missing)
    }

    /// 사용 가능한 값 조회.
    pub fn available(&self, ticker: &str, indicator: Indicator) -> Option<Decimal> {
        self.state(ticker, indicator).value()
    }

    /// 지표 상태 설정 (파생 마진 주입용).
    pub fn insert(&mut self, ticker: &str, indicator: Indicator, state: IndicatorState) {
        self.states
            .entry(ticker.to_string())
            .or_default()
            .insert(indicator, state);
    }

    /// 특정 기업의 전체 지표 상태.
    pub fn states_for(&self, ticker: &str) -> BTreeMap<Indicator, IndicatorState> {
        self.states.get(ticker).cloned().unwrap_or_default()
    }
}

/// 서브섹터 PER 통계 (PER 할인 메소돌로지 입력).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsectorPerStats {
    /// 서브섹터 평균 PER (아웃라이어 필터링 후)
    pub mean_per: Decimal,
    /// 유효 피어 수 (필터링 후 양수 PER 보유 기업)
    pub peer_count: usize,
}

/// 섹터 컨텍스트.
///
/// 메소돌로지 계산기에 전달되는 불변 섹터 통계 묶음입니다.
/// 스코어링 전에 완성되므로 병렬화 시에도 재계산 경쟁이 없습니다.
#[derive(Debug, Clone, Default)]
pub struct SectorContext {
    per_stats: BTreeMap<String, SubsectorPerStats>,
    min_peers: usize,
}

impl SectorContext {
    /// 필터링된 데이터셋에서 서브섹터 통계 구축.
    ///
    /// 평균 PER은 모든 유효 피어가 양수 시가총액을 가질 때 시총
    /// 가중 평균, 아니면 단순 평균으로 계산합니다.
    pub fn build(
        groups: &SectorGroups<'_>,
        filtered: &IndicatorDataset,
        config: &PerDiscountConfig,
    ) -> Self {
        let mut per_stats = BTreeMap::new();

        for (subsector, members) in groups.iter() {
            let peers: Vec<(&CompanyRecord, Decimal)> = members
                .iter()
                .filter_map(|c| {
                    filtered
                        .available(&c.ticker, Indicator::Per)
                        .filter(|v| *v > Decimal::ZERO)
                        .map(|v| (*c, v))
                })
                .collect();

            if peers.is_empty() {
                continue;
            }

            let all_caps_positive = peers
                .iter()
                .all(|(c, _)| c.market_cap.is_some_and(|cap| cap > Decimal::ZERO));

            let mean_per = if peers.len() >= 2 && all_caps_positive {
                let weighted_sum: Decimal = peers
                    .iter()
                    .map(|(c, per)| per * c.market_cap.unwrap_or(Decimal::ZERO))
                    .sum();
                let total_cap: Decimal = peers
                    .iter()
                    .map(|(c, _)| c.market_cap.unwrap_or(Decimal::ZERO))
                    .sum();
                weighted_sum / total_cap
            } else {
                let sum: Decimal = peers.iter().map(|(_, per)| *per).sum();
                sum / Decimal::from(peers.len())
            };

            per_stats.insert(
                subsector.to_string(),
                SubsectorPerStats {
                    mean_per,
                    peer_count: peers.len(),
                },
            );
        }

        Self {
            per_stats,
            min_peers: config.min_peers,
        }
    }

    /// 서브섹터 PER 통계 조회.
    pub fn per_stats(&self, subsector: &str) -> Option<&SubsectorPerStats> {
        self.per_stats.get(subsector)
    }

    /// 필요한 최소 피어 수.
    pub fn min_peers(&self) -> usize {
        self.min_peers
    }
}
