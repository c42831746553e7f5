//! 펀더멘털 지표 정의 및 WSM 가중치 정책 테이블.
//!
//! # 카테고리 구조 (가중치 합계 = 1.0)
//!
//! 1. **전통 밸류에이션 (20%)**: PER 0.07, PBR 0.06, EV/EBITDA 0.05, 배당수익률 0.02
//! 2. **수익성 (30%)**: ROE 0.09, ROIC 0.08, 순이익률 0.07, EBIT 마진 0.06
//! 3. **성장성 (15%)**: 매출 성장률(5y) 0.06, 이익 성장률(12m) 0.05, EPS 0.04
//! 4. **재무 건전성 (15%)**: 순부채/EBITDA 0.06, 부채/자본 0.05, EBIT/자산 0.04
//! 5. **고급 밸류에이션 (20%)**: Graham 안전마진 0.10, Barsi 안전마진 0.10
//!
//! 각 지표는 정규화 방향(높을수록/낮을수록 좋음)과 IQR 아웃라이어 필터
//! 적용 여부를 정적 정책으로 가집니다. 파생 마진 지표(Graham/Barsi)는
//! 서브섹터 통계가 아닌 개별 계산 결과이므로 필터 대상에서 제외됩니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 펀더멘털 지표.
///
/// `Ord` 파생으로 `BTreeMap` 키로 사용 가능하며, 순회 순서가
/// 결정적임을 보장합니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    // 전통 밸류에이션
    /// 주가수익비율 (P/L)
    Per,
    /// 주가순자산비율 (P/VP)
    Pbr,
    /// EV/EBITDA
    EvEbitda,
    /// 배당수익률
    DividendYield,

    // 수익성
    /// 자기자본이익률
    Roe,
    /// 투하자본이익률
    Roic,
    /// 순이익률
    NetMargin,
    /// EBIT 마진
    EbitMargin,

    // 성장성
    /// 5년 매출 성장률
    #[serde(rename = "revenue_growth_5y")]
    RevenueGrowth5y,
    /// 12개월 순이익 성장률
    #[serde(rename = "earnings_growth_12m")]
    EarningsGrowth12m,
    /// 주당순이익 (LPA)
    Eps,

    // 재무 건전성
    /// 순부채/EBITDA
    NetDebtEbitda,
    /// 총부채/자본
    DebtEquity,
    /// EBIT/총자산
    EbitAssets,

    // 고급 밸류에이션 (메소돌로지 파생 지표)
    /// Graham 안전마진 (%)
    GrahamMargin,
    /// Barsi 안전마진 (%)
    BarsiMargin,

    // 입력 전용 (스코어링 제외)
    /// 주당순자산 (VPA)
    Bps,
    /// 평균 배당성향
    PayoutRatio,
}

/// WSM 카테고리.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// 전통 밸류에이션
    TraditionalValuation,
    /// 수익성
    Profitability,
    /// 성장성
    Growth,
    /// 재무 건전성
    FinancialHealth,
    /// 고급 밸류에이션
    AdvancedValuation,
}

/// 정규화 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// 높을수록 좋음
    HigherBetter,
    /// 낮을수록 좋음
    LowerBetter,
}

/// 지표별 정적 스코어링 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPolicy {
    /// 소속 카테고리
    pub category: Category,
    /// 카테고리 내 가중치 (전체 합 = 1.0)
    pub weight: Decimal,
    /// 정규화 방향
    pub direction: Direction,
    /// IQR 아웃라이어 필터 적용 여부
    pub outlier_filtered: bool,
}

impl Indicator {
    /// 모든 지표 (정책 테이블 순서).
    pub const ALL: [Indicator; 18] = [
        Indicator::Per,
        Indicator::Pbr,
        Indicator::EvEbitda,
        Indicator::DividendYield,
        Indicator::Roe,
        Indicator::Roic,
        Indicator::NetMargin,
        Indicator::EbitMargin,
        Indicator::RevenueGrowth5y,
        Indicator::EarningsGrowth12m,
        Indicator::Eps,
        Indicator::NetDebtEbitda,
        Indicator::DebtEquity,
        Indicator::EbitAssets,
        Indicator::GrahamMargin,
        Indicator::BarsiMargin,
        Indicator::Bps,
        Indicator::PayoutRatio,
    ];

    /// 직렬화 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Per => "per",
            Indicator::Pbr => "pbr",
            Indicator::EvEbitda => "ev_ebitda",
            Indicator::DividendYield => "dividend_yield",
            Indicator::Roe => "roe",
            Indicator::Roic => "roic",
            Indicator::NetMargin => "net_margin",
            Indicator::EbitMargin => "ebit_margin",
            Indicator::RevenueGrowth5y => "revenue_growth_5y",
            Indicator::EarningsGrowth12m => "earnings_growth_12m",
            Indicator::Eps => "eps",
            Indicator::NetDebtEbitda => "net_debt_ebitda",
            Indicator::DebtEquity => "debt_equity",
            Indicator::EbitAssets => "ebit_assets",
            Indicator::GrahamMargin => "graham_margin",
            Indicator::BarsiMargin => "barsi_margin",
            Indicator::Bps => "bps",
            Indicator::PayoutRatio => "payout_ratio",
        }
    }

    /// 스코어링 정책.
    ///
    /// 입력 전용 지표(BPS, 배당성향)는 `None`을 반환합니다.
    pub fn policy(&self) -> Option<IndicatorPolicy> {
        use Category::*;
        use Direction::*;

        let policy = match self {
            Indicator::Per => (TraditionalValuation, dec!(0.07), LowerBetter, true),
            Indicator::Pbr => (TraditionalValuation, dec!(0.06), LowerBetter, true),
            Indicator::EvEbitda => (TraditionalValuation, dec!(0.05), LowerBetter, true),
            Indicator::DividendYield => (TraditionalValuation, dec!(0.02), HigherBetter, true),
            Indicator::Roe => (Profitability, dec!(0.09), HigherBetter, true),
            Indicator::Roic => (Profitability, dec!(0.08), HigherBetter, true),
            Indicator::NetMargin => (Profitability, dec!(0.07), HigherBetter, true),
            Indicator::EbitMargin => (Profitability, dec!(0.06), HigherBetter, true),
            Indicator::RevenueGrowth5y => (Growth, dec!(0.06), HigherBetter, true),
            Indicator::EarningsGrowth12m => (Growth, dec!(0.05), HigherBetter, true),
            Indicator::Eps => (Growth, dec!(0.04), HigherBetter, true),
            Indicator::NetDebtEbitda => (FinancialHealth, dec!(0.06), LowerBetter, true),
            Indicator::DebtEquity => (FinancialHealth, dec!(0.05), LowerBetter, true),
            Indicator::EbitAssets => (FinancialHealth, dec!(0.04), HigherBetter, true),
            Indicator::GrahamMargin => (AdvancedValuation, dec!(0.10), HigherBetter, false),
            Indicator::BarsiMargin => (AdvancedValuation, dec!(0.10), HigherBetter, false),
            Indicator::Bps | Indicator::PayoutRatio => return None,
        };

        let (category, weight, direction, outlier_filtered) = policy;
        Some(IndicatorPolicy {
            category,
            weight,
            direction,
            outlier_filtered,
        })
    }

    /// 스코어링 대상 지표 (정책이 있는 지표).
    pub fn scored() -> impl Iterator<Item = Indicator> {
        Self::ALL.iter().copied().filter(|i| i.policy().is_some())
    }

    /// 특정 카테고리의 멤버 지표.
    pub fn members_of(category: Category) -> impl Iterator<Item = Indicator> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |i| i.policy().map(|p| p.category) == Some(category))
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("Unknown indicator: {}", s))
    }
}

impl Category {
    /// 모든 카테고리 (상위 가중치 순서 고정).
    pub const ALL: [Category; 5] = [
        Category::TraditionalValuation,
        Category::Profitability,
        Category::Growth,
        Category::FinancialHealth,
        Category::AdvancedValuation,
    ];

    /// 직렬화 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TraditionalValuation => "traditional_valuation",
            Category::Profitability => "profitability",
            Category::Growth => "growth",
            Category::FinancialHealth => "financial_health",
            Category::AdvancedValuation => "advanced_valuation",
        }
    }

    /// 표시 레이블.
    pub fn label(&self) -> &'static str {
        match self {
            Category::TraditionalValuation => "전통 밸류에이션",
            Category::Profitability => "수익성",
            Category::Growth => "성장성",
            Category::FinancialHealth => "재무 건전성",
            Category::AdvancedValuation => "고급 밸류에이션",
        }
    }

    /// 상위 카테고리 가중치 (멤버 지표 가중치의 합).
    pub fn weight(&self) -> Decimal {
        Indicator::members_of(*self)
            .filter_map(|i| i.policy())
            .map(|p| p.weight)
            .sum()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 전체 지표 가중치 합계.
pub fn total_weight() -> Decimal {
    Category::ALL.iter().map(|c| c.weight()).sum()
}
