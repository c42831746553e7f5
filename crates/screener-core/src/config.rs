//! 설정 관리.
//!
//! IQR 배수, 최소 커버리지, 최소 서브섹터 인원 등 통계 파라미터는
//! 하드코딩 상수가 아니라 문서화된 기본값을 가진 설정 항목입니다.
//! TOML 파일과 `SCREENER__` 접두사 환경 변수에서 로드됩니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::indicator::Indicator;
use crate::error::ScreenerResult;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 분석 엔진 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 적격성 필터 설정 (데이터 협력자 측)
    #[serde(default)]
    pub eligibility: EligibilityConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 분석 엔진 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// 아웃라이어 필터 설정
    #[serde(default)]
    pub outlier: OutlierConfig,
    /// WSM 스코어러 설정
    #[serde(default)]
    pub wsm: WsmConfig,
    /// Barsi 메소돌로지 설정
    #[serde(default)]
    pub barsi: BarsiConfig,
    /// PER 할인 메소돌로지 설정
    #[serde(default)]
    pub per_discount: PerDiscountConfig,
    /// 랭킹 상위 N개 제한 (None이면 유효 전체)
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// IQR 아웃라이어 필터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutlierConfig {
    /// IQR 펜스 배수 k: [Q1 - k·IQR, Q3 + k·IQR]
    pub iqr_multiplier: Decimal,
    /// 필터링을 수행하는 최소 표본 수. 미만이면 전체 통과.
    pub min_group_size: usize,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: dec!(1.5),
            min_group_size: 3,
        }
    }
}

/// WSM 스코어러 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WsmConfig {
    /// 종합 점수 산출에 필요한 최소 커버리지 (가용 카테고리 가중치 비율)
    pub min_coverage: Decimal,
    /// 안전마진 지표 하한 클램프 (%)
    pub margin_floor_pct: Decimal,
    /// 안전마진 지표 상한 클램프 (%)
    pub margin_cap_pct: Decimal,
    /// 페널티 규칙 테이블
    #[serde(default = "default_penalty_rules")]
    pub penalties: Vec<PenaltyRule>,
}

impl Default for WsmConfig {
    fn default() -> Self {
        Self {
            min_coverage: dec!(0.5),
            margin_floor_pct: dec!(-50),
            margin_cap_pct: dec!(100),
            penalties: default_penalty_rules(),
        }
    }
}

/// 기본 페널티 규칙.
///
/// 영업 현금창출력 프록시가 음수이거나 레버리지가 과도한 기업의
/// 점수를 곱셈으로 깎습니다. 복수 발동 시 복리로 적용됩니다.
fn default_penalty_rules() -> Vec<PenaltyRule> {
    vec![
        PenaltyRule {
            indicator: Indicator::EbitAssets,
            trigger: PenaltyTrigger::Below(Decimal::ZERO),
            factor: dec!(0.85),
        },
        PenaltyRule {
            indicator: Indicator::DebtEquity,
            trigger: PenaltyTrigger::Above(dec!(2)),
            factor: dec!(0.90),
        },
        PenaltyRule {
            indicator: Indicator::NetDebtEbitda,
            trigger: PenaltyTrigger::Above(dec!(3)),
            factor: dec!(0.90),
        },
    ]
}

/// 페널티 규칙.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PenaltyRule {
    /// 평가 대상 지표 (원시 값 기준)
    pub indicator: Indicator,
    /// 발동 조건
    pub trigger: PenaltyTrigger,
    /// 곱셈 계수 (0 < factor ≤ 1)
    pub factor: Decimal,
}

/// 페널티 발동 조건.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyTrigger {
    /// 지표 값이 임계값 미만이면 발동
    Below(Decimal),
    /// 지표 값이 임계값 초과면 발동
    Above(Decimal),
}

impl PenaltyRule {
    /// 주어진 원시 지표 값에 대해 발동 여부 판정.
    pub fn triggered(&self, value: Decimal) -> bool {
        match self.trigger {
            PenaltyTrigger::Below(threshold) => value < threshold,
            PenaltyTrigger::Above(threshold) => value > threshold,
        }
    }
}

/// Barsi 메소돌로지 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BarsiConfig {
    /// 목표 배당수익률 (Barsi 표준 6%)
    pub desired_yield: Decimal,
}

impl Default for BarsiConfig {
    fn default() -> Self {
        Self {
            desired_yield: dec!(0.06),
        }
    }
}

/// PER 할인 메소돌로지 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PerDiscountConfig {
    /// 서브섹터 평균 PER 비교에 필요한 최소 유효 피어 수
    pub min_peers: usize,
}

impl Default for PerDiscountConfig {
    fn default() -> Self {
        Self { min_peers: 3 }
    }
}

/// 적격성 필터 설정.
///
/// 원시 배치에 대한 기본 적격성 필터링은 데이터 협력자의 책임이며,
/// 코어 파이프라인보다 먼저 적용됩니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EligibilityConfig {
    /// 2개월 유동성 최소값
    pub min_liquidity: Decimal,
    /// 흑자 기업만 허용 (EPS > 0)
    pub require_positive_earnings: bool,
    /// 5년 매출 성장 양수 요구
    pub require_revenue_growth: bool,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_liquidity: dec!(1_000_000),
            require_positive_earnings: true,
            require_revenue_growth: true,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> ScreenerResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SCREENER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> ScreenerResult<Self> {
        Self::load("config/default.toml")
    }
}
