//! 서브섹터 단위 IQR 아웃라이어 필터.
//!
//! (서브섹터, 지표) 쌍마다 독립적으로 사분위수 펜스를 계산하여
//! 통계적 극단값을 제거합니다. 한 지표에서 제거된 기업이 다른
//! 지표에서도 제거되는 것은 아닙니다.
//!
//! 표본이 최소 인원 미만이거나 IQR이 0이면 필터링을 생략하고 전체를
//! 통과시킵니다 (통계적으로 의미 있는 펜스를 만들 수 없음).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use screener_core::config::OutlierConfig;

/// IQR 펜스: [Q1 - k·IQR, Q3 + k·IQR].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IqrFence {
    /// 하한
    pub lower: Decimal,
    /// 상한
    pub upper: Decimal,
}

impl IqrFence {
    /// 값이 펜스 안에 있는지 확인.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// IQR 아웃라이어 필터.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    multiplier: Decimal,
    min_population: usize,
}

impl OutlierFilter {
    /// 설정으로부터 필터 생성.
    pub fn new(config: &OutlierConfig) -> Self {
        Self {
            multiplier: config.iqr_multiplier,
            min_population: config.min_group_size,
        }
    }

    /// 주어진 표본에 대한 펜스 계산.
    ///
    /// # 반환
    ///
    /// - `Some(fence)`: 펜스 적용 가능
    /// - `None`: 표본 부족 또는 IQR = 0 → 필터링 생략 (전체 통과)
    pub fn fence(&self, values: &[Decimal]) -> Option<IqrFence> {
        if values.len() < self.min_population {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort();

        let q1 = quantile(&sorted, dec!(0.25));
        let q3 = quantile(&sorted, dec!(0.75));
        let iqr = q3 - q1;

        if iqr <= Decimal::ZERO {
            return None;
        }

        Some(IqrFence {
            lower: q1 - self.multiplier * iqr,
            upper: q3 + self.multiplier * iqr,
        })
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(&OutlierConfig::default())
    }
}

/// 선형 보간 분위수 (정렬된 표본 기준).
///
/// pos = q × (n - 1), 이웃 관측값 사이를 선형 보간합니다.
fn quantile(sorted: &[Decimal], q: Decimal) -> Decimal {
    debug_assert!(!sorted.is_empty());

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let pos = q * Decimal::from(n - 1);
    let idx = pos.floor();
    let frac = pos - idx;
    let i = idx.to_usize().unwrap_or(0);

    if i + 1 >= n {
        return sorted[n - 1];
    }

    sorted[i] + frac * (sorted[i + 1] - sorted[i])
}
