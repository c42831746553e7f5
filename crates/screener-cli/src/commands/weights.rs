//! `weights` 명령어: WSM 가중치 구조 출력.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use screener_core::domain::{Category, Direction, Indicator};

/// 가중치 구조 테이블 출력.
pub fn run_weights() {
    println!("===========================================================");
    println!(" WSM 가중치 구조");
    println!("===========================================================");

    for category in Category::ALL {
        let weight_pct = category.weight() * dec!(100);
        println!("\n[{}] {} — {}%", category, category.label(), weight_pct.normalize());

        for indicator in Indicator::members_of(category) {
            let Some(policy) = indicator.policy() else {
                continue;
            };

            let direction = match policy.direction {
                Direction::HigherBetter => "높을수록 좋음",
                Direction::LowerBetter => "낮을수록 좋음",
            };

            println!(
                "  {:<20} {:>5}%  ({})",
                indicator.as_str(),
                (policy.weight * dec!(100)).normalize(),
                direction
            );
        }
    }

    let total: Decimal = Category::ALL.iter().map(|c| c.weight()).sum();
    println!("\n합계: {}%", (total * dec!(100)).normalize());
}
