//! 결정적 랭킹 생성기.
//!
//! 점수 내림차순으로 정렬하고, 동점은 티커 오름차순으로 해소하여
//! 엄격한 전순서를 보장합니다. 점수가 없는 기업은 해당 랭킹에서
//! 제외됩니다 (전체 데이터셋에는 유지). 같은 입력에 다시 실행하면
//! 동일한 랭킹이 나옵니다.

use rust_decimal::Decimal;

use screener_core::domain::RankingEntry;

/// 랭킹 생성기.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingGenerator {
    top_n: Option<usize>,
}

impl RankingGenerator {
    /// 새 생성기 생성.
    ///
    /// `top_n`이 `None`이거나 유효 인원을 초과하면 전체를 반환합니다.
    pub fn new(top_n: Option<usize>) -> Self {
        Self { top_n }
    }

    /// 점수가 있는 기업만으로 랭킹 생성.
    ///
    /// 입력은 (티커, 점수) 쌍이며, `None` 점수는 호출자가 이미
    /// 걸러낸 것으로 가정하지 않고 여기서도 제외합니다.
    pub fn generate<I>(&self, scored: I) -> Vec<RankingEntry>
    where
        I: IntoIterator<Item = (String, Option<Decimal>)>,
    {
        let mut entries: Vec<(String, Decimal)> = scored
            .into_iter()
            .filter_map(|(ticker, score)| score.map(|s| (ticker, s)))
            .collect();

        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        if let Some(n) = self.top_n {
            entries.truncate(n);
        }

        entries
            .into_iter()
            .enumerate()
            .map(|(idx, (ticker, score))| RankingEntry {
                ticker,
                score,
                rank: (idx + 1) as u32,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal_macros::dec;

    fn scored(entries: &[(&str, Option<Decimal>)]) -> Vec<(String, Option<Decimal>)> {
        entries
            .iter()
            .map(|(t, s)| (t.to_string(), *s))
            .collect()
    }

    #[test]
    fn test_descending_order_with_ranks() {
        let generator = RankingGenerator::new(None);

        let ranking = generator.generate(scored(&[
            ("AAA3", Some(dec!(10))),
            ("BBB3", Some(dec!(30))),
            ("CCC3", Some(dec!(20))),
        ]));

        let tickers: Vec<&str> = ranking.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["BBB3", "CCC3", "AAA3"]);
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[2].rank, 3);
    }

    #[test]
    fn test_ties_break_by_ascending_ticker() {
        let generator = RankingGenerator::new(None);

        let ranking = generator.generate(scored(&[
            ("ZZZ3", Some(dec!(10))),
            ("AAA3", Some(dec!(10))),
            ("MMM3", Some(dec!(10))),
        ]));

        let tickers: Vec<&str> = ranking.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAA3", "MMM3", "ZZZ3"]);
    }

    #[test]
    fn test_absent_scores_are_excluded() {
        let generator = RankingGenerator::new(None);

        let ranking = generator.generate(scored(&[
            ("AAA3", Some(dec!(10))),
            ("BANK3", None),
            ("CCC3", Some(dec!(5))),
        ]));

        assert_eq!(ranking.len(), 2);
        assert!(ranking.iter().all(|e| e.ticker != "BANK3"));
    }

    #[test]
    fn test_top_n_truncation() {
        let generator = RankingGenerator::new(Some(2));

        let ranking = generator.generate(scored(&[
            ("AAA3", Some(dec!(1))),
            ("BBB3", Some(dec!(3))),
            ("CCC3", Some(dec!(2))),
        ]));

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].ticker, "BBB3");
        assert_eq!(ranking[1].ticker, "CCC3");
    }

    #[test]
    fn test_top_n_exceeding_population_returns_all() {
        let generator = RankingGenerator::new(Some(100));

        let ranking = generator.generate(scored(&[("AAA3", Some(dec!(1)))]));

        assert_eq!(ranking.len(), 1);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let generator = RankingGenerator::new(None);
        let input = scored(&[
            ("AAA3", Some(dec!(10))),
            ("BBB3", Some(dec!(10))),
            ("CCC3", Some(dec!(-5))),
        ]);

        let first = generator.generate(input.clone());
        let second = generator.generate(input);

        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_ranking_is_strict_total_order(raw in prop::collection::vec(-50i64..50, 0..60)) {
            let input: Vec<(String, Option<Decimal>)> = raw
                .iter()
                .enumerate()
                .map(|(idx, score)| {
                    (format!("T{:03}3", idx), Some(Decimal::from_i64(*score).unwrap()))
                })
                .collect();

            let ranking = RankingGenerator::new(None).generate(input);

            for pair in ranking.windows(2) {
                // 점수 내림차순, 동점은 티커 오름차순
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].ticker < pair[1].ticker);
                }
                prop_assert_eq!(pair[0].rank + 1, pair[1].rank);
            }
        }
    }
}
