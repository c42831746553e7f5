//! 분석 리포트 내보내기.
//!
//! 전체 데이터셋을 CSV로, 리포트 전체(데이터셋 + 랭킹)를 JSON으로
//! 기록합니다. 랭킹에서 제외된 기업도 CSV에는 빈 점수와 부재 사유로
//! 포함됩니다. 차트 생성은 범위 밖입니다.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::info;

use screener_analytics::AnalysisReport;
use screener_core::domain::{Category, MethodologyKind, ScoreAbsence};

use crate::error::Result;

/// 전체 데이터셋을 CSV 파일로 기록.
pub fn write_dataset_csv<P: AsRef<Path>>(report: &AnalysisReport, path: P) -> Result<()> {
    let contents = render_dataset_csv(report);
    fs::write(path.as_ref(), contents)?;

    info!(
        path = %path.as_ref().display(),
        companies = report.companies.len(),
        "데이터셋 CSV 기록 완료"
    );

    Ok(())
}

/// 리포트 전체를 JSON 파일로 기록.
pub fn write_report_json<P: AsRef<Path>>(report: &AnalysisReport, path: P) -> Result<()> {
    let contents = serde_json::to_string_pretty(report)?;
    fs::write(path.as_ref(), contents)?;

    info!(path = %path.as_ref().display(), "리포트 JSON 기록 완료");

    Ok(())
}

/// 데이터셋 CSV 렌더링.
pub fn render_dataset_csv(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str("ticker,name,sector,subsector,price,market_cap");
    for kind in MethodologyKind::ALL {
        out.push_str(&format!(",{kind}_fair_value,{kind}_margin_pct"));
    }
    for category in Category::ALL {
        out.push_str(&format!(",score_{category}"));
    }
    out.push_str(",coverage,wsm_score,wsm_penalized_score,absence\n");

    for company in &report.companies {
        let record = &company.record;

        out.push_str(&csv_field(&record.ticker));
        out.push(',');
        out.push_str(&csv_field(&record.name));
        out.push(',');
        out.push_str(&csv_field(&record.sector));
        out.push(',');
        out.push_str(&csv_field(&record.subsector));
        out.push(',');
        out.push_str(&fmt_decimal(record.price));
        out.push(',');
        out.push_str(&fmt_optional(record.market_cap));

        for kind in MethodologyKind::ALL {
            let result = company.methodology_results.get(&kind);
            out.push(',');
            out.push_str(&fmt_optional(result.and_then(|r| r.fair_value)));
            out.push(',');
            out.push_str(&fmt_optional(result.and_then(|r| r.safety_margin_pct)));
        }

        for category in Category::ALL {
            out.push(',');
            out.push_str(&fmt_optional(
                company.composite.category(category).and_then(|c| c.score),
            ));
        }

        out.push(',');
        out.push_str(&fmt_decimal(company.composite.coverage));
        out.push(',');
        out.push_str(&fmt_optional(company.composite.score));
        out.push(',');
        out.push_str(&fmt_optional(company.composite.penalized_score));
        out.push(',');
        out.push_str(match company.composite.absence {
            Some(ScoreAbsence::LowCoverage { .. }) => "low_coverage",
            None => "",
        });
        out.push('\n');
    }

    out
}

/// CSV 필드 이스케이프 (쉼표/따옴표/개행 포함 시 인용).
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn fmt_decimal(value: Decimal) -> String {
    value.round_dp(4).normalize().to_string()
}

fn fmt_optional(value: Option<Decimal>) -> String {
    value.map(fmt_decimal).unwrap_or_default()
}
