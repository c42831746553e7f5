//! `analyze` 명령어: 배치 로드 → 파이프라인 실행 → 랭킹 출력/내보내기.

use anyhow::Context;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use screener_analytics::{AnalysisReport, Screener};
use screener_core::config::AppConfig;
use screener_core::domain::RankingEntry;
use screener_core::logging::{init_logging, LogConfig};
use screener_data::{load_batch, load_exclusions, write_dataset_csv, write_report_json, EligibilityFilter};

/// analyze 명령어 인자.
pub struct AnalyzeArgs {
    /// 배치 파일 경로
    pub input: PathBuf,
    /// 제외 목록 파일 경로
    pub exclude: Option<PathBuf>,
    /// 설정 파일 경로
    pub config: Option<PathBuf>,
    /// 상위 N개 오버라이드
    pub top_n: Option<usize>,
    /// 내보내기 디렉토리
    pub output: Option<PathBuf>,
    /// 적격성 필터 비활성화
    pub no_eligibility: bool,
}

/// analyze 실행.
pub fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.top_n.is_some() {
        config.analysis.top_n = args.top_n;
    }

    let log_config = LogConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.parse().unwrap_or_default(),
        ..Default::default()
    };
    if let Err(error) = init_logging(log_config) {
        eprintln!("로깅 초기화 실패: {error}");
    }

    // 제외 목록
    let exclusions: BTreeSet<String> = match &args.exclude {
        Some(path) => load_exclusions(path)
            .with_context(|| format!("제외 목록 로드 실패: {}", path.display()))?,
        None => BTreeSet::new(),
    };

    // 배치 로드 (+적격성 필터)
    let eligibility = if args.no_eligibility {
        None
    } else {
        Some(EligibilityFilter::new(&config.eligibility))
    };
    let batch = load_batch(&args.input, eligibility.as_ref())
        .with_context(|| format!("배치 로드 실패: {}", args.input.display()))?;

    for dropped in &batch.dropped {
        warn!(ticker = ?dropped.ticker, reason = %dropped.reason, "탈락 레코드");
    }

    info!(
        companies = batch.records.len(),
        dropped = batch.dropped.len(),
        ineligible = batch.ineligible,
        "분석 입력 준비 완료"
    );

    // 파이프라인 실행
    let screener = Screener::new(config.analysis.clone());
    let report = screener.run(batch.records, &exclusions);

    print_report(&report);

    // 내보내기
    if let Some(dir) = &args.output {
        fs::create_dir_all(dir)
            .with_context(|| format!("출력 디렉토리 생성 실패: {}", dir.display()))?;

        let csv_path = dir.join("dataset.csv");
        write_dataset_csv(&report, &csv_path)?;
        println!("\n데이터셋 CSV: {}", csv_path.display());

        let json_path = dir.join("report.json");
        write_report_json(&report, &json_path)?;
        println!("리포트 JSON: {}", json_path.display());
    }

    Ok(())
}

/// 설정 로드: 명시 경로 → 기본 경로 → 내장 기본값.
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("설정 로드 실패: {}", path.display())),
        None => {
            if std::path::Path::new("config/default.toml").exists() {
                AppConfig::load_default().context("기본 설정 로드 실패")
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

/// 랭킹 요약 출력.
fn print_report(report: &AnalysisReport) {
    let scored = report
        .companies
        .iter()
        .filter(|c| c.composite.is_scored())
        .count();

    println!("\n===========================================================");
    println!(" 분석 결과: {}개 기업 (WSM 점수 {}개)", report.companies.len(), scored);
    if !report.excluded.is_empty() {
        println!(" 제외 목록 적용: {}개", report.excluded.len());
    }
    println!("===========================================================");

    for (kind, ranking) in &report.methodology_rankings {
        print_ranking(&format!("{kind} 안전마진 랭킹"), ranking, "%");
    }

    for (variant, ranking) in &report.wsm_rankings {
        print_ranking(&format!("{variant} 랭킹"), ranking, "");
    }
}

fn print_ranking(title: &str, ranking: &[RankingEntry], suffix: &str) {
    println!("\n--- {title} ---");

    if ranking.is_empty() {
        println!("  (유효 기업 없음)");
        return;
    }

    for entry in ranking {
        println!(
            "  {:>3}. {:<8} {:>10.4}{}",
            entry.rank,
            entry.ticker,
            entry.score.round_dp(4),
            suffix
        );
    }
}
