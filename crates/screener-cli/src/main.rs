//! 펀더멘털 스크리너 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 구체화된 배치 분석, 상위 15개 출력
//! screener analyze -i data/batch.json --top-n 15
//!
//! # 제외 목록과 출력 디렉토리 지정
//! screener analyze -i data/batch.json -e ignore.txt -o output/
//!
//! # 적격성 필터 없이 전체 분석
//! screener analyze -i data/batch.json --no-eligibility
//!
//! # WSM 가중치 구조 출력
//! screener weights
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::analyze::{run_analyze, AnalyzeArgs};
use commands::weights::run_weights;

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "펀더멘털 스크리너 - 멀티 메소돌로지 종목 분석", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 배치 분석 실행 및 랭킹 출력
    Analyze {
        /// 구체화된 JSON 배치 파일 경로
        #[arg(short, long)]
        input: PathBuf,

        /// 제외 목록 파일 경로 (한 줄에 티커 하나)
        #[arg(short, long)]
        exclude: Option<PathBuf>,

        /// 설정 파일 경로 (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 랭킹 상위 N개 (기본: 설정값 또는 전체)
        #[arg(short, long)]
        top_n: Option<usize>,

        /// CSV/JSON 내보내기 디렉토리
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 적격성 필터 비활성화
        #[arg(long)]
        no_eligibility: bool,
    },

    /// WSM 가중치 구조 출력
    Weights,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            exclude,
            config,
            top_n,
            output,
            no_eligibility,
        } => run_analyze(AnalyzeArgs {
            input,
            exclude,
            config,
            top_n,
            output,
            no_eligibility,
        }),
        Commands::Weights => {
            run_weights();
            Ok(())
        }
    }
}
