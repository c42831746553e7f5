//! 제외 목록 파일 파싱.
//!
//! 한 줄에 티커 하나, `#`로 시작하는 줄은 주석입니다. 티커는
//! 대문자로 정규화되어 파이프라인의 제외 집합으로 전달됩니다.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;

/// 제외 목록 파일 로드.
pub fn load_exclusions<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>> {
    let contents = fs::read_to_string(path.as_ref())?;
    let exclusions = parse_exclusions(&contents);

    info!(
        path = %path.as_ref().display(),
        count = exclusions.len(),
        "제외 목록 로드 완료"
    );

    Ok(exclusions)
}

/// 제외 목록 텍스트 파싱.
pub fn parse_exclusions(contents: &str) -> BTreeSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_uppercase)
        .collect()
}
