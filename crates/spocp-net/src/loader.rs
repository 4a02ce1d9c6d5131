//! Loads rules from a directory of text files, one canonical-form rule per
//! non-comment, non-blank line. A bad line is recorded and skipped rather
//! than aborting the whole load — a rules directory is operator-maintained
//! text, and one typo shouldn't take down the rest of the policy.

use std::path::{Path, PathBuf};

use spocp_engine::DecisionEngine;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub line: usize,
    pub error: spocp_core::ParseError,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub files_scanned: usize,
    pub rules_loaded: usize,
    pub failures: Vec<LoadFailure>,
}

fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") || trimmed.starts_with(';')
}

/// Walks `dir` recursively, feeding every non-comment line of every
/// regular file to `engine.add_rule_text`.
pub fn load_dir(dir: &Path, engine: &mut DecisionEngine) -> std::io::Result<LoadReport> {
    let mut report = LoadReport::default();
    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        report.files_scanned += 1;
        let contents = std::fs::read_to_string(entry.path())?;
        for (offset, line) in contents.lines().enumerate() {
            if is_comment_or_blank(line) {
                continue;
            }
            match engine.add_rule_text(line.trim().as_bytes()) {
                Ok(()) => report.rules_loaded += 1,
                Err(error) => {
                    log::warn!("{}:{}: failed to parse rule: {error}", entry.path().display(), offset + 1);
                    report.failures.push(LoadFailure {
                        path: entry.path().to_path_buf(),
                        line: offset + 1,
                        error,
                    });
                }
            }
        }
    }
    Ok(report)
}
