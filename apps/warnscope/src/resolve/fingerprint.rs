//! Content fingerprints that let an issue be recognized in a later build
//! even when its line number moved.

use crate::models::{Report, UNDEFINED};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Lines taken before and after the affected range.
const CONTEXT_LINES: usize = 3;

/// SHA-256 over the whitespace-free text surrounding `line_start..=line_end`.
pub fn fingerprint(lines: &[String], line_start: u32, line_end: u32) -> String {
    let start = (line_start.max(1) as usize) - 1;
    let end = (line_end.max(line_start).max(1) as usize) - 1;
    let from = start.saturating_sub(CONTEXT_LINES);
    let to = (end + CONTEXT_LINES + 1).min(lines.len());
    let mut hasher = Sha256::new();
    if from < to {
        for line in &lines[from..to] {
            let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            hasher.update(compact.as_bytes());
            hasher.update(b"\n");
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Lines of an affected file. Names that were not resolved to an absolute
/// path are never read relative to the process directory.
fn read_lines(file: &str) -> Result<Vec<String>, String> {
    if !Path::new(file).is_absolute() {
        return Err("file name has not been resolved to an absolute path".to_string());
    }
    fs::read(file)
        .map(|bytes| {
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        })
        .map_err(|e| e.to_string())
}

/// Assign fingerprints to all issues whose file can be read.
pub fn create_fingerprints(report: &mut Report) {
    report.log.info(
        "Creating fingerprints for all affected code blocks to track issues over different builds",
    );
    let mut contents: HashMap<String, Result<Vec<String>, String>> = HashMap::new();
    let mut created = 0usize;
    let mut failures: Vec<String> = Vec::new();
    for issue in report.issues.iter_mut() {
        if issue.file_name == UNDEFINED {
            continue;
        }
        let content = contents
            .entry(issue.file_name.clone())
            .or_insert_with(|| read_lines(&issue.file_name));
        match content {
            Ok(lines) => {
                issue.fingerprint = Some(fingerprint(lines, issue.line_start, issue.line_end));
                created += 1;
            }
            Err(e) => failures.push(format!(
                "- '{}', IO exception has been thrown: {}",
                issue.file_name, e
            )),
        }
    }
    report
        .log
        .info(format!("-> created fingerprints for {} issues", created));
    report
        .log
        .error_group("Can't create fingerprints for some files:", &failures);
}
