//! Composite result across all tools of a build.

use crate::models::{AnalysisResult, MessageLog, QualityGateStatus};

pub const COMPOSITE_ID: &str = "analysis";
pub const COMPOSITE_NAME: &str = "Static Analysis";

/// Combine the per-tool results of build `build` into one result.
///
/// Issues, new and fixed issues are concatenated in tool order. The
/// reference build is the oldest reference of any constituent. Only the
/// constituents' error messages are carried over, prefixed with the tool
/// name.
pub fn compose(results: &[AnalysisResult], build: u64) -> AnalysisResult {
    let mut log = MessageLog::default();
    log.info(format!(
        "Aggregating results of {} tools: {}",
        results.len(),
        results
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    for r in results {
        log.errors
            .extend(r.log.errors.iter().map(|m| format!("[{}] {}", r.name, m)));
    }
    let reference_totals: Vec<usize> = results.iter().filter_map(|r| r.reference_total).collect();
    AnalysisResult {
        id: COMPOSITE_ID.to_string(),
        name: COMPOSITE_NAME.to_string(),
        build,
        issues: results.iter().flat_map(|r| r.issues.iter().cloned()).collect(),
        new_issues: results.iter().flat_map(|r| r.new_issues.iter().cloned()).collect(),
        fixed_issues: results
            .iter()
            .flat_map(|r| r.fixed_issues.iter().cloned())
            .collect(),
        reference_build: results.iter().filter_map(|r| r.reference_build).min(),
        reference_total: (!reference_totals.is_empty()).then(|| reference_totals.iter().sum()),
        quality_gate: QualityGateStatus::Inactive,
        health: None,
        no_issues_since: None,
        tools: results.iter().map(|r| r.name.clone()).collect(),
        log,
    }
}
