//! End-to-end recording of one build: scan, post-process, filter, compare
//! with the reference build, aggregate, evaluate gates and health, persist.

use crate::aggregate;
use crate::config::Effective;
use crate::delta;
use crate::error::{Result, WarnscopeError};
use crate::filter::{self, IssueFilter};
use crate::gates;
use crate::health;
use crate::history::{BuildHistory, ReferenceCriteria};
use crate::models::{AnalysisResult, BuildRecord, JobResult, QualityGateStatus, Report};
use crate::resolve::{self, PostProcessContext};
use crate::scan::{self, ScanContext};
use std::path::Path;

/// Caller-supplied facts about the build being recorded.
#[derive(Debug, Clone, Copy)]
pub struct RecordRequest<'a> {
    pub job_result: JobResult,
    pub console: Option<&'a Path>,
}

fn node_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| "local".to_string())
}

fn into_result(report: Report, build: u64) -> AnalysisResult {
    AnalysisResult {
        id: report.id,
        name: report.name,
        build,
        issues: report.issues,
        new_issues: Vec::new(),
        fixed_issues: Vec::new(),
        reference_build: None,
        reference_total: None,
        quality_gate: QualityGateStatus::Inactive,
        health: None,
        no_issues_since: None,
        tools: Vec::new(),
        log: report.log,
    }
}

/// First build of the current streak of builds without issues.
fn no_issues_since(history: &BuildHistory, result: &AnalysisResult) -> Result<Option<u64>> {
    if result.total() > 0 {
        return Ok(None);
    }
    let since = match history.previous_result(&result.id, result.build)? {
        Some(prev) if prev.total() == 0 => prev.no_issues_since.unwrap_or(prev.build),
        _ => result.build,
    };
    Ok(Some(since))
}

fn finish(history: &BuildHistory, result: &mut AnalysisResult, eff: &Effective) -> Result<()> {
    gates::evaluate(result, &eff.quality_gates);
    health::apply(result, &eff.health);
    result.no_issues_since = no_issues_since(history, result)?;
    Ok(())
}

/// Record one build and persist it in the history.
pub fn run_record(eff: &Effective, req: &RecordRequest<'_>) -> Result<BuildRecord> {
    if eff.tools.is_empty() {
        return Err(WarnscopeError::NoTools);
    }
    let filters: Vec<IssueFilter> = filter::compile_all(&eff.filters)?;
    let history = BuildHistory::new(&eff.history_dir);
    let number = history.next_number()?;
    let mut record = BuildRecord::new(number, req.job_result);
    tracing::info!(build = number, history = %history.root().display(), "recording build");

    if req.job_result == JobResult::Failure && !eff.enabled_for_failure {
        record
            .log
            .info("Skipping execution of recorder since overall result is 'FAILURE'");
        history.save(&record)?;
        return Ok(record);
    }

    let criteria = ReferenceCriteria::new(eff.ignore_failed_builds, eff.ignore_quality_gate);
    let node = node_name();
    let sources_dir = history.sources_dir(number);
    let scan_ctx = ScanContext {
        workspace: &eff.repo_root,
        console: req.console,
        exclude: Some(eff.history_dir.as_path()),
    };
    let post_ctx = PostProcessContext {
        workspace: &eff.repo_root,
        source_directories: &eff.source_directories,
        sources_dir: Some(sources_dir.as_path()),
        encoding: &eff.source_code_encoding,
        node: &node,
    };

    for tool in &eff.tools {
        let mut report = scan::scan_tool(tool, &scan_ctx)?;
        resolve::post_process(&mut report, &post_ctx);
        filter::apply(&mut report, &filters);
        let mut result = into_result(report, number);
        let reference = history.find_reference(&result.id, &criteria, number)?;
        delta::apply(&mut result, reference.as_ref(), criteria);
        if !eff.aggregating_results {
            finish(&history, &mut result, eff)?;
        }
        record.results.push(result);
    }

    if eff.aggregating_results {
        let mut composite = aggregate::compose(&record.results, number);
        delta::log_reference(&mut composite, criteria);
        finish(&history, &mut composite, eff)?;
        record.aggregate = Some(composite);
    }

    let gate = record
        .published()
        .iter()
        .map(|r| r.quality_gate)
        .max()
        .unwrap_or_default();
    record.quality_gate = gate;
    record.overall = record.job_result.max(record.quality_gate.job_result());
    history.save(&record)?;
    tracing::info!(
        build = number,
        overall = record.overall.name(),
        gate = record.quality_gate.name(),
        "build recorded"
    );
    Ok(record)
}
