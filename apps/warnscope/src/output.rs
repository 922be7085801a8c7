//! Output rendering for the record, show and expand commands.
//!
//! Supports `human` (default) and `json` outputs. JSON shapes are built by
//! the pure `compose_*_json` functions so they can be checked in tests.

use crate::models::{AnalysisResult, BuildRecord, InfoType, Issue, JobResult, QualityGateStatus, Severity};
use crate::stats::{self, Statistics, Tab};
use crate::utils::display_path;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output != "json" && crate::utils::colors_enabled()
}

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

/// Console lines of a recorded build, in the order they were produced.
///
/// Per-tool messages are prefixed with `[<tool name>] `, errors additionally
/// with `[-ERROR-] `.
pub fn console_lines(record: &BuildRecord) -> Vec<String> {
    let mut lines: Vec<String> = record.log.info.clone();
    let mut push_result = |r: &AnalysisResult, with_errors: bool| {
        lines.extend(r.log.info.iter().map(|m| format!("[{}] {}", r.name, m)));
        if with_errors {
            lines.extend(
                r.log
                    .errors
                    .iter()
                    .map(|m| format!("[{}] [-ERROR-] {}", r.name, m)),
            );
        }
    };
    for r in &record.results {
        push_result(r, true);
    }
    if let Some(agg) = &record.aggregate {
        // Constituent errors were already printed with their tool.
        push_result(agg, false);
    }
    lines
}

fn gate_label(status: QualityGateStatus, color: bool) -> String {
    let name = status.name();
    if !color {
        return name.to_string();
    }
    match status {
        QualityGateStatus::Inactive => name.bright_black().to_string(),
        QualityGateStatus::Passed => name.green().bold().to_string(),
        QualityGateStatus::Warning => name.yellow().bold().to_string(),
        QualityGateStatus::Failed => name.red().bold().to_string(),
    }
}

fn result_label(result: JobResult, color: bool) -> String {
    let name = result.name();
    if !color {
        return name.to_string();
    }
    match result {
        JobResult::Success => name.green().bold().to_string(),
        JobResult::Unstable => name.yellow().bold().to_string(),
        JobResult::Failure => name.red().bold().to_string(),
    }
}

/// Summary lines of one result as shown below the build.
pub fn summary_lines(result: &AnalysisResult, color: bool) -> Vec<String> {
    let title = result.title();
    let mut lines = vec![if color { title.bold().to_string() } else { title }];
    if result.is_aggregation() {
        lines.push(format!("  tools: {}", result.tools.join(", ")));
    }
    lines.push(format!(
        "  new: {}  fixed: {}  outstanding: {}  reference build: #{}",
        result.new_count(),
        result.fixed_count(),
        result.outstanding_count(),
        result.reference_build.unwrap_or(0)
    ));
    let mut status = format!("  quality gate: {}", gate_label(result.quality_gate, color));
    if let Some(h) = result.health {
        status.push_str(&format!("  health: {}%", h));
    }
    if result.info_type() == InfoType::Error {
        let marker = if color {
            "errors logged".red().to_string()
        } else {
            "errors logged".to_string()
        };
        status.push_str(&format!("  ({})", marker));
    }
    lines.push(status);
    if let Some(details) = result.no_issues_details() {
        lines.push(format!("  {}", details));
    }
    lines
}

/// Print the console log and summaries of a recorded build.
pub fn print_record(record: &BuildRecord, output: &str) {
    match output {
        "json" => print_json(&compose_record_json(record)),
        _ => {
            let color = use_colors(output);
            for line in console_lines(record) {
                println!("{}", line);
            }
            for r in record.published() {
                println!();
                for line in summary_lines(r, color) {
                    println!("{}", line);
                }
            }
            let footer = format!(
                "— Build #{} — result={} quality gate={}",
                record.number,
                result_label(record.overall, color),
                gate_label(record.quality_gate, color)
            );
            println!();
            if color {
                println!("{}", footer.bold());
            } else {
                println!("{}", footer);
            }
        }
    }
}

fn severity_label(severity: Severity, color: bool) -> String {
    let name = severity.display_name();
    if !color {
        return name.to_string();
    }
    match severity {
        Severity::Error => name.red().bold().to_string(),
        Severity::High => name.red().to_string(),
        Severity::Normal => name.yellow().to_string(),
        Severity::Low => name.blue().to_string(),
    }
}

fn issues_of<'a>(result: &'a AnalysisResult, severity: Option<Severity>) -> Vec<&'a Issue> {
    result
        .issues
        .iter()
        .filter(|i| severity.map_or(true, |s| i.severity == s))
        .collect()
}

/// Print summary, tabs, breakdown and issues of `result`.
pub fn print_show(result: &AnalysisResult, severity: Option<Severity>, root: &Path, output: &str) {
    if output == "json" {
        print_json(&compose_show_json(result, severity));
        return;
    }
    let color = use_colors(output);
    for line in summary_lines(result, color) {
        println!("{}", line);
    }
    let tabs = stats::available_tabs(&result.issues);
    let active = stats::active_tab(&result.issues);
    let tab_line: Vec<String> = tabs
        .iter()
        .map(|t| {
            if *t == active {
                format!("[{}]", t.label())
            } else {
                t.label().to_string()
            }
        })
        .collect();
    println!();
    println!("Tabs: {}", tab_line.join("  "));

    let statistics = Statistics::of(&result.issues);
    if let Some(rows) = statistics.for_tab(active) {
        println!();
        for (value, count) in rows {
            let shown = if active == Tab::Files {
                display_path(root, Path::new(value))
            } else {
                value.clone()
            };
            println!("  {:<50} {:>5}", shown, count);
        }
    }

    println!();
    println!(
        "  {:<30} {:>6}  {:<20} {:<30} {:<8} {:>4}  {}",
        "File", "Line", "Category", "Type", "Severity", "Age", "Package"
    );
    for issue in issues_of(result, severity) {
        println!(
            "  {:<30} {:>6}  {:<20} {:<30} {:<8} {:>4}  {}",
            issue.base_name(),
            issue.line_start,
            issue.category,
            issue.issue_type,
            severity_label(issue.severity, color),
            issue.age(result.build),
            issue.package_name
        );
    }

    if !result.log.info.is_empty() {
        println!();
        println!("Info messages:");
        for m in &result.log.info {
            println!("  {}", m);
        }
    }
    if result.log.has_errors() {
        println!();
        println!("Error messages:");
        for m in &result.log.errors {
            if color {
                println!("  {}", m.red());
            } else {
                println!("  {}", m);
            }
        }
    }
}

/// Compose the summary JSON of one result (pure) for testing purposes.
pub fn compose_summary_json(result: &AnalysisResult) -> JsonVal {
    json!({
        "id": result.id,
        "name": result.name,
        "title": result.title(),
        "build": result.build,
        "total": result.total(),
        "new": result.new_count(),
        "fixed": result.fixed_count(),
        "outstanding": result.outstanding_count(),
        "reference_build": result.reference_build.unwrap_or(0),
        "quality_gate": result.quality_gate.name(),
        "health": result.health,
        "info_type": match result.info_type() {
            InfoType::Info => "INFO",
            InfoType::Error => "ERROR",
        },
        "no_issues": result.no_issues_details(),
        "tools": result.tools,
    })
}

/// Compose record JSON object (pure) for testing purposes.
pub fn compose_record_json(record: &BuildRecord) -> JsonVal {
    let published: Vec<JsonVal> = record
        .published()
        .into_iter()
        .map(compose_summary_json)
        .collect();
    json!({
        "build": record.number,
        "timestamp": record.timestamp.to_rfc3339(),
        "job_result": record.job_result.name(),
        "overall": record.overall.name(),
        "quality_gate": record.quality_gate.name(),
        "results": published,
        "console": console_lines(record),
    })
}

fn issue_json(issue: &Issue, build: u64) -> JsonVal {
    json!({
        "file": issue.file_name,
        "base_name": issue.base_name(),
        "line_start": issue.line_start,
        "line_end": issue.line_end,
        "category": issue.category,
        "type": issue.issue_type,
        "severity": issue.severity,
        "message": issue.message,
        "package": issue.package_name,
        "module": issue.module_name,
        "origin": issue.origin,
        "age": issue.age(build),
    })
}

/// Compose show JSON object (pure) for testing purposes.
pub fn compose_show_json(result: &AnalysisResult, severity: Option<Severity>) -> JsonVal {
    let issues: Vec<JsonVal> = issues_of(result, severity)
        .into_iter()
        .map(|i| issue_json(i, result.build))
        .collect();
    json!({
        "summary": compose_summary_json(result),
        "tabs": stats::available_tabs(&result.issues),
        "active_tab": stats::active_tab(&result.issues),
        "statistics": Statistics::of(&result.issues),
        "issues": issues,
        "messages": {
            "info": result.log.info,
            "errors": result.log.errors,
        },
    })
}
