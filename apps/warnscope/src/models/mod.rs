//! Shared data models: issues, reports, analysis results and build records.

pub mod recorder;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use self::recorder::CountType;

/// Placeholder for properties a parser or resolver could not determine.
pub const UNDEFINED: &str = "-";

/// Maximum number of entries logged below one error title.
pub const MAX_LOGGED_ERRORS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Issue severity, most severe first.
pub enum Severity {
    #[serde(alias = "error")]
    Error,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "normal")]
    Normal,
    #[serde(alias = "low")]
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Error, Severity::High, Severity::Normal, Severity::Low];

    pub fn display_name(self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::High => "High",
            Severity::Normal => "Normal",
            Severity::Low => "Low",
        }
    }

    /// True when `self` is as severe as `minimum` or more.
    pub fn is_at_least(self, minimum: Severity) -> bool {
        self <= minimum
    }

    /// Case-insensitive lookup used by CLI flags.
    pub fn parse(s: &str) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.display_name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single static-analysis finding.
pub struct Issue {
    pub file_name: String,
    pub line_start: u32,
    pub line_end: u32,
    #[serde(default)]
    pub column_start: u32,
    #[serde(default)]
    pub column_end: u32,
    pub category: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub package_name: String,
    pub module_name: String,
    /// Id of the tool that reported the issue.
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Build in which the issue showed up first.
    #[serde(default)]
    pub reference_build: u64,
}

/// Identity used for duplicate detection and exact cross-build matching.
pub type IssueKey<'a> = (&'a str, &'a str, u32, u32, u32, u32, &'a str, &'a str, Severity, &'a str);

impl Issue {
    pub fn new(origin: &str, file_name: &str, line: u32, severity: Severity, message: &str) -> Self {
        let file_name = if file_name.trim().is_empty() { UNDEFINED } else { file_name.trim() };
        Issue {
            file_name: file_name.to_string(),
            line_start: line,
            line_end: line,
            column_start: 0,
            column_end: 0,
            category: UNDEFINED.to_string(),
            issue_type: UNDEFINED.to_string(),
            severity,
            message: message.trim().to_string(),
            description: String::new(),
            package_name: UNDEFINED.to_string(),
            module_name: UNDEFINED.to_string(),
            origin: origin.to_string(),
            fingerprint: None,
            reference_build: 0,
        }
    }

    pub fn with_line_end(mut self, line_end: u32) -> Self {
        self.line_end = line_end.max(self.line_start);
        self
    }

    pub fn with_columns(mut self, start: u32, end: u32) -> Self {
        self.column_start = start;
        self.column_end = end.max(start);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = or_undefined(category);
        self
    }

    pub fn with_type(mut self, issue_type: &str) -> Self {
        self.issue_type = or_undefined(issue_type);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_package(mut self, package: &str) -> Self {
        self.package_name = or_undefined(package);
        self
    }

    pub fn key(&self) -> IssueKey<'_> {
        (
            &self.origin,
            &self.file_name,
            self.line_start,
            self.line_end,
            self.column_start,
            self.column_end,
            &self.category,
            &self.issue_type,
            self.severity,
            &self.message,
        )
    }

    /// File name without directories, as shown in issue tables.
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.file_name)
    }

    /// Number of builds the issue has been present, counting `build`.
    pub fn age(&self, build: u64) -> u64 {
        if self.reference_build == 0 || self.reference_build > build {
            1
        } else {
            build - self.reference_build + 1
        }
    }

    pub fn has_package(&self) -> bool {
        self.package_name != UNDEFINED
    }

    pub fn has_module(&self) -> bool {
        self.module_name != UNDEFINED
    }
}

fn or_undefined(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() { UNDEFINED.to_string() } else { v.to_string() }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Info and error messages collected while recording.
pub struct MessageLog {
    #[serde(default)]
    pub info: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl MessageLog {
    pub fn info(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Log `title` followed by at most `MAX_LOGGED_ERRORS` entries.
    pub fn error_group(&mut self, title: &str, entries: &[String]) {
        if entries.is_empty() {
            return;
        }
        self.errors.push(title.to_string());
        self.errors
            .extend(entries.iter().take(MAX_LOGGED_ERRORS).cloned());
        if entries.len() > MAX_LOGGED_ERRORS {
            self.errors.push(format!(
                "  ... skipped logging of {} additional errors",
                entries.len() - MAX_LOGGED_ERRORS
            ));
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
/// Issues of one tool run before delta classification.
pub struct Report {
    pub id: String,
    pub name: String,
    pub issues: Vec<Issue>,
    pub files: usize,
    pub duplicates: usize,
    pub log: MessageLog,
}

impl Report {
    pub fn new(id: &str, name: &str) -> Self {
        Report {
            id: id.to_string(),
            name: name.to_string(),
            ..Report::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Result of a build as given by the caller or worsened by quality gates.
pub enum JobResult {
    Success,
    Unstable,
    Failure,
}

impl JobResult {
    pub fn parse(s: &str) -> Option<JobResult> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Some(JobResult::Success),
            "unstable" => Some(JobResult::Unstable),
            "failure" | "failed" => Some(JobResult::Failure),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JobResult::Success => "SUCCESS",
            JobResult::Unstable => "UNSTABLE",
            JobResult::Failure => "FAILURE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Outcome of the quality gate evaluation, ordered from best to worst.
pub enum QualityGateStatus {
    #[default]
    Inactive,
    Passed,
    Warning,
    Failed,
}

impl QualityGateStatus {
    pub fn is_successful(self) -> bool {
        matches!(self, QualityGateStatus::Inactive | QualityGateStatus::Passed)
    }

    pub fn name(self) -> &'static str {
        match self {
            QualityGateStatus::Inactive => "INACTIVE",
            QualityGateStatus::Passed => "PASSED",
            QualityGateStatus::Warning => "WARNING",
            QualityGateStatus::Failed => "FAILED",
        }
    }

    /// Build result implied by this status.
    pub fn job_result(self) -> JobResult {
        match self {
            QualityGateStatus::Inactive | QualityGateStatus::Passed => JobResult::Success,
            QualityGateStatus::Warning => JobResult::Unstable,
            QualityGateStatus::Failed => JobResult::Failure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Indicator shown next to a summary.
pub enum InfoType {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Issues of one tool (or the composite of several) in one build.
pub struct AnalysisResult {
    pub id: String,
    pub name: String,
    pub build: u64,
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub new_issues: Vec<Issue>,
    #[serde(default)]
    pub fixed_issues: Vec<Issue>,
    #[serde(default)]
    pub reference_build: Option<u64>,
    #[serde(default)]
    pub reference_total: Option<usize>,
    #[serde(default)]
    pub quality_gate: QualityGateStatus,
    #[serde(default)]
    pub health: Option<u32>,
    #[serde(default)]
    pub no_issues_since: Option<u64>,
    /// Display names of the aggregated tools (composite results only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default)]
    pub log: MessageLog,
}

impl AnalysisResult {
    pub fn total(&self) -> usize {
        self.issues.len()
    }

    pub fn new_count(&self) -> usize {
        self.new_issues.len()
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_issues.len()
    }

    pub fn outstanding_count(&self) -> usize {
        self.total() - self.new_count()
    }

    pub fn is_aggregation(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Summary title, e.g. `CheckStyle: 3 warnings`.
    pub fn title(&self) -> String {
        match self.total() {
            0 => format!("{}: No warnings", self.name),
            1 => format!("{}: 1 warning", self.name),
            n => format!("{}: {} warnings", self.name, n),
        }
    }

    pub fn info_type(&self) -> InfoType {
        if self.log.has_errors() {
            InfoType::Error
        } else {
            InfoType::Info
        }
    }

    /// Details line for results without issues.
    pub fn no_issues_details(&self) -> Option<String> {
        if self.total() > 0 {
            return None;
        }
        let since = self.no_issues_since?;
        let builds = self.build.saturating_sub(since) + 1;
        let unit = if builds == 1 { "build" } else { "builds" };
        Some(format!(
            "No warnings for {} {}, i.e. since build {}",
            builds, unit, since
        ))
    }

    /// Count of the given kind, used by quality gates and token macros.
    pub fn count(&self, count_type: CountType) -> i64 {
        let total_of = |sev: Severity| self.issues.iter().filter(|i| i.severity == sev).count() as i64;
        let new_of = |sev: Severity| self.new_issues.iter().filter(|i| i.severity == sev).count() as i64;
        match count_type {
            CountType::Total => self.total() as i64,
            CountType::TotalError => total_of(Severity::Error),
            CountType::TotalHigh => total_of(Severity::High),
            CountType::TotalNormal => total_of(Severity::Normal),
            CountType::TotalLow => total_of(Severity::Low),
            CountType::New => self.new_count() as i64,
            CountType::NewError => new_of(Severity::Error),
            CountType::NewHigh => new_of(Severity::High),
            CountType::NewNormal => new_of(Severity::Normal),
            CountType::NewLow => new_of(Severity::Low),
            CountType::Fixed => self.fixed_count() as i64,
            CountType::Delta => {
                self.total() as i64 - self.reference_total.map(|t| t as i64).unwrap_or(0)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Everything persisted for one `warnscope record` invocation.
pub struct BuildRecord {
    pub number: u64,
    pub timestamp: DateTime<Utc>,
    pub job_result: JobResult,
    pub overall: JobResult,
    #[serde(default)]
    pub quality_gate: QualityGateStatus,
    #[serde(default)]
    pub results: Vec<AnalysisResult>,
    #[serde(default)]
    pub aggregate: Option<AnalysisResult>,
    #[serde(default)]
    pub log: MessageLog,
}

impl BuildRecord {
    pub fn new(number: u64, job_result: JobResult) -> Self {
        BuildRecord {
            number,
            timestamp: Utc::now(),
            job_result,
            overall: job_result,
            quality_gate: QualityGateStatus::Inactive,
            results: Vec::new(),
            aggregate: None,
            log: MessageLog::default(),
        }
    }

    /// Results shown for this build: the composite when aggregating,
    /// otherwise every per-tool result.
    pub fn published(&self) -> Vec<&AnalysisResult> {
        match &self.aggregate {
            Some(agg) => vec![agg],
            None => self.results.iter().collect(),
        }
    }

    /// Look up a result by id among published and per-tool results.
    pub fn find(&self, id: &str) -> Option<&AnalysisResult> {
        self.aggregate
            .iter()
            .chain(self.results.iter())
            .find(|r| r.id == id)
    }
}
