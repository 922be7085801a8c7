//! Recorder schema: tools, issue filters, quality gates and health report
//! as declared in `warnscope.toml`.

use super::Severity;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
/// Report formats understood by the parsers.
pub enum ToolKind {
    Checkstyle,
    Pmd,
    #[serde(alias = "spotbugs")]
    Findbugs,
    Cpd,
    Maven,
    #[serde(alias = "eclipse")]
    Ecj,
}

impl ToolKind {
    pub fn default_id(self) -> &'static str {
        match self {
            ToolKind::Checkstyle => "checkstyle",
            ToolKind::Pmd => "pmd",
            ToolKind::Findbugs => "findbugs",
            ToolKind::Cpd => "cpd",
            ToolKind::Maven => "maven-warnings",
            ToolKind::Ecj => "eclipse",
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            ToolKind::Checkstyle => "CheckStyle",
            ToolKind::Pmd => "PMD",
            ToolKind::Findbugs => "FindBugs",
            ToolKind::Cpd => "CPD",
            ToolKind::Maven => "Maven",
            ToolKind::Ecj => "Eclipse ECJ",
        }
    }

    /// Default report pattern; `None` means the console log is scanned.
    pub fn default_pattern(self) -> Option<&'static str> {
        match self {
            ToolKind::Checkstyle => Some("**/checkstyle-result.xml"),
            ToolKind::Pmd => Some("**/pmd.xml"),
            ToolKind::Findbugs => Some("**/findbugsXml.xml"),
            ToolKind::Cpd => Some("**/cpd.xml"),
            ToolKind::Maven | ToolKind::Ecj => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// One `[[tools]]` entry.
pub struct ToolCfg {
    pub kind: ToolKind,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Ant-style glob relative to the workspace; empty scans the console log.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub high_threshold: Option<u32>,
    #[serde(default)]
    pub normal_threshold: Option<u32>,
}

impl ToolCfg {
    pub fn of(kind: ToolKind) -> Self {
        ToolCfg {
            kind,
            id: None,
            name: None,
            pattern: None,
            high_threshold: None,
            normal_threshold: None,
        }
    }

    pub fn id(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| self.kind.default_id().to_string())
    }

    pub fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.kind.default_name().to_string())
    }

    /// Effective report pattern, or `None` when the console log is used.
    pub fn pattern(&self) -> Option<String> {
        match self.pattern.as_deref().map(str::trim) {
            Some("") => None,
            Some(p) => Some(p.to_string()),
            None => self.kind.default_pattern().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Issue property a filter looks at, combined with include/exclude.
pub enum FilterKind {
    IncludeCategory,
    ExcludeCategory,
    IncludeType,
    ExcludeType,
    IncludeFile,
    ExcludeFile,
    IncludePackage,
    ExcludePackage,
    IncludeModule,
    ExcludeModule,
    IncludeMessage,
    ExcludeMessage,
}

impl FilterKind {
    pub fn is_include(self) -> bool {
        matches!(
            self,
            FilterKind::IncludeCategory
                | FilterKind::IncludeType
                | FilterKind::IncludeFile
                | FilterKind::IncludePackage
                | FilterKind::IncludeModule
                | FilterKind::IncludeMessage
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
/// One `[[filters]]` entry; `pattern` must match the whole property.
pub struct FilterCfg {
    pub kind: FilterKind,
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Issue counts addressable by quality gates and token macros.
pub enum CountType {
    Total,
    TotalError,
    TotalHigh,
    TotalNormal,
    TotalLow,
    New,
    NewError,
    NewHigh,
    NewNormal,
    NewLow,
    Fixed,
    Delta,
}

impl CountType {
    pub fn label(self) -> &'static str {
        match self {
            CountType::Total => "Total (any severity)",
            CountType::TotalError => "Total (severity error only)",
            CountType::TotalHigh => "Total (severity high only)",
            CountType::TotalNormal => "Total (severity normal only)",
            CountType::TotalLow => "Total (severity low only)",
            CountType::New => "New (any severity)",
            CountType::NewError => "New (severity error only)",
            CountType::NewHigh => "New (severity high only)",
            CountType::NewNormal => "New (severity normal only)",
            CountType::NewLow => "New (severity low only)",
            CountType::Fixed => "Fixed",
            CountType::Delta => "Delta (any severity)",
        }
    }
}

impl FromStr for CountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s.trim().to_ascii_uppercase().as_str() {
            "TOTAL" => CountType::Total,
            "TOTAL_ERROR" => CountType::TotalError,
            "TOTAL_HIGH" => CountType::TotalHigh,
            "TOTAL_NORMAL" => CountType::TotalNormal,
            "TOTAL_LOW" => CountType::TotalLow,
            "NEW" => CountType::New,
            "NEW_ERROR" => CountType::NewError,
            "NEW_HIGH" => CountType::NewHigh,
            "NEW_NORMAL" => CountType::NewNormal,
            "NEW_LOW" => CountType::NewLow,
            "FIXED" => CountType::Fixed,
            "DELTA" => CountType::Delta,
            other => return Err(format!("unknown count type '{}'", other)),
        };
        Ok(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Build outcome when a quality gate is missed.
pub enum GateOutcome {
    #[default]
    Unstable,
    #[serde(alias = "FAILURE")]
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
/// One `[[quality_gates]]` entry.
pub struct QualityGateCfg {
    pub threshold: i64,
    #[serde(rename = "type")]
    pub count_type: CountType,
    #[serde(default)]
    pub result: GateOutcome,
}

fn default_minimum_severity() -> Severity {
    Severity::Low
}

#[derive(Debug, Clone, Deserialize)]
/// `[health]` section.
pub struct HealthCfg {
    #[serde(default)]
    pub healthy: Option<u32>,
    #[serde(default)]
    pub unhealthy: Option<u32>,
    #[serde(default = "default_minimum_severity")]
    pub minimum_severity: Severity,
}

impl Default for HealthCfg {
    fn default() -> Self {
        HealthCfg {
            healthy: None,
            unhealthy: None,
            minimum_severity: default_minimum_severity(),
        }
    }
}
