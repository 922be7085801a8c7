//! PMD XML reports.

use super::xml::parse_rooted;
use super::{IssueParser, ParsedReport};
use crate::error::ParseError;
use crate::models::{Issue, Severity};

pub struct PmdParser {
    origin: String,
}

impl PmdParser {
    pub fn new(origin: String) -> Self {
        PmdParser { origin }
    }
}

fn severity_of(priority: u32) -> Severity {
    match priority {
        1 | 2 => Severity::High,
        5 => Severity::Low,
        _ => Severity::Normal,
    }
}

impl IssueParser for PmdParser {
    fn parse(&self, content: &str, _source: &str) -> Result<ParsedReport, ParseError> {
        let root = parse_rooted(content, "pmd")?;
        let mut report = ParsedReport::default();
        for file in root.children_named("file") {
            let file_name = file.attr("name").unwrap_or_default();
            for v in file.children_named("violation") {
                report.issues.push(
                    Issue::new(
                        &self.origin,
                        file_name,
                        v.attr_u32("beginline"),
                        severity_of(v.attr_u32("priority")),
                        &v.text,
                    )
                    .with_line_end(v.attr_u32("endline"))
                    .with_columns(v.attr_u32("begincolumn"), v.attr_u32("endcolumn"))
                    .with_category(v.attr("ruleset").unwrap_or_default())
                    .with_type(v.attr("rule").unwrap_or_default())
                    .with_package(v.attr("package").unwrap_or_default()),
                );
            }
        }
        for e in root.children_named("error") {
            report.errors.push(format!(
                "PMD processing error for '{}': {}",
                e.attr("filename").unwrap_or_default(),
                e.attr("msg").unwrap_or_default()
            ));
        }
        Ok(report)
    }
}
