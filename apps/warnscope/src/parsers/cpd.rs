//! CPD (copy/paste detector) XML reports. Every occurrence of a duplicated
//! block becomes its own issue.

use super::xml::parse_rooted;
use super::{IssueParser, ParsedReport};
use crate::error::ParseError;
use crate::models::{Issue, Severity};

pub const DEFAULT_HIGH_THRESHOLD: u32 = 50;
pub const DEFAULT_NORMAL_THRESHOLD: u32 = 25;

pub struct CpdParser {
    origin: String,
    high_threshold: u32,
    normal_threshold: u32,
}

impl CpdParser {
    pub fn new(origin: String, high_threshold: u32, normal_threshold: u32) -> Self {
        CpdParser {
            origin,
            high_threshold,
            normal_threshold,
        }
    }

    fn severity_of(&self, lines: u32) -> Severity {
        if lines >= self.high_threshold {
            Severity::High
        } else if lines >= self.normal_threshold {
            Severity::Normal
        } else {
            Severity::Low
        }
    }
}

impl IssueParser for CpdParser {
    fn parse(&self, content: &str, _source: &str) -> Result<ParsedReport, ParseError> {
        let root = parse_rooted(content, "pmd-cpd")?;
        let mut report = ParsedReport::default();
        for dup in root.children_named("duplication") {
            let lines = dup.attr_u32("lines");
            let fragment = dup
                .child("codefragment")
                .map(|c| c.text.trim_matches('\n').to_string())
                .unwrap_or_default();
            let severity = self.severity_of(lines);
            for file in dup.children_named("file") {
                let start = file.attr_u32("line");
                let end = match file.attr_u32("endline") {
                    0 => start.saturating_add(lines.saturating_sub(1)),
                    e => e,
                };
                report.issues.push(
                    Issue::new(
                        &self.origin,
                        file.attr("path").unwrap_or_default(),
                        start,
                        severity,
                        "Found duplicated code.",
                    )
                    .with_line_end(end)
                    .with_columns(file.attr_u32("column"), file.attr_u32("endcolumn"))
                    .with_type("Duplicate Code")
                    .with_description(&fragment),
                );
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<pmd-cpd>
  <duplication lines="9" tokens="40">
    <file line="5" path="/ws/Main.java"/>
    <file line="20" path="/ws/Main.java"/>
    <codefragment><![CDATA[functionOne();]]></codefragment>
  </duplication>
  <duplication lines="4" tokens="12">
    <file line="30" endline="33" path="/ws/Main.java"/>
    <file line="40" endline="43" path="/ws/Other.java"/>
    <codefragment><![CDATA[functionTwo();]]></codefragment>
  </duplication>
  <duplication lines="2" tokens="8">
    <file line="50" path="/ws/Main.java"/>
    <file line="60" path="/ws/Main.java"/>
  </duplication>
</pmd-cpd>"#;

    #[test]
    fn test_one_issue_per_occurrence_with_thresholds() {
        let parsed = CpdParser::new("cpd".into(), 8, 3).parse(REPORT, "cpd.xml").unwrap();
        assert_eq!(parsed.issues.len(), 6);
        let first = &parsed.issues[0];
        assert_eq!(first.severity, Severity::High);
        assert_eq!((first.line_start, first.line_end), (5, 13));
        assert_eq!(
            format!("{}\n{}", first.message, first.description),
            "Found duplicated code.\nfunctionOne();"
        );
        assert_eq!(parsed.issues[2].severity, Severity::Normal);
        assert_eq!(parsed.issues[3].line_end, 43);
        assert_eq!(parsed.issues[4].severity, Severity::Low);
    }

    #[test]
    fn test_default_thresholds_rate_small_blocks_low() {
        let parsed = CpdParser::new("cpd".into(), DEFAULT_HIGH_THRESHOLD, DEFAULT_NORMAL_THRESHOLD)
            .parse(REPORT, "cpd.xml")
            .unwrap();
        assert!(parsed.issues.iter().all(|i| i.severity == Severity::Low));
    }

    #[test]
    fn test_end_line_saturates_for_huge_start_lines() {
        let xml = r#"<pmd-cpd><duplication lines="10" tokens="50"><file line="4294967295" path="/ws/A.java"/></duplication></pmd-cpd>"#;
        let parsed = CpdParser::new("cpd".into(), DEFAULT_HIGH_THRESHOLD, DEFAULT_NORMAL_THRESHOLD)
            .parse(xml, "cpd.xml")
            .unwrap();
        assert_eq!(parsed.issues[0].line_start, u32::MAX);
        assert_eq!(parsed.issues[0].line_end, u32::MAX);
    }
}
