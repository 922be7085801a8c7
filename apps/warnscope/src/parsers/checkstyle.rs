//! CheckStyle XML reports.

use super::xml::parse_rooted;
use super::{IssueParser, ParsedReport};
use crate::error::ParseError;
use crate::models::{Issue, Severity};

pub struct CheckStyleParser {
    origin: String,
}

impl CheckStyleParser {
    pub fn new(origin: String) -> Self {
        CheckStyleParser { origin }
    }
}

/// Simple class name of a check, e.g. `FinalParametersCheck`.
fn type_of(source: &str) -> &str {
    source.rsplit('.').next().unwrap_or(source)
}

/// Capitalized package segment that holds the check, e.g. `Checks`.
fn category_of(source: &str) -> String {
    let mut segments = source.rsplit('.');
    segments.next();
    match segments.next() {
        Some(seg) if !seg.is_empty() => {
            let mut chars = seg.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => String::new(),
    }
}

impl IssueParser for CheckStyleParser {
    fn parse(&self, content: &str, _source: &str) -> Result<ParsedReport, ParseError> {
        let root = parse_rooted(content, "checkstyle")?;
        let mut report = ParsedReport::default();
        for file in root.children_named("file") {
            let file_name = file.attr("name").unwrap_or_default();
            for err in file.children_named("error") {
                let severity = match err.attr("severity").map(str::trim) {
                    Some("error") => Severity::Error,
                    Some("info") => Severity::Low,
                    Some("ignore") => continue,
                    _ => Severity::Normal,
                };
                let source = err.attr("source").unwrap_or_default();
                let column = err.attr_u32("column");
                report.issues.push(
                    Issue::new(
                        &self.origin,
                        file_name,
                        err.attr_u32("line"),
                        severity,
                        err.attr("message").unwrap_or_default(),
                    )
                    .with_columns(column, column)
                    .with_category(&category_of(source))
                    .with_type(type_of(source)),
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
<checkstyle version="8.0">
  <file name="/ws/src/RemoteLauncher.java">
    <error line="59" column="33" severity="error" message="Parameter descriptor should be final." source="com.puppycrawl.tools.checkstyle.checks.FinalParametersCheck"/>
    <error line="61" severity="warning" message="Missing a Javadoc comment." source="com.puppycrawl.tools.checkstyle.checks.javadoc.JavadocMethodCheck"/>
    <error line="62" severity="info" message="Line is longer than 80 characters." source="com.puppycrawl.tools.checkstyle.checks.sizes.LineLengthCheck"/>
    <error line="63" severity="ignore" message="ignored" source="com.puppycrawl.tools.checkstyle.checks.sizes.LineLengthCheck"/>
  </file>
</checkstyle>"#;

    #[test]
    fn test_parses_category_type_and_severity() {
        let parsed = CheckStyleParser::new("checkstyle".into())
            .parse(REPORT, "checkstyle-result.xml")
            .unwrap();
        assert_eq!(parsed.issues.len(), 3);
        let first = &parsed.issues[0];
        assert_eq!(first.base_name(), "RemoteLauncher.java");
        assert_eq!(first.line_start, 59);
        assert_eq!(first.column_start, 33);
        assert_eq!(first.category, "Checks");
        assert_eq!(first.issue_type, "FinalParametersCheck");
        assert_eq!(first.severity, Severity::Error);
        assert_eq!(parsed.issues[1].category, "Javadoc");
        assert_eq!(parsed.issues[1].severity, Severity::Normal);
        assert_eq!(parsed.issues[2].severity, Severity::Low);
    }

    #[test]
    fn test_rejects_foreign_report() {
        let err = CheckStyleParser::new("checkstyle".into())
            .parse("<pmd/>", "pmd.xml")
            .unwrap_err();
        assert!(err.to_string().contains("unexpected root element <pmd>"));
    }
}
