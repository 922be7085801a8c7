//! Report parsers. Each adapter turns one tool-specific format into
//! normalized `Issue`s tagged with the tool id.

pub mod checkstyle;
pub mod cpd;
pub mod ecj;
pub mod findbugs;
pub mod maven;
pub mod pmd;
pub mod xml;

use crate::error::ParseError;
use crate::models::recorder::{ToolCfg, ToolKind};
use crate::models::Issue;

/// Issues and non-fatal processing errors found in one report file.
#[derive(Debug, Default)]
pub struct ParsedReport {
    pub issues: Vec<Issue>,
    pub errors: Vec<String>,
}

/// A parser for one report format.
pub trait IssueParser: Send + Sync {
    /// Parse `content`; `source` is the report's path, used by formats
    /// whose issues point into the report itself (console logs).
    fn parse(&self, content: &str, source: &str) -> Result<ParsedReport, ParseError>;
}

/// Create the parser configured by `tool`.
pub fn parser_for(tool: &ToolCfg) -> Box<dyn IssueParser> {
    let origin = tool.id();
    match tool.kind {
        ToolKind::Checkstyle => Box::new(checkstyle::CheckStyleParser::new(origin)),
        ToolKind::Pmd => Box::new(pmd::PmdParser::new(origin)),
        ToolKind::Findbugs => Box::new(findbugs::FindBugsParser::new(origin)),
        ToolKind::Cpd => Box::new(cpd::CpdParser::new(
            origin,
            tool.high_threshold.unwrap_or(cpd::DEFAULT_HIGH_THRESHOLD),
            tool.normal_threshold.unwrap_or(cpd::DEFAULT_NORMAL_THRESHOLD),
        )),
        ToolKind::Maven => Box::new(maven::MavenConsoleParser::new(origin)),
        ToolKind::Ecj => Box::new(ecj::EclipseParser::new(origin)),
    }
}

/// Remove ANSI color sequences that CI consoles leave in logs.
pub(crate) fn strip_ansi(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for n in chars.by_ref() {
                if n.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\u{1b}[1;33mWARNING\u{1b}[m done"), "WARNING done");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_parser_for_tags_issues_with_tool_id() {
        let mut tool = ToolCfg::of(ToolKind::Checkstyle);
        tool.id = Some("style".into());
        let parsed = parser_for(&tool)
            .parse(
                r#"<checkstyle><file name="A.java"><error line="1" severity="warning" message="m" source="a.b.Check"/></file></checkstyle>"#,
                "checkstyle-result.xml",
            )
            .unwrap();
        assert_eq!(parsed.issues[0].origin, "style");
    }
}
