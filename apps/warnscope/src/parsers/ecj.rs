//! Eclipse compiler (ECJ) text output:
//!
//! ```text
//! 1. WARNING in /ws/src/Foo.java (at line 12)
//!     import java.util.List;
//!            ^^^^^^^^^^^^^^
//! The import java.util.List is never used
//! ----------
//! ```

use super::{strip_ansi, IssueParser, ParsedReport};
use crate::error::ParseError;
use crate::models::{Issue, Severity};
use regex::Regex;
use std::sync::OnceLock;

fn header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\d+\.\s+(WARNING|ERROR|INFO)\s+in\s+(.+?)\s*\(at line\s+(\d+)\)")
            .expect("valid ecj header regex")
    })
}

/// Ant prefixes like `[javac] ` in front of compiler output.
fn task_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\[\w+\]\s?").expect("valid prefix regex"))
}

pub struct EclipseParser {
    origin: String,
}

impl EclipseParser {
    pub fn new(origin: String) -> Self {
        EclipseParser { origin }
    }
}

struct Entry {
    severity: Severity,
    file: String,
    line: u32,
    body: Vec<String>,
}

fn is_separator(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 5 && t.chars().all(|c| c == '-')
}

fn is_caret_line(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && t.chars().all(|c| c == '^')
}

impl EclipseParser {
    fn flush(&self, entry: Option<Entry>, out: &mut Vec<Issue>) {
        let Some(entry) = entry else { return };
        let after_caret = entry
            .body
            .iter()
            .position(|l| is_caret_line(l))
            .and_then(|i| entry.body.get(i + 1));
        let message = after_caret
            .or_else(|| entry.body.iter().rev().find(|l| !l.trim().is_empty()))
            .map(|s| s.as_str())
            .unwrap_or_default();
        out.push(Issue::new(
            &self.origin,
            &entry.file,
            entry.line,
            entry.severity,
            message,
        ));
    }
}

impl IssueParser for EclipseParser {
    fn parse(&self, content: &str, _source: &str) -> Result<ParsedReport, ParseError> {
        let mut report = ParsedReport::default();
        let mut entry: Option<Entry> = None;
        for raw in content.lines() {
            let clean = strip_ansi(raw);
            let line = task_prefix().replace(&clean, "");
            if let Some(caps) = header().captures(&line) {
                self.flush(entry.take(), &mut report.issues);
                let severity = match &caps[1] {
                    "ERROR" => Severity::Error,
                    "INFO" => Severity::Low,
                    _ => Severity::Normal,
                };
                entry = Some(Entry {
                    severity,
                    file: caps[2].to_string(),
                    line: caps[3].parse().unwrap_or(0),
                    body: Vec::new(),
                });
            } else if is_separator(&line) {
                self.flush(entry.take(), &mut report.issues);
            } else if let Some(e) = entry.as_mut() {
                e.body.push(line.to_string());
            }
        }
        self.flush(entry.take(), &mut report.issues);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_blocks_with_caret_lines() {
        let log = "----------
1. WARNING in /ws/src/SampleClassWithPackage.java (at line 12)
\timport java.util.List;
\t       ^^^^^^^^^^^^^^
The import java.util.List is never used
----------
2. ERROR in /ws/src/SampleClassWithNamespace.cs (at line 3)
\tnamespace SampleClassWithNamespace
Syntax error on token
----------
    [javac] 3. INFO in NOT_EXISTING_FILE (at line 1)
    [javac] Something informative
";
        let parsed = EclipseParser::new("eclipse".into()).parse(log, "build.log").unwrap();
        assert_eq!(parsed.issues.len(), 3);
        assert_eq!(parsed.issues[0].file_name, "/ws/src/SampleClassWithPackage.java");
        assert_eq!(parsed.issues[0].line_start, 12);
        assert_eq!(parsed.issues[0].message, "The import java.util.List is never used");
        assert_eq!(parsed.issues[1].severity, Severity::Error);
        assert_eq!(parsed.issues[1].message, "Syntax error on token");
        assert_eq!(parsed.issues[2].file_name, "NOT_EXISTING_FILE");
        assert_eq!(parsed.issues[2].severity, Severity::Low);
        assert_eq!(parsed.issues[2].message, "Something informative");
    }
}
