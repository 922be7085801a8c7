//! Maven console output. Consecutive `[WARNING]` (or `[ERROR]`) lines form
//! one issue whose type is the plugin goal that was running.

use super::{strip_ansi, IssueParser, ParsedReport};
use crate::error::ParseError;
use crate::models::{Issue, Severity, UNDEFINED};
use regex::Regex;
use std::sync::OnceLock;

fn goal_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[INFO\] --- ([\w.\-]+):[^:\s]+:([\w.\-]+)").expect("valid goal regex")
    })
}

fn level_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[(WARNING|ERROR)\]\s?(.*)$").expect("valid level regex"))
}

pub struct MavenConsoleParser {
    origin: String,
}

impl MavenConsoleParser {
    pub fn new(origin: String) -> Self {
        MavenConsoleParser { origin }
    }
}

struct Block {
    severity: Severity,
    start: u32,
    end: u32,
    lines: Vec<String>,
    texts: Vec<String>,
}

impl MavenConsoleParser {
    fn flush(&self, block: Option<Block>, goal: &str, source: &str, out: &mut Vec<Issue>) {
        let Some(block) = block else { return };
        let Some(message) = block.texts.iter().find(|t| !t.trim().is_empty()) else {
            return;
        };
        out.push(
            Issue::new(&self.origin, source, block.start, block.severity, message)
                .with_line_end(block.end)
                .with_type(goal)
                .with_description(&block.lines.join("\n")),
        );
    }
}

impl IssueParser for MavenConsoleParser {
    fn parse(&self, content: &str, source: &str) -> Result<ParsedReport, ParseError> {
        let mut report = ParsedReport::default();
        let mut goal = UNDEFINED.to_string();
        let mut block: Option<Block> = None;
        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx as u32 + 1;
            let line = strip_ansi(raw);
            let line = line.trim_end();
            if let Some(caps) = goal_header().captures(line) {
                self.flush(block.take(), &goal, source, &mut report.issues);
                goal = format!("{}:{}", &caps[1], &caps[2]);
                continue;
            }
            let Some(caps) = level_line().captures(line) else {
                self.flush(block.take(), &goal, source, &mut report.issues);
                continue;
            };
            let severity = if &caps[1] == "ERROR" {
                Severity::Error
            } else {
                Severity::Normal
            };
            match block.as_mut() {
                Some(b) if b.severity == severity => {
                    b.end = line_no;
                    b.lines.push(line.to_string());
                    b.texts.push(caps[2].to_string());
                }
                _ => {
                    self.flush(block.take(), &goal, source, &mut report.issues);
                    block = Some(Block {
                        severity,
                        start: line_no,
                        end: line_no,
                        lines: vec![line.to_string()],
                        texts: vec![caps[2].to_string()],
                    });
                }
            }
        }
        self.flush(block.take(), &goal, source, &mut report.issues);
        Ok(report)
    }
}
