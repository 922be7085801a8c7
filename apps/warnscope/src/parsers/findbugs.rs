//! FindBugs / SpotBugs XML reports (`BugCollection`).

use super::xml::{parse_rooted, Element};
use super::{IssueParser, ParsedReport};
use crate::error::ParseError;
use crate::models::{Issue, Severity};

pub struct FindBugsParser {
    origin: String,
}

impl FindBugsParser {
    pub fn new(origin: String) -> Self {
        FindBugsParser { origin }
    }
}

fn severity_of(priority: u32) -> Severity {
    match priority {
        1 => Severity::High,
        2 => Severity::Normal,
        _ => Severity::Low,
    }
}

/// Primary source line of a bug instance, or the first one found.
fn primary_source_line(bug: &Element) -> Option<&Element> {
    let direct: Vec<&Element> = bug.children_named("SourceLine").collect();
    if let Some(p) = direct.iter().find(|s| s.attr("primary") == Some("true")) {
        return Some(*p);
    }
    if let Some(first) = direct.first() {
        return Some(*first);
    }
    let mut nested = Vec::new();
    bug.descendants_named("SourceLine", &mut nested);
    nested
        .iter()
        .find(|s| s.attr("primary") == Some("true"))
        .or_else(|| nested.first())
        .copied()
}

fn package_of(class_name: &str) -> &str {
    class_name.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
}

impl IssueParser for FindBugsParser {
    fn parse(&self, content: &str, _source: &str) -> Result<ParsedReport, ParseError> {
        let root = parse_rooted(content, "BugCollection")?;
        let mut report = ParsedReport::default();
        for bug in root.children_named("BugInstance") {
            let bug_type = bug.attr("type").unwrap_or_default();
            let message = bug
                .child("LongMessage")
                .or_else(|| bug.child("ShortMessage"))
                .map(|m| m.text.as_str())
                .unwrap_or(bug_type);
            let line = primary_source_line(bug);
            let file = line
                .and_then(|l| l.attr("sourcepath").or_else(|| l.attr("sourcefile")))
                .unwrap_or_default();
            let start = line.map(|l| l.attr_u32("start")).unwrap_or(0);
            let end = line.map(|l| l.attr_u32("end")).unwrap_or(0);
            let class_name = line
                .and_then(|l| l.attr("classname"))
                .or_else(|| bug.child("Class").and_then(|c| c.attr("classname")))
                .unwrap_or_default();
            report.issues.push(
                Issue::new(
                    &self.origin,
                    file,
                    start,
                    severity_of(bug.attr_u32("priority")),
                    message,
                )
                .with_line_end(end)
                .with_category(bug.attr("category").unwrap_or_default())
                .with_type(bug_type)
                .with_package(package_of(class_name)),
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bug_instances() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<BugCollection version="3.1.0">
  <Project><SrcDir>/ws/src/main/java</SrcDir></Project>
  <BugInstance type="NP_NULL_ON_SOME_PATH" priority="1" category="CORRECTNESS">
    <ShortMessage>Possible null pointer dereference</ShortMessage>
    <LongMessage>Possible null pointer dereference of x in Main.run()</LongMessage>
    <Class classname="edu.hm.Main"><SourceLine classname="edu.hm.Main" sourcepath="edu/hm/Main.java"/></Class>
    <SourceLine classname="edu.hm.Main" start="42" end="43" sourcepath="edu/hm/Main.java" primary="true"/>
  </BugInstance>
  <BugInstance type="DM_DEFAULT_ENCODING" priority="3" category="I18N">
    <Class classname="edu.hm.util.Io"><SourceLine classname="edu.hm.util.Io" start="7" end="7" sourcepath="edu/hm/util/Io.java"/></Class>
  </BugInstance>
</BugCollection>"#;
        let parsed = FindBugsParser::new("findbugs".into())
            .parse(xml, "findbugsXml.xml")
            .unwrap();
        assert_eq!(parsed.issues.len(), 2);
        let np = &parsed.issues[0];
        assert_eq!(np.file_name, "edu/hm/Main.java");
        assert_eq!((np.line_start, np.line_end), (42, 43));
        assert_eq!(np.message, "Possible null pointer dereference of x in Main.run()");
        assert_eq!(np.package_name, "edu.hm");
        assert_eq!(np.severity, Severity::High);
        let io = &parsed.issues[1];
        assert_eq!(io.line_start, 7);
        assert_eq!(io.message, "DM_DEFAULT_ENCODING");
        assert_eq!(io.package_name, "edu.hm.util");
        assert_eq!(io.severity, Severity::Low);
    }

    #[test]
    fn test_empty_collection_has_no_issues() {
        let parsed = FindBugsParser::new("findbugs".into())
            .parse("<BugCollection/>", "findbugsXml.xml")
            .unwrap();
        assert!(parsed.issues.is_empty());
    }
}
