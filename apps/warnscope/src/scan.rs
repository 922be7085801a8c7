//! Report discovery and parsing for one tool.
//!
//! Report files are located with `glob` relative to the workspace and parsed
//! in parallel with `rayon`. Parse failures never abort the scan; they end up
//! as error messages of the tool's report.

use crate::error::{Result, WarnscopeError};
use crate::models::recorder::ToolCfg;
use crate::models::{Issue, Report};
use crate::parsers::{parser_for, ParsedReport};
use glob::glob;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Where to look for reports.
pub struct ScanContext<'a> {
    pub workspace: &'a Path,
    /// Console log consumed by tools without a file pattern.
    pub console: Option<&'a Path>,
    /// Directory never searched (warnscope's own history).
    pub exclude: Option<&'a Path>,
}

fn found_files_message(count: usize) -> String {
    if count == 1 {
        "-> found 1 file".to_string()
    } else {
        format!("-> found {} files", count)
    }
}

/// Expand a comma separated list of globs below `workspace`.
pub fn find_files(workspace: &Path, patterns: &str, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pat in patterns.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let abs = if Path::new(pat).is_absolute() {
            PathBuf::from(pat)
        } else {
            workspace.join(pat)
        };
        let pattern = abs.to_string_lossy().to_string();
        let entries = glob(&pattern).map_err(|source| WarnscopeError::FilePattern {
            pattern: pat.to_string(),
            source,
        })?;
        for p in entries.flatten() {
            if !p.is_file() {
                continue;
            }
            if exclude.is_some_and(|ex| p.starts_with(ex)) {
                continue;
            }
            files.push(p);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Drop issues whose identity was already seen; returns the survivors and
/// the number of dropped duplicates.
pub fn remove_duplicates(issues: Vec<Issue>) -> (Vec<Issue>, usize) {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        issues.iter().map(|i| seen.insert(i.key())).collect()
    };
    let before = issues.len();
    let unique: Vec<Issue> = issues
        .into_iter()
        .zip(keep)
        .filter_map(|(issue, k)| k.then_some(issue))
        .collect();
    let skipped = before - unique.len();
    (unique, skipped)
}

/// Locate and parse the reports of `tool`.
pub fn scan_tool(tool: &ToolCfg, ctx: &ScanContext<'_>) -> Result<Report> {
    let mut report = Report::new(&tool.id(), &tool.name());
    let files = match tool.pattern() {
        Some(pattern) => {
            report.log.info(format!(
                "Searching for all files in '{}' that match the pattern '{}'",
                ctx.workspace.display(),
                pattern
            ));
            find_files(ctx.workspace, &pattern, ctx.exclude)?
        }
        None => match ctx.console {
            Some(console) => {
                report
                    .log
                    .info(format!("Parsing console log '{}'", console.display()));
                vec![console.to_path_buf()]
            }
            None => {
                report.log.error(format!(
                    "No console log available for {} (pass --console or set a pattern)",
                    report.name
                ));
                Vec::new()
            }
        },
    };
    report.log.info(found_files_message(files.len()));

    let parser = parser_for(tool);
    let outcomes: Vec<(&PathBuf, std::result::Result<ParsedReport, String>)> = files
        .par_iter()
        .map(|path| {
            let outcome = fs::read(path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| {
                    let content = String::from_utf8_lossy(&bytes);
                    parser
                        .parse(&content, &path.to_string_lossy())
                        .map_err(|e| e.to_string())
                });
            (path, outcome)
        })
        .collect();

    let mut issues = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(parsed) => {
                tracing::debug!(
                    tool = %report.id,
                    file = %path.display(),
                    issues = parsed.issues.len(),
                    "parsed report"
                );
                issues.extend(parsed.issues);
                for e in parsed.errors {
                    report.log.error(e);
                }
            }
            Err(reason) => report.log.error(format!(
                "Parsing of file '{}' failed: {}",
                path.display(),
                reason
            )),
        }
    }
    let (unique, skipped) = remove_duplicates(issues);
    report.log.info(format!(
        "-> found {} issues (skipped {} duplicates)",
        unique.len(),
        skipped
    ));
    report.files = files.len();
    report.duplicates = skipped;
    report.issues = unique;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recorder::ToolKind;
    use crate::models::Severity;
    use tempfile::tempdir;

    const CHECKSTYLE: &str = r#"<checkstyle>
<file name="A.java">
<error line="1" severity="error" message="m" source="x.checks.FinalParametersCheck"/>
<error line="1" severity="error" message="m" source="x.checks.FinalParametersCheck"/>
<error line="2" severity="warning" message="n" source="x.javadoc.JavadocMethodCheck"/>
</file>
</checkstyle>"#;

    #[test]
    fn test_scan_counts_files_and_skips_duplicates() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        fs::create_dir_all(ws.join("target")).unwrap();
        fs::write(ws.join("target/checkstyle-result.xml"), CHECKSTYLE).unwrap();
        let ctx = ScanContext {
            workspace: ws,
            console: None,
            exclude: None,
        };
        let report = scan_tool(&ToolCfg::of(ToolKind::Checkstyle), &ctx).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.duplicates, 1);
        assert!(report.log.info.contains(&"-> found 1 file".to_string()));
        assert!(report
            .log
            .info
            .contains(&"-> found 2 issues (skipped 1 duplicates)".to_string()));
    }

    #[test]
    fn test_parse_failures_are_logged_not_fatal() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        fs::write(ws.join("pmd.xml"), "<pmd><file name=").unwrap();
        let ctx = ScanContext {
            workspace: ws,
            console: None,
            exclude: None,
        };
        let report = scan_tool(&ToolCfg::of(ToolKind::Pmd), &ctx).unwrap();
        assert!(report.issues.is_empty());
        assert!(report.log.errors[0].starts_with("Parsing of file '"));
        assert!(report.log.info.contains(&"-> found 0 issues (skipped 0 duplicates)".to_string()));
    }

    #[test]
    fn test_console_tools_without_console_log_an_error() {
        let dir = tempdir().unwrap();
        let ctx = ScanContext {
            workspace: dir.path(),
            console: None,
            exclude: None,
        };
        let report = scan_tool(&ToolCfg::of(ToolKind::Maven), &ctx).unwrap();
        assert_eq!(report.files, 0);
        assert!(report.log.has_errors());
        assert!(report.log.info.contains(&"-> found 0 files".to_string()));
    }

    #[test]
    fn test_console_log_is_parsed_for_console_tools() {
        let dir = tempdir().unwrap();
        let console = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/console/maven.log");
        let ctx = ScanContext {
            workspace: dir.path(),
            console: Some(console.as_path()),
            exclude: None,
        };
        let report = scan_tool(&ToolCfg::of(ToolKind::Maven), &ctx).unwrap();
        assert_eq!(
            report.log.info[0],
            format!("Parsing console log '{}'", console.display())
        );
        assert_eq!(report.files, 1);
        assert!(!report.log.has_errors());
        let types: Vec<&str> = report.issues.iter().map(|i| i.issue_type.as_str()).collect();
        assert_eq!(
            types,
            vec!["maven-compiler-plugin:compile", "maven-javadoc-plugin:jar"]
        );
        let console_name = console.to_string_lossy();
        assert!(report.issues.iter().all(|i| i.file_name == console_name));
        assert_eq!((report.issues[1].line_start, report.issues[1].line_end), (7, 8));
    }

    #[test]
    fn test_excluded_directory_is_not_searched() {
        let dir = tempdir().unwrap();
        let ws = dir.path();
        fs::create_dir_all(ws.join(".warnscope")).unwrap();
        fs::write(ws.join(".warnscope/cpd.xml"), "<pmd-cpd/>").unwrap();
        fs::write(ws.join("cpd.xml"), "<pmd-cpd/>").unwrap();
        let files = find_files(ws, "**/cpd.xml", Some(ws.join(".warnscope").as_path())).unwrap();
        assert_eq!(files, vec![ws.join("cpd.xml")]);
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let a = Issue::new("pmd", "A.java", 1, Severity::Low, "x");
        let b = Issue::new("pmd", "A.java", 2, Severity::Low, "x");
        let (unique, skipped) = remove_duplicates(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(unique, vec![a, b]);
        assert_eq!(skipped, 1);
    }
}
