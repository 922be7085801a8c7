//! Absolute path resolution and copies of affected files.

use super::PostProcessContext;
use crate::models::{Report, UNDEFINED};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// File name used for the stored copy of `file` inside a build folder.
pub fn stored_name(file: &str) -> String {
    file.replace(['/', '\\', ':'], "_")
}

fn distinct_files(report: &Report) -> BTreeSet<String> {
    report
        .issues
        .iter()
        .map(|i| i.file_name.clone())
        .filter(|f| f != UNDEFINED)
        .collect()
}

fn locate(name: &str, ctx: &PostProcessContext<'_>) -> Option<PathBuf> {
    std::iter::once(ctx.workspace)
        .chain(ctx.source_directories.iter().map(PathBuf::as_path))
        .map(|base| base.join(name))
        .find(|candidate| candidate.is_file())
}

/// Replace relative file names with absolute paths found in the workspace
/// or one of the source directories.
pub fn resolve_paths(report: &mut Report, ctx: &PostProcessContext<'_>) {
    report.log.info(format!(
        "Resolving file names for all issues in workspace '{}'",
        ctx.workspace.display()
    ));
    let mut resolved: HashMap<String, String> = HashMap::new();
    let mut already = 0usize;
    let mut unresolved: Vec<String> = Vec::new();
    for name in distinct_files(report) {
        let path = Path::new(&name);
        if path.is_absolute() && path.exists() {
            already += 1;
            continue;
        }
        match (!path.is_absolute()).then(|| locate(&name, ctx)).flatten() {
            Some(abs) => {
                resolved.insert(name, abs.to_string_lossy().to_string());
            }
            None => unresolved.push(format!("- {}", name)),
        }
    }
    report.log.info(format!(
        "-> {} resolved, {} unresolved, {} already resolved",
        resolved.len(),
        unresolved.len(),
        already
    ));
    report
        .log
        .error_group("Can't resolve absolute paths for some files:", &unresolved);
    if resolved.is_empty() {
        return;
    }
    for issue in report.issues.iter_mut() {
        if let Some(abs) = resolved.get(&issue.file_name) {
            issue.file_name = abs.clone();
        }
    }
}

/// Copy every affected file into the build's source folder so it can be
/// shown later even when the workspace changed.
pub fn copy_affected_files(report: &mut Report, ctx: &PostProcessContext<'_>) {
    let Some(target) = ctx.sources_dir else {
        return;
    };
    report.log.info(format!(
        "Copying affected files to '{}'",
        target.display()
    ));
    let (mut copied, mut outside, mut missing) = (0usize, 0usize, 0usize);
    let mut failures: Vec<String> = Vec::new();
    for name in distinct_files(report) {
        let path = Path::new(&name);
        if !path.is_file() {
            missing += 1;
            continue;
        }
        if !ctx.is_permitted(path) {
            outside += 1;
            continue;
        }
        let outcome = fs::create_dir_all(target)
            .and_then(|_| fs::copy(path, target.join(stored_name(&name))));
        match outcome {
            Ok(_) => copied += 1,
            Err(e) => failures.push(format!("- '{}', {}", name, e)),
        }
    }
    report.log.info(format!(
        "-> {} copied, {} not in workspace, {} not-found, {} with I/O error",
        copied,
        outside,
        missing,
        failures.len()
    ));
    report
        .log
        .error_group("Can't copy some affected files:", &failures);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, Severity};
    use tempfile::tempdir;

    #[test]
    fn test_stored_name_flattens_separators() {
        assert_eq!(stored_name("/ws/src/Main.java"), "_ws_src_Main.java");
        assert_eq!(stored_name("C:\\ws\\A.cs"), "C__ws_A.cs");
    }

    #[test]
    fn test_resolution_uses_source_directories() {
        let ws = tempdir().unwrap();
        let src = tempdir().unwrap();
        fs::create_dir_all(src.path().join("edu")).unwrap();
        fs::write(src.path().join("edu/Io.java"), "class Io {}").unwrap();
        let dirs = vec![src.path().to_path_buf()];
        let mut report = Report::new("findbugs", "FindBugs");
        report.issues = vec![Issue::new("findbugs", "edu/Io.java", 1, Severity::Low, "m")];
        let ctx = PostProcessContext {
            workspace: ws.path(),
            source_directories: &dirs,
            sources_dir: None,
            encoding: "UTF-8",
            node: "local",
        };
        resolve_paths(&mut report, &ctx);
        assert_eq!(Path::new(&report.issues[0].file_name), src.path().join("edu/Io.java"));
        assert!(report
            .log
            .info
            .contains(&"-> 1 resolved, 0 unresolved, 0 already resolved".to_string()));
    }

    #[test]
    fn test_files_outside_workspace_are_not_copied() {
        let ws = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let file = elsewhere.path().join("Far.java");
        fs::write(&file, "class Far {}").unwrap();
        let target = ws.path().join("sources");
        let mut report = Report::new("pmd", "PMD");
        report.issues = vec![Issue::new("pmd", &file.to_string_lossy(), 1, Severity::Low, "m")];
        let ctx = PostProcessContext {
            workspace: ws.path(),
            source_directories: &[],
            sources_dir: Some(target.as_path()),
            encoding: "UTF-8",
            node: "local",
        };
        copy_affected_files(&mut report, &ctx);
        assert!(report
            .log
            .info
            .contains(&"-> 0 copied, 1 not in workspace, 0 not-found, 0 with I/O error".to_string()));
    }
}
