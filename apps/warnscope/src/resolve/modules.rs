//! Module names from the closest build definition above an affected file.
//!
//! Recognized definitions, checked in this order per directory:
//! `pom.xml` (`<name>`, else `<artifactId>`), `package.json` (`name`) and
//! `Cargo.toml` (`package.name`).

use crate::models::Report;
use crate::parsers::xml;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn maven_module(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join("pom.xml")).ok()?;
    let root = xml::parse_rooted(&content, "project").ok()?;
    root.child("name")
        .or_else(|| root.child("artifactId"))
        .map(|e| e.text.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn npm_module(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join("package.json")).ok()?;
    let json: serde_json::Value = serde_json::from_str(&content).ok()?;
    json.get("name")?.as_str().map(str::to_string)
}

fn cargo_module(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join("Cargo.toml")).ok()?;
    let doc: toml::Value = toml::from_str(&content).ok()?;
    doc.get("package")?.get("name")?.as_str().map(str::to_string)
}

fn module_of_dir(dir: &Path) -> Option<String> {
    maven_module(dir)
        .or_else(|| npm_module(dir))
        .or_else(|| cargo_module(dir))
}

/// Walks from the file's directory up to (and including) the workspace.
struct ModuleDetector<'a> {
    workspace: &'a Path,
    cache: HashMap<PathBuf, Option<String>>,
}

impl<'a> ModuleDetector<'a> {
    fn new(workspace: &'a Path) -> Self {
        ModuleDetector {
            workspace,
            cache: HashMap::new(),
        }
    }

    fn detect(&mut self, file: &Path) -> Option<String> {
        if !file.starts_with(self.workspace) {
            return None;
        }
        let mut dir = file.parent();
        while let Some(d) = dir {
            if !d.starts_with(self.workspace) {
                break;
            }
            let found = self
                .cache
                .entry(d.to_path_buf())
                .or_insert_with(|| module_of_dir(d))
                .clone();
            if found.is_some() {
                return found;
            }
            dir = d.parent();
        }
        None
    }
}

/// Fill in module names for issues that have none.
pub fn resolve_modules(report: &mut Report, workspace: &Path) {
    report.log.info(
        "Resolving module names from module definitions (pom.xml, package.json, Cargo.toml)",
    );
    let mut detector = ModuleDetector::new(workspace);
    let mut attempted = 0usize;
    for issue in report.issues.iter_mut().filter(|i| !i.has_module()) {
        attempted += 1;
        if let Some(module) = detector.detect(Path::new(&issue.file_name)) {
            issue.module_name = module;
        }
    }
    report
        .log
        .info(format!("-> resolved module names for {} issues", attempted));
}
