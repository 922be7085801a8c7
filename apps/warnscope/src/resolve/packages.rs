//! Package and namespace detection for Java, Kotlin and C# sources.

use crate::models::Report;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn java_package() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*package\s+([a-z]+[.\w]*)\s*;").expect("valid java package regex")
    })
}

fn kotlin_package() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*package\s+([a-z]+[.\w]*)\s*;?\s*$").expect("valid kotlin package regex")
    })
}

fn csharp_namespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*namespace\s+([\w.]+)").expect("valid namespace regex")
    })
}

/// Package (or namespace) declared in `content`, chosen by file extension.
pub fn detect_package(file: &str, content: &str) -> Option<String> {
    let ext = Path::new(file)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())?;
    let re = match ext.as_str() {
        "java" => java_package(),
        "kt" | "kts" => kotlin_package(),
        "cs" => csharp_namespace(),
        _ => return None,
    };
    re.captures(content).map(|c| c[1].to_string())
}

/// Fill in package names for issues that have none by reading their files.
pub fn resolve_packages(report: &mut Report) {
    report
        .log
        .info("Resolving package names (or namespaces) by parsing the affected files");
    let mut by_file: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, issue) in report.issues.iter().enumerate() {
        if !issue.has_package() {
            by_file.entry(issue.file_name.clone()).or_default().push(idx);
        }
    }
    let mut detected: HashMap<&str, String> = HashMap::new();
    for file in by_file.keys() {
        // Unresolved names would be read relative to the process directory.
        if !Path::new(file).is_absolute() {
            continue;
        }
        let package = fs::read(file)
            .ok()
            .and_then(|bytes| detect_package(file, &String::from_utf8_lossy(&bytes)));
        if let Some(p) = package {
            detected.insert(file.as_str(), p);
        }
    }
    for (file, indices) in &by_file {
        if let Some(p) = detected.get(file.as_str()) {
            for &idx in indices {
                report.issues[idx].package_name = p.clone();
            }
        }
    }
    report.log.info(format!(
        "-> resolved package names of {} affected files",
        by_file.len()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, Severity};

    #[test]
    fn test_java_packages_must_start_lowercase() {
        assert_eq!(
            detect_package(
                "SampleClassWithPackage.java",
                "/* header */\npackage edu.hm.hafner.analysis._123.int.naming.structure;\n\nclass A {}"
            )
            .as_deref(),
            Some("edu.hm.hafner.analysis._123.int.naming.structure")
        );
        assert_eq!(
            detect_package("SampleClassWithUnconventionalPackageNaming.java", "package Edu.Hm;\n"),
            None
        );
        assert_eq!(detect_package("SampleClassWithoutPackage.java", "class A {}"), None);
    }

    #[test]
    fn test_first_csharp_namespace_is_used() {
        let source = "using System;\nclass Before {}\nnamespace NestedNamespace {\n  namespace Inner {}\n}\n";
        assert_eq!(
            detect_package("SampleClassWithNamespaceBetweenCode.cs", source).as_deref(),
            Some("NestedNamespace")
        );
        assert_eq!(detect_package("SampleClassWithoutNamespace.cs", "class A {}"), None);
    }

    #[test]
    fn test_unresolved_file_names_are_not_read() {
        let relative = "tests/fixtures/sources/Relative.java";
        let absolute = Path::new(env!("CARGO_MANIFEST_DIR")).join(relative);
        let mut report = Report::new("pmd", "PMD");
        report.issues = vec![
            Issue::new("pmd", &absolute.to_string_lossy(), 4, Severity::Normal, "m"),
            Issue::new("pmd", relative, 4, Severity::Normal, "m"),
        ];
        resolve_packages(&mut report);
        assert_eq!(report.issues[0].package_name, "edu.hm.fixture");
        assert_eq!(report.issues[1].package_name, "-");
    }

    #[test]
    fn test_kotlin_and_unknown_extensions() {
        assert_eq!(detect_package("A.kt", "package org.demo\n").as_deref(), Some("org.demo"));
        assert_eq!(detect_package("NOT_EXISTING_FILE", "package a;"), None);
    }
}
