//! Configuration discovery and effective settings resolution.
//!
//! Warnscope reads `warnscope.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `history_dir`: `.warnscope`
//! - `source_code_encoding`: `UTF-8`
//! - `aggregating_results`, `enabled_for_failure`, `ignore_quality_gate`: false
//! - `ignore_failed_builds`: true
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Result, WarnscopeError};
use crate::models::recorder::{FilterCfg, HealthCfg, QualityGateCfg, ToolCfg};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILES: [&str; 3] = ["warnscope.toml", "warnscope.yaml", "warnscope.yml"];
pub const DEFAULT_HISTORY_DIR: &str = ".warnscope";
pub const DEFAULT_ENCODING: &str = "UTF-8";

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `warnscope.toml|yaml`.
pub struct WarnscopeConfig {
    pub output: Option<String>,
    pub history_dir: Option<String>,
    pub source_code_encoding: Option<String>,
    #[serde(default)]
    pub source_directories: Vec<String>,
    pub aggregating_results: Option<bool>,
    pub enabled_for_failure: Option<bool>,
    pub ignore_quality_gate: Option<bool>,
    pub ignore_failed_builds: Option<bool>,
    #[serde(default)]
    pub tools: Vec<ToolCfg>,
    #[serde(default)]
    pub filters: Vec<FilterCfg>,
    #[serde(default)]
    pub quality_gates: Vec<QualityGateCfg>,
    #[serde(default)]
    pub health: HealthCfg,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: String,
    pub history_dir: PathBuf,
    pub source_code_encoding: String,
    pub source_directories: Vec<PathBuf>,
    pub aggregating_results: bool,
    pub enabled_for_failure: bool,
    pub ignore_quality_gate: bool,
    pub ignore_failed_builds: bool,
    pub tools: Vec<ToolCfg>,
    pub filters: Vec<FilterCfg>,
    pub quality_gates: Vec<QualityGateCfg>,
    pub health: HealthCfg,
}

/// CLI values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides<'a> {
    pub repo_root: Option<&'a str>,
    pub config: Option<&'a str>,
    pub output: Option<&'a str>,
    pub history_dir: Option<&'a str>,
}

fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `warnscope.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if find_config_file(cur).is_some() || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Parse a config file; the format follows the extension.
pub fn load_config_file(path: &Path) -> Result<WarnscopeConfig> {
    let s = fs::read_to_string(path).map_err(|source| WarnscopeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str(&s).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| WarnscopeError::InvalidConfig {
        path: path.to_path_buf(),
        message,
    })
}

/// Load `WarnscopeConfig` from the root if one of the config files exists.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, WarnscopeConfig)>> {
    match find_config_file(root) {
        Some(path) => {
            let cfg = load_config_file(&path)?;
            Ok(Some((path, cfg)))
        }
        None => Ok(None),
    }
}

fn absolutize(root: &Path, value: &str) -> PathBuf {
    let p = Path::new(value);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides<'_>) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.unwrap_or("."));
    let start = fs::canonicalize(&start).unwrap_or(start);
    let repo_root = detect_repo_root(&start);

    let (config_path, cfg) = match cli.config {
        Some(explicit) => {
            let path = absolutize(&start, explicit);
            let cfg = load_config_file(&path)?;
            (Some(path), cfg)
        }
        None => match load_config(&repo_root)? {
            Some((path, cfg)) => (Some(path), cfg),
            None => (None, WarnscopeConfig::default()),
        },
    };

    let output = cli
        .output
        .map(str::to_string)
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let history_dir = absolutize(
        &repo_root,
        cli.history_dir
            .or(cfg.history_dir.as_deref())
            .unwrap_or(DEFAULT_HISTORY_DIR),
    );
    let source_directories = cfg
        .source_directories
        .iter()
        .map(|d| absolutize(&repo_root, d))
        .collect();

    let mut seen = HashSet::new();
    for tool in &cfg.tools {
        let id = tool.id();
        if !seen.insert(id.clone()) {
            return Err(WarnscopeError::DuplicateToolId(id));
        }
    }
    if let Some(gate) = cfg.quality_gates.iter().find(|g| g.threshold <= 0) {
        return Err(WarnscopeError::InvalidConfig {
            path: config_path.clone().unwrap_or_else(|| repo_root.clone()),
            message: format!(
                "quality gate threshold must be positive (got {})",
                gate.threshold
            ),
        });
    }

    Ok(Effective {
        output,
        history_dir,
        source_code_encoding: cfg
            .source_code_encoding
            .unwrap_or_else(|| DEFAULT_ENCODING.to_string()),
        source_directories,
        aggregating_results: cfg.aggregating_results.unwrap_or(false),
        enabled_for_failure: cfg.enabled_for_failure.unwrap_or(false),
        ignore_quality_gate: cfg.ignore_quality_gate.unwrap_or(false),
        ignore_failed_builds: cfg.ignore_failed_builds.unwrap_or(true),
        tools: cfg.tools,
        filters: cfg.filters,
        quality_gates: cfg.quality_gates,
        health: cfg.health,
        repo_root,
        config_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recorder::{CountType, FilterKind, ToolKind};
    use crate::models::Severity;
    use std::io::Write;
    use tempfile::tempdir;

    fn overrides(root: &Path) -> Overrides<'_> {
        Overrides {
            repo_root: root.to_str(),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("warnscope.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
aggregating_results = true
ignore_quality_gate = true

[[tools]]
kind = "checkstyle"

[[tools]]
kind = "pmd"
pattern = "**/pmd-report.xml"

[[filters]]
kind = "EXCLUDE_CATEGORY"
pattern = "Checks"

[[quality_gates]]
threshold = 4
type = "TOTAL"

[health]
healthy = 1
unhealthy = 9
minimum_severity = "HIGH"
"#
        )
        .unwrap();

        let eff = resolve_effective(&overrides(root)).unwrap();
        assert_eq!(eff.output, "json");
        assert!(eff.aggregating_results);
        assert!(eff.ignore_quality_gate);
        assert!(eff.ignore_failed_builds);
        assert_eq!(eff.tools.len(), 2);
        assert_eq!(eff.tools[1].kind, ToolKind::Pmd);
        assert_eq!(eff.tools[1].pattern().as_deref(), Some("**/pmd-report.xml"));
        assert_eq!(eff.filters[0].kind, FilterKind::ExcludeCategory);
        assert_eq!(eff.quality_gates[0].count_type, CountType::Total);
        assert_eq!(eff.health.minimum_severity, Severity::High);
        assert!(eff.history_dir.ends_with(".warnscope"));
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("warnscope.yaml"),
            "history_dir: build/history\ntools:\n  - kind: findbugs\n",
        )
        .unwrap();
        let eff = resolve_effective(&overrides(root)).unwrap();
        assert_eq!(eff.output, "human");
        assert_eq!(eff.source_code_encoding, "UTF-8");
        assert!(eff.history_dir.ends_with("build/history"));
        assert!(!eff.aggregating_results);
        assert!(!eff.enabled_for_failure);
        assert!(eff.health.healthy.is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("warnscope.toml"), "output = \"json\"\n").unwrap();
        let eff = resolve_effective(&Overrides {
            repo_root: root.to_str(),
            output: Some("human"),
            history_dir: Some("elsewhere"),
            ..Overrides::default()
        })
        .unwrap();
        assert_eq!(eff.output, "human");
        assert!(eff.history_dir.ends_with("elsewhere"));
    }

    #[test]
    fn test_invalid_and_duplicate_tools_are_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("warnscope.toml"), "[[tools]]\nkind = \"nope\"\n").unwrap();
        assert!(matches!(
            resolve_effective(&overrides(root)),
            Err(WarnscopeError::InvalidConfig { .. })
        ));

        fs::write(
            root.join("warnscope.toml"),
            "[[tools]]\nkind = \"pmd\"\n[[tools]]\nkind = \"pmd\"\n",
        )
        .unwrap();
        assert!(matches!(
            resolve_effective(&overrides(root)),
            Err(WarnscopeError::DuplicateToolId(id)) if id == "pmd"
        ));
    }

    #[test]
    fn test_non_positive_gate_threshold_is_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("warnscope.toml"),
            "[[tools]]\nkind = \"pmd\"\n[[quality_gates]]\nthreshold = 0\ntype = \"TOTAL\"\n",
        )
        .unwrap();
        let err = resolve_effective(&overrides(root)).unwrap_err();
        assert!(matches!(err, WarnscopeError::InvalidConfig { .. }));
        assert!(err.to_string().contains("threshold must be positive (got 0)"));
    }

    #[test]
    fn test_repo_root_detection_stops_at_git() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("a/b")).unwrap();
        assert_eq!(detect_repo_root(&root.join("a/b")), root.to_path_buf());
    }
}
