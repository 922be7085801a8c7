//! Post-processing of parsed issues: absolute paths, affected-file copies,
//! module names, package names and fingerprints. Every step is non-fatal;
//! problems are recorded as error messages of the report.

pub mod fingerprint;
pub mod modules;
pub mod packages;
pub mod paths;

use crate::models::Report;
use std::path::{Path, PathBuf};

/// Inputs shared by all post-processing steps.
pub struct PostProcessContext<'a> {
    pub workspace: &'a Path,
    pub source_directories: &'a [PathBuf],
    /// Folder receiving copies of affected files; `None` disables copying.
    pub sources_dir: Option<&'a Path>,
    pub encoding: &'a str,
    pub node: &'a str,
}

impl PostProcessContext<'_> {
    /// True when `path` lies inside the workspace or a source directory.
    pub fn is_permitted(&self, path: &Path) -> bool {
        path.starts_with(self.workspace)
            || self
                .source_directories
                .iter()
                .any(|dir| path.starts_with(dir))
    }
}

pub(crate) fn is_utf8(encoding: &str) -> bool {
    matches!(
        encoding.to_ascii_uppercase().replace('-', "").as_str(),
        "UTF8" | ""
    )
}

/// Run all post-processing steps in order.
pub fn post_process(report: &mut Report, ctx: &PostProcessContext<'_>) {
    report.log.info(format!(
        "Post processing issues on '{}' with source code encoding '{}'",
        ctx.node, ctx.encoding
    ));
    if !is_utf8(ctx.encoding) {
        report.log.info(format!(
            "-> encoding '{}' is not supported, reading sources as UTF-8",
            ctx.encoding
        ));
    }
    paths::resolve_paths(report, ctx);
    paths::copy_affected_files(report, ctx);
    modules::resolve_modules(report, ctx.workspace);
    packages::resolve_packages(report);
    fingerprint::create_fingerprints(report);
    tracing::debug!(tool = %report.id, issues = report.issues.len(), "post processing done");
}
