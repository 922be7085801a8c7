//! Include/exclude filters over issue properties.
//!
//! An issue is kept when it matches at least one include filter (if any
//! include filter is configured) and no exclude filter. Patterns are
//! regular expressions that must match the whole property value.

use crate::error::{Result, WarnscopeError};
use crate::models::recorder::{FilterCfg, FilterKind};
use crate::models::{Issue, Report};
use regex::Regex;

/// A compiled filter.
pub struct IssueFilter {
    kind: FilterKind,
    regex: Regex,
}

impl IssueFilter {
    pub fn compile(cfg: &FilterCfg) -> Result<Self> {
        let anchored = format!("^(?:{})$", cfg.pattern);
        let regex = Regex::new(&anchored).map_err(|source| WarnscopeError::FilterPattern {
            pattern: cfg.pattern.clone(),
            source,
        })?;
        Ok(IssueFilter {
            kind: cfg.kind,
            regex,
        })
    }

    fn property<'a>(&self, issue: &'a Issue) -> &'a str {
        match self.kind {
            FilterKind::IncludeCategory | FilterKind::ExcludeCategory => &issue.category,
            FilterKind::IncludeType | FilterKind::ExcludeType => &issue.issue_type,
            FilterKind::IncludeFile | FilterKind::ExcludeFile => &issue.file_name,
            FilterKind::IncludePackage | FilterKind::ExcludePackage => &issue.package_name,
            FilterKind::IncludeModule | FilterKind::ExcludeModule => &issue.module_name,
            FilterKind::IncludeMessage | FilterKind::ExcludeMessage => &issue.message,
        }
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        self.regex.is_match(self.property(issue))
    }

    pub fn is_include(&self) -> bool {
        self.kind.is_include()
    }
}

/// Counts reported after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub before: usize,
    pub removed: usize,
    pub after: usize,
}

/// Compile all configured filters, keeping their order.
pub fn compile_all(cfgs: &[FilterCfg]) -> Result<Vec<IssueFilter>> {
    cfgs.iter().map(IssueFilter::compile).collect()
}

/// True when `issue` survives `filters`.
pub fn accepts(filters: &[IssueFilter], issue: &Issue) -> bool {
    let mut includes = filters.iter().filter(|f| f.is_include()).peekable();
    let included = includes.peek().is_none() || includes.any(|f| f.matches(issue));
    included
        && !filters
            .iter()
            .filter(|f| !f.is_include())
            .any(|f| f.matches(issue))
}

/// Apply `filters` to the report's issues and log the outcome.
pub fn apply(report: &mut Report, filters: &[IssueFilter]) -> FilterOutcome {
    let before = report.issues.len();
    if filters.is_empty() {
        report.log.info(format!(
            "No filter has been set, publishing all {} issues",
            before
        ));
        return FilterOutcome {
            before,
            removed: 0,
            after: before,
        };
    }
    report.issues.retain(|issue| accepts(filters, issue));
    let after = report.issues.len();
    let outcome = FilterOutcome {
        before,
        removed: before - after,
        after,
    };
    report.log.info(format!(
        "Applying {} filters on the set of {} issues ({} issues have been removed, {} issues will be published)",
        filters.len(),
        outcome.before,
        outcome.removed,
        outcome.after
    ));
    outcome
}
