//! Per-property breakdowns of a result and the tabs they enable.

use crate::models::{Issue, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Origin,
    Module,
    Package,
    File,
    Category,
    Type,
}

impl Property {
    pub fn value(self, issue: &Issue) -> &str {
        match self {
            Property::Origin => &issue.origin,
            Property::Module => &issue.module_name,
            Property::Package => &issue.package_name,
            Property::File => &issue.file_name,
            Property::Category => &issue.category,
            Property::Type => &issue.issue_type,
        }
    }
}

/// Issue counts per distinct property value, sorted by value.
pub fn breakdown(issues: &[Issue], property: Property) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for issue in issues {
        *counts.entry(property.value(issue).to_string()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Tools,
    Modules,
    Packages,
    Files,
    Categories,
    Types,
    Issues,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Tools,
        Tab::Modules,
        Tab::Packages,
        Tab::Files,
        Tab::Categories,
        Tab::Types,
        Tab::Issues,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Tools => "Tools",
            Tab::Modules => "Modules",
            Tab::Packages => "Packages",
            Tab::Files => "Files",
            Tab::Categories => "Categories",
            Tab::Types => "Types",
            Tab::Issues => "Issues",
        }
    }

    /// Property listed by the tab; `None` for the issues table.
    pub fn property(self) -> Option<Property> {
        match self {
            Tab::Tools => Some(Property::Origin),
            Tab::Modules => Some(Property::Module),
            Tab::Packages => Some(Property::Package),
            Tab::Files => Some(Property::File),
            Tab::Categories => Some(Property::Category),
            Tab::Types => Some(Property::Type),
            Tab::Issues => None,
        }
    }
}

/// Tabs shown for `issues`, in display order.
pub fn available_tabs(issues: &[Issue]) -> Vec<Tab> {
    Tab::ALL
        .into_iter()
        .filter(|tab| match tab.property() {
            Some(p) => breakdown(issues, p).len() > 1,
            None => true,
        })
        .collect()
}

/// The tab selected when a result is opened.
pub fn active_tab(issues: &[Issue]) -> Tab {
    available_tabs(issues).first().copied().unwrap_or(Tab::Issues)
}

/// All breakdowns of a result, as printed by `show`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub severities: BTreeMap<String, usize>,
    pub tools: BTreeMap<String, usize>,
    pub modules: BTreeMap<String, usize>,
    pub packages: BTreeMap<String, usize>,
    pub files: BTreeMap<String, usize>,
    pub categories: BTreeMap<String, usize>,
    pub types: BTreeMap<String, usize>,
}

impl Statistics {
    pub fn of(issues: &[Issue]) -> Self {
        let severities = Severity::ALL
            .into_iter()
            .map(|sev| {
                let n = issues.iter().filter(|i| i.severity == sev).count();
                (sev.display_name().to_string(), n)
            })
            .filter(|(_, n)| *n > 0)
            .collect();
        Statistics {
            severities,
            tools: breakdown(issues, Property::Origin),
            modules: breakdown(issues, Property::Module),
            packages: breakdown(issues, Property::Package),
            files: breakdown(issues, Property::File),
            categories: breakdown(issues, Property::Category),
            types: breakdown(issues, Property::Type),
        }
    }

    pub fn for_tab(&self, tab: Tab) -> Option<&BTreeMap<String, usize>> {
        match tab {
            Tab::Tools => Some(&self.tools),
            Tab::Modules => Some(&self.modules),
            Tab::Packages => Some(&self.packages),
            Tab::Files => Some(&self.files),
            Tab::Categories => Some(&self.categories),
            Tab::Types => Some(&self.types),
            Tab::Issues => None,
        }
    }
}
