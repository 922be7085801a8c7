//! New / fixed / outstanding classification against a reference build.
//!
//! Matching runs in two passes. The first pairs issues with identical
//! identity, the second pairs the leftovers by fingerprint when origin,
//! category and type agree as well. Unpaired current issues are new,
//! unpaired reference issues are fixed.

use crate::models::{AnalysisResult, Issue, IssueKey};
use std::collections::HashMap;
use std::fmt::Display;

type PrintKey<'a> = (&'a str, &'a str, &'a str, &'a str);

fn print_key(issue: &Issue) -> Option<PrintKey<'_>> {
    issue.fingerprint.as_deref().map(|fp| {
        (
            fp,
            issue.origin.as_str(),
            issue.category.as_str(),
            issue.issue_type.as_str(),
        )
    })
}

/// For each current issue, the index of the reference issue it matches.
pub fn match_issues(current: &[Issue], previous: &[Issue]) -> Vec<Option<usize>> {
    let mut matched: Vec<Option<usize>> = vec![None; current.len()];
    let mut taken = vec![false; previous.len()];

    // Indices are pushed in reverse so `pop` hands out the earliest one.
    let mut by_key: HashMap<IssueKey<'_>, Vec<usize>> = HashMap::new();
    for (idx, issue) in previous.iter().enumerate().rev() {
        by_key.entry(issue.key()).or_default().push(idx);
    }
    for (ci, issue) in current.iter().enumerate() {
        if let Some(pi) = by_key.get_mut(&issue.key()).and_then(Vec::pop) {
            matched[ci] = Some(pi);
            taken[pi] = true;
        }
    }

    let mut by_print: HashMap<PrintKey<'_>, Vec<usize>> = HashMap::new();
    for (idx, issue) in previous.iter().enumerate().rev() {
        if taken[idx] {
            continue;
        }
        if let Some(key) = print_key(issue) {
            by_print.entry(key).or_default().push(idx);
        }
    }
    for ci in 0..current.len() {
        if matched[ci].is_some() {
            continue;
        }
        let Some(key) = print_key(&current[ci]) else {
            continue;
        };
        if let Some(pi) = by_print.get_mut(&key).and_then(Vec::pop) {
            matched[ci] = Some(pi);
            taken[pi] = true;
        }
    }
    matched
}

/// New and fixed issues of a classification.
#[derive(Debug, Default)]
pub struct Delta {
    pub new_issues: Vec<Issue>,
    pub fixed_issues: Vec<Issue>,
}

/// Classify `current` against `previous` and stamp every current issue with
/// the build it first appeared in.
pub fn classify(current: &mut [Issue], previous: &[Issue], build: u64, reference: u64) -> Delta {
    let matched = match_issues(current, previous);
    let mut taken = vec![false; previous.len()];
    let mut delta = Delta::default();
    for (issue, m) in current.iter_mut().zip(&matched) {
        match m {
            Some(pi) => {
                taken[*pi] = true;
                let first_seen = previous[*pi].reference_build;
                issue.reference_build = if first_seen == 0 { reference } else { first_seen };
            }
            None => {
                issue.reference_build = build;
                delta.new_issues.push(issue.clone());
            }
        }
    }
    delta.fixed_issues = previous
        .iter()
        .zip(taken)
        .filter_map(|(issue, t)| (!t).then(|| issue.clone()))
        .collect();
    delta
}

/// Log which reference build the delta fields of `result` were computed
/// against, or that none qualified under `criteria`.
pub fn log_reference(result: &mut AnalysisResult, criteria: impl Display) {
    match result.reference_build {
        None => {
            result.log.info(format!(
                "No valid reference build found that meets the criteria ({})",
                criteria
            ));
            result
                .log
                .info("All reported issues will be considered outstanding");
        }
        Some(build) => {
            result.log.info(format!(
                "Using reference build #{} to compute new, fixed, and outstanding issues",
                build
            ));
            result.log.info(format!(
                "Issues delta (vs. reference build): outstanding: {}, new: {}, fixed: {}",
                result.outstanding_count(),
                result.new_count(),
                result.fixed_count()
            ));
        }
    }
}

/// Fill the delta fields of `result` and log how they were computed.
///
/// `criteria` is only used for the message emitted when no reference build
/// qualified.
pub fn apply(result: &mut AnalysisResult, reference: Option<&AnalysisResult>, criteria: impl Display) {
    match reference {
        None => {
            for issue in result.issues.iter_mut() {
                issue.reference_build = result.build;
            }
            result.new_issues.clear();
            result.fixed_issues.clear();
            result.reference_build = None;
            result.reference_total = None;
        }
        Some(reference) => {
            let delta = classify(
                &mut result.issues,
                &reference.issues,
                result.build,
                reference.build,
            );
            result.new_issues = delta.new_issues;
            result.fixed_issues = delta.fixed_issues;
            result.reference_build = Some(reference.build);
            result.reference_total = Some(reference.total());
        }
    }
    log_reference(result, criteria);
    tracing::debug!(
        id = %result.id,
        reference = ?result.reference_build,
        new = result.new_count(),
        fixed = result.fixed_count(),
        "delta computed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageLog, QualityGateStatus, Severity};

    fn issue(file: &str, line: u32, message: &str) -> Issue {
        Issue::new("checkstyle", file, line, Severity::Normal, message)
            .with_category("Javadoc")
            .with_type("JavadocMethodCheck")
    }

    fn result(build: u64, issues: Vec<Issue>) -> AnalysisResult {
        AnalysisResult {
            id: "checkstyle".into(),
            name: "CheckStyle".into(),
            build,
            issues,
            new_issues: Vec::new(),
            fixed_issues: Vec::new(),
            reference_build: None,
            reference_total: None,
            quality_gate: QualityGateStatus::Inactive,
            health: None,
            no_issues_since: None,
            tools: Vec::new(),
            log: MessageLog::default(),
        }
    }

    #[test]
    fn test_exact_matches_are_outstanding() {
        let mut previous = vec![issue("A.java", 1, "a"), issue("B.java", 2, "gone")];
        previous[0].reference_build = 1;
        previous[1].reference_build = 1;
        let mut current = vec![issue("A.java", 1, "a"), issue("C.java", 3, "c")];
        let delta = classify(&mut current, &previous, 2, 1);
        assert_eq!(delta.new_issues.len(), 1);
        assert_eq!(delta.new_issues[0].file_name, "C.java");
        assert_eq!(delta.fixed_issues.len(), 1);
        assert_eq!(delta.fixed_issues[0].message, "gone");
        assert_eq!(current[0].reference_build, 1);
        assert_eq!(current[0].age(2), 2);
        assert_eq!(current[1].age(2), 1);
    }

    #[test]
    fn test_fingerprint_matches_moved_issue() {
        let mut before = issue("A.java", 10, "a");
        before.fingerprint = Some("abc".into());
        before.reference_build = 3;
        let mut moved = issue("A.java", 12, "a");
        moved.fingerprint = Some("abc".into());
        let mut current = vec![moved];
        let delta = classify(&mut current, &[before], 5, 4);
        assert!(delta.new_issues.is_empty());
        assert!(delta.fixed_issues.is_empty());
        assert_eq!(current[0].reference_build, 3);
    }

    #[test]
    fn test_fingerprint_requires_same_type() {
        let mut before = issue("A.java", 10, "a");
        before.fingerprint = Some("abc".into());
        let mut other = issue("A.java", 12, "a").with_type("FinalParametersCheck");
        other.fingerprint = Some("abc".into());
        let mut current = vec![other];
        let delta = classify(&mut current, &[before], 2, 1);
        assert_eq!(delta.new_issues.len(), 1);
        assert_eq!(delta.fixed_issues.len(), 1);
    }

    #[test]
    fn test_duplicates_are_matched_one_to_one() {
        let previous = vec![issue("A.java", 1, "a")];
        let mut current = vec![issue("A.java", 1, "a"), issue("A.java", 1, "a")];
        let delta = classify(&mut current, &previous, 2, 1);
        assert_eq!(delta.new_issues.len(), 1);
        assert!(delta.fixed_issues.is_empty());
    }

    #[test]
    fn test_without_reference_everything_is_outstanding() {
        let mut r = result(1, vec![issue("A.java", 1, "a"), issue("B.java", 1, "b")]);
        apply(&mut r, None, "NO_JOB_FAILURE - SUCCESSFUL_QUALITY_GATE");
        assert_eq!(r.new_count(), 0);
        assert_eq!(r.fixed_count(), 0);
        assert_eq!(r.outstanding_count(), 2);
        assert_eq!(
            r.log.info,
            vec![
                "No valid reference build found that meets the criteria (NO_JOB_FAILURE - SUCCESSFUL_QUALITY_GATE)"
                    .to_string(),
                "All reported issues will be considered outstanding".to_string(),
            ]
        );
    }

    #[test]
    fn test_totals_balance_with_reference() {
        let reference = result(1, vec![issue("A.java", 1, "a"), issue("B.java", 1, "b")]);
        let mut r = result(
            2,
            vec![issue("A.java", 1, "a"), issue("C.java", 1, "c"), issue("D.java", 1, "d")],
        );
        apply(&mut r, Some(&reference), "unused");
        assert_eq!(r.total(), r.new_count() + r.outstanding_count());
        assert_eq!((r.new_count(), r.fixed_count(), r.outstanding_count()), (2, 1, 1));
        assert_eq!(r.reference_build, Some(1));
        assert_eq!(r.reference_total, Some(2));
        assert!(r.log.info.contains(
            &"Issues delta (vs. reference build): outstanding: 1, new: 2, fixed: 1".to_string()
        ));
    }
}
