//! Health report: maps the number of relevant issues to a 0-100 score.

use crate::models::recorder::HealthCfg;
use crate::models::{AnalysisResult, Severity};

/// Score for `count` issues between the `healthy` and `unhealthy` marks.
pub fn score(count: usize, healthy: u32, unhealthy: u32) -> u32 {
    let count = count as u64;
    let (healthy, unhealthy) = (u64::from(healthy), u64::from(unhealthy));
    if count <= healthy {
        100
    } else if count >= unhealthy {
        0
    } else {
        (100 - (count - healthy) * 100 / (unhealthy - healthy)) as u32
    }
}

/// Thresholds when the report is enabled.
pub fn thresholds(cfg: &HealthCfg) -> Option<(u32, u32)> {
    match (cfg.healthy, cfg.unhealthy) {
        (Some(h), Some(u)) if h < u => Some((h, u)),
        _ => None,
    }
}

/// Compute and store the health score of `result`.
pub fn apply(result: &mut AnalysisResult, cfg: &HealthCfg) -> Option<u32> {
    let Some((healthy, unhealthy)) = thresholds(cfg) else {
        result.log.info("Health report is disabled - skipping");
        result.health = None;
        return None;
    };
    result.log.info(format!(
        "Enabling health report (Healthy={}, Unhealthy={}, Minimum Severity={})",
        healthy,
        unhealthy,
        cfg.minimum_severity.display_name().to_uppercase()
    ));
    let relevant = count_at_least(result, cfg.minimum_severity);
    let value = score(relevant, healthy, unhealthy);
    result.health = Some(value);
    Some(value)
}

fn count_at_least(result: &AnalysisResult, minimum: Severity) -> usize {
    result
        .issues
        .iter()
        .filter(|i| i.severity.is_at_least(minimum))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, MessageLog, QualityGateStatus};

    #[test]
    fn test_score_is_linear_between_marks() {
        assert_eq!(score(0, 2, 10), 100);
        assert_eq!(score(2, 2, 10), 100);
        assert_eq!(score(6, 2, 10), 50);
        assert_eq!(score(9, 2, 10), 13);
        assert_eq!(score(10, 2, 10), 0);
        assert_eq!(score(50, 2, 10), 0);
    }

    #[test]
    fn test_disabled_without_valid_marks() {
        let disabled = |h, u| {
            thresholds(&HealthCfg {
                healthy: h,
                unhealthy: u,
                minimum_severity: Severity::Low,
            })
            .is_none()
        };
        assert!(disabled(None, Some(5)));
        assert!(disabled(Some(5), Some(5)));
        assert!(disabled(Some(6), Some(5)));
        assert!(!disabled(Some(0), Some(1)));
    }

    #[test]
    fn test_minimum_severity_limits_counted_issues() {
        let mut result = AnalysisResult {
            id: "pmd".into(),
            name: "PMD".into(),
            build: 1,
            issues: vec![
                Issue::new("pmd", "A.java", 1, Severity::High, "a"),
                Issue::new("pmd", "A.java", 2, Severity::Normal, "b"),
                Issue::new("pmd", "A.java", 3, Severity::Low, "c"),
            ],
            new_issues: Vec::new(),
            fixed_issues: Vec::new(),
            reference_build: None,
            reference_total: None,
            quality_gate: QualityGateStatus::Inactive,
            health: None,
            no_issues_since: None,
            tools: Vec::new(),
            log: MessageLog::default(),
        };
        let cfg = HealthCfg {
            healthy: Some(0),
            unhealthy: Some(4),
            minimum_severity: Severity::Normal,
        };
        assert_eq!(apply(&mut result, &cfg), Some(50));
        assert_eq!(
            result.log.info,
            vec!["Enabling health report (Healthy=0, Unhealthy=4, Minimum Severity=NORMAL)".to_string()]
        );
    }
}
