//! Quality gate evaluation.

use crate::models::recorder::{GateOutcome, QualityGateCfg};
use crate::models::{AnalysisResult, QualityGateStatus};

fn missed_status(outcome: GateOutcome) -> QualityGateStatus {
    match outcome {
        GateOutcome::Unstable => QualityGateStatus::Warning,
        GateOutcome::Failed => QualityGateStatus::Failed,
    }
}

/// Status of a single gate for `result`, with the actual count.
pub fn check(result: &AnalysisResult, gate: &QualityGateCfg) -> (QualityGateStatus, i64) {
    let actual = result.count(gate.count_type);
    let status = if actual >= gate.threshold {
        missed_status(gate.result)
    } else {
        QualityGateStatus::Passed
    };
    (status, actual)
}

/// Evaluate all gates, store the overall status in `result` and log one
/// line per gate.
pub fn evaluate(result: &mut AnalysisResult, gates: &[QualityGateCfg]) -> QualityGateStatus {
    if gates.is_empty() {
        result.log.info("No quality gates have been set - skipping");
        result.quality_gate = QualityGateStatus::Inactive;
        return result.quality_gate;
    }
    result.log.info("Evaluating quality gates");
    let mut overall = QualityGateStatus::Passed;
    for gate in gates {
        let (status, actual) = check(result, gate);
        result.log.info(format!(
            "-> {} - {}: {} - Quality Gate: {}",
            status.name(),
            gate.count_type.label(),
            actual,
            gate.threshold
        ));
        overall = overall.max(status);
    }
    if overall.is_successful() {
        result.log.info("-> All quality gates have been passed");
    } else {
        result.log.info(format!(
            "-> Some quality gates have been missed: overall result is {}",
            overall.name()
        ));
    }
    result.quality_gate = overall;
    overall
}
