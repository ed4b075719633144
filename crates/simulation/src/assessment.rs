//! Overall assessment text.

use riskcast_core::RiskAnalysis;

use crate::stats::Summary;

/// Working hours per reported day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Compose the natural-language summary of a run.
pub fn overall_assessment(project: &Summary, risk: &RiskAnalysis) -> String {
    let mean = project.mean;
    let mut text = format!(
        "The project is expected to take {:.1} days ({:.1} hours) on average. ",
        mean / HOURS_PER_DAY,
        mean
    );

    let cv = project.coefficient_of_variation();
    text.push_str(if cv < 0.2 {
        "Schedule uncertainty is low, so the forecast is stable. "
    } else if cv < 0.4 {
        "The schedule forecast carries moderate uncertainty. "
    } else {
        "Schedule uncertainty is high and needs attention. "
    });

    let combined = risk.combined_risk();
    text.push_str(if combined < 0.2 {
        "Overall risk is low."
    } else if combined < 0.5 {
        "Overall risk is moderate; keep it under watch."
    } else {
        "Overall risk is high; act on it now."
    });

    text
}
