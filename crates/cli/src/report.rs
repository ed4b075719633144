//! Rendering of task listings and simulation results.

use std::fmt::{self, Write};

use riskcast_core::{SimulationResult, Task};
use riskcast_simulation::TaskDistribution;

/// Render a result as a human-readable report.
pub fn render(result: &SimulationResult) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, result)?;
    Ok(out)
}

/// Render a result as pretty-printed JSON.
pub fn render_json(result: &SimulationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Render loaded tasks with their sampling parameters.
pub fn render_tasks(tasks: &[Task]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Tasks ({})", tasks.len())?;
    for task in tasks {
        let dist = TaskDistribution::for_task(task);
        writeln!(
            out,
            "  {} | {} | {} | nominal {:.1}h [{:.1} / {:.1} / {:.1}]",
            task.key,
            task.priority.as_ref().map(|p| p.as_str()).unwrap_or("-"),
            task.assignee.as_deref().unwrap_or("unassigned"),
            dist.nominal,
            dist.optimistic,
            dist.most_likely,
            dist.pessimistic,
        )?;
    }
    Ok(out)
}

fn write_report(out: &mut String, result: &SimulationResult) -> fmt::Result {
    writeln!(out, "Project {} ({} simulations, seed {})", result.project_key, result.total_simulations, result.seed)?;
    writeln!(out)?;
    writeln!(out, "Duration (hours)")?;
    writeln!(out, "  P50:  {:>8.1}", result.p50_duration)?;
    writeln!(out, "  P80:  {:>8.1}", result.p80_duration)?;
    writeln!(out, "  P90:  {:>8.1}", result.p90_duration)?;
    writeln!(out, "  Mean: {:>8.1}  (sd {:.1})", result.mean_duration, result.standard_deviation)?;
    writeln!(out, "  Min:  {:>8.1}", result.min_duration)?;
    writeln!(out, "  Max:  {:>8.1}", result.max_duration)?;
    writeln!(out)?;

    writeln!(out, "Critical path")?;
    for (rank, key) in result.critical_path.iter().enumerate() {
        let mean = result
            .task_analyses
            .get(key)
            .map(|a| a.estimated_duration)
            .unwrap_or_default();
        writeln!(out, "  {}. {} ({:.1}h)", rank + 1, key, mean)?;
    }
    writeln!(out)?;

    writeln!(out, "Tasks")?;
    for analysis in result.task_analyses.values() {
        writeln!(
            out,
            "  {} | {:<6} | on time {:>5.1}% | mean {:.1}h | cv {:.2}",
            analysis.task_key,
            analysis.risk_level.as_str(),
            analysis.completion_probability * 100.0,
            analysis.estimated_duration,
            analysis.variability,
        )?;
    }
    writeln!(out)?;

    let risk = &result.risk_analysis;
    writeln!(out, "Risk")?;
    writeln!(out, "  Schedule: {:.2}", risk.schedule_risk)?;
    writeln!(out, "  Resource: {:.2}", risk.resource_risk)?;
    writeln!(out, "  Scope:    {:.2}", risk.scope_risk)?;
    if !risk.high_risk_tasks.is_empty() {
        let keys: Vec<&str> = risk.high_risk_tasks.iter().map(|k| k.as_str()).collect();
        writeln!(out, "  High-risk tasks: {}", keys.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "Recommendations")?;
    for advice in &risk.recommendations {
        writeln!(out, "  - {}", advice)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", result.overall_assessment)?;

    Ok(())
}
