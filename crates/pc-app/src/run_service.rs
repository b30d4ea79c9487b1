//! Run execution service.

use std::time::Instant;

use pc_core::PlantState;
use pc_project::{OutputVariable, Scenario};
use pc_sim::{SimRecord, run_sim};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::compile::compile_scenario;
use crate::error::{AppError, AppResult};

/// Relative band around the setpoint used for the settling time.
pub const SETTLING_BAND: f64 = 0.01;

/// Command-line style overrides applied on top of a scenario.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub stop_time_s: Option<f64>,
    pub step_size_s: Option<f64>,
}

impl RunOverrides {
    pub fn apply(&self, scenario: &Scenario) -> Scenario {
        let mut scenario = scenario.clone();
        if let Some(t) = self.stop_time_s {
            scenario.simulation.stop_time_s = t;
        }
        if let Some(h) = self.step_size_s {
            scenario.simulation.step_size_s = h;
        }
        scenario
    }
}

/// Concise summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub name: String,
    pub steps: u64,
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub final_state: PlantState,
    pub final_setpoint: f64,
    /// Flow applied over the last step (m³/s).
    pub final_flow: f64,
    pub position_range: (f64, f64),
    pub pressure_range: (f64, f64),
    /// Time after which every recorded position stays within
    /// [`SETTLING_BAND`] of its setpoint; `None` if the run ends outside.
    pub settling_time: Option<f64>,
    pub wall_time_s: f64,
    /// The step cap ended the run before `stop_time_s`.
    pub truncated: bool,
}

/// Result of executing one scenario.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub record: SimRecord,
    pub outputs: Vec<OutputVariable>,
}

pub fn run_scenario(scenario: &Scenario) -> AppResult<RunOutput> {
    let started = Instant::now();
    let compiled = compile_scenario(scenario)?;
    let mut driver = compiled.driver()?;

    info!(
        name = %scenario.name,
        t_end = compiled.options.t_end,
        step_size = compiled.config.step_size,
        "running scenario"
    );

    let record = run_sim(&mut driver, &compiled.schedule, &compiled.options).inspect_err(
        |err| warn!(name = %scenario.name, error = %err, "scenario run failed"),
    )?;

    let summary = summarize(
        &scenario.name,
        driver.step_index(),
        &record,
        started.elapsed().as_secs_f64(),
    )?;
    info!(
        name = %scenario.name,
        steps = summary.steps,
        final_position = summary.final_state.x1,
        wall_time_s = summary.wall_time_s,
        truncated = summary.truncated,
        "scenario finished"
    );

    Ok(RunOutput {
        summary,
        record,
        outputs: scenario.outputs.clone(),
    })
}

pub fn run_scenario_with(scenario: &Scenario, overrides: &RunOverrides) -> AppResult<RunOutput> {
    run_scenario(&overrides.apply(scenario))
}

/// Run independent scenarios in parallel, one instance per scenario.
///
/// Results come back in input order.
pub fn run_batch(scenarios: &[Scenario]) -> Vec<AppResult<RunOutput>> {
    scenarios.par_iter().map(run_scenario).collect()
}

fn summarize(name: &str, steps: u64, record: &SimRecord, wall_time_s: f64) -> AppResult<RunSummary> {
    let (
        Some(&t_first),
        Some(&t_last),
        Some(final_state),
        Some(&final_setpoint),
        Some(&final_flow),
    ) = (
        record.t.first(),
        record.t.last(),
        record.final_state(),
        record.w.last(),
        record.u.last(),
    )
    else {
        return Err(AppError::InvalidInput(
            "run produced no samples".to_string(),
        ));
    };

    Ok(RunSummary {
        name: name.to_string(),
        steps,
        time_range: (t_first, t_last),
        record_count: record.len(),
        final_state,
        final_setpoint,
        final_flow,
        position_range: value_range(record.x.iter().map(|x| x.x1)),
        pressure_range: value_range(record.x.iter().map(|x| x.x3)),
        settling_time: settling_time(record, SETTLING_BAND),
        wall_time_s,
        truncated: record.truncated,
    })
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// First recorded time from which the position stays inside the band.
pub fn settling_time(record: &SimRecord, band: f64) -> Option<f64> {
    let outside = |i: usize| {
        let w = record.w[i];
        (record.x[i].x1 - w).abs() > band * w.abs()
    };

    let n = record.len();
    if n == 0 || outside(n - 1) {
        return None;
    }
    match (0..n).rev().find(|&i| outside(i)) {
        Some(i) => Some(record.t[i + 1]),
        None => record.t.first().copied(),
    }
}
