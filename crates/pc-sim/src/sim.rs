//! Simulation runner and result recording.

use pc_controls::SetpointSchedule;
use pc_core::{CylError, CylResult, PlantState};
use tracing::{debug, warn};

use crate::driver::StepDriver;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t_end: 1.0,
            max_steps: 10_000_000,
            record_every: 10,
        }
    }
}

/// Record of simulation results.
///
/// `u[i]` is the flow applied over the step that ended at `t[i]`; the
/// initial sample carries zero flow.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<PlantState>,
    /// Applied control input (m³/s)
    pub u: Vec<f64>,
    /// Setpoint in effect (m)
    pub w: Vec<f64>,
    /// The run hit `max_steps` before reaching `t_end`.
    pub truncated: bool,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn final_state(&self) -> Option<PlantState> {
        self.x.last().copied()
    }

    /// Measured output `y = x1` at every sample.
    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.x.iter().map(|x| x.x1)
    }

    fn push(&mut self, t: f64, x: PlantState, u: f64, w: f64) {
        self.t.push(t);
        self.x.push(x);
        self.u.push(u);
        self.w.push(w);
    }
}

/// Drive `driver` from its current time to `opts.t_end`, taking the
/// setpoint from `schedule` before every step.
pub fn run_sim(
    driver: &mut StepDriver,
    schedule: &SetpointSchedule,
    opts: &SimOptions,
) -> CylResult<SimRecord> {
    if opts.max_steps == 0 {
        return Err(CylError::InvalidConfiguration {
            what: "max_steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(CylError::InvalidConfiguration {
            what: "record_every must be positive",
        });
    }
    let t0 = driver.time();
    if !opts.t_end.is_finite() || opts.t_end < t0 {
        return Err(CylError::InvalidConfiguration {
            what: "t_end must not precede the current time",
        });
    }

    let h = driver.instance().step_size();
    let requested = ((opts.t_end - t0) / h).round() as usize;
    let steps = requested.min(opts.max_steps);
    if steps < requested {
        warn!(
            requested,
            max_steps = opts.max_steps,
            t_reached = t0 + steps as f64 * h,
            t_end = opts.t_end,
            "run capped by max_steps; stopping early"
        );
    }
    debug!(t0, t_end = opts.t_end, steps, "starting simulation run");

    let w0 = schedule.value_at(t0);
    driver.set_setpoint(w0)?;

    let mut record = SimRecord {
        truncated: steps < requested,
        ..SimRecord::default()
    };
    record.push(t0, driver.get_state(), 0.0, w0);

    let mut last_recorded = 0;
    for step in 1..=steps {
        driver.set_setpoint(schedule.value_at(driver.time()))?;
        let out = driver.step()?;

        if step % opts.record_every == 0 {
            record.push(out.time, driver.get_state(), out.input, out.setpoint);
            last_recorded = step;
        }
        if step == steps && last_recorded != steps {
            // Always record final state
            record.push(out.time, driver.get_state(), out.input, out.setpoint);
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::InstanceConfig;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.t_end, 1.0);
        assert_eq!(opts.record_every, 10);
    }

    #[test]
    fn decimation_keeps_initial_and_final_samples() {
        let mut driver = StepDriver::new(InstanceConfig::default()).unwrap();
        let schedule = SetpointSchedule::constant(0.05).unwrap();
        let opts = SimOptions {
            t_end: 0.025,
            max_steps: 1000,
            record_every: 10,
        };
        let record = run_sim(&mut driver, &schedule, &opts).unwrap();

        // t = 0, 0.010, 0.020, 0.025
        assert_eq!(record.len(), 4);
        assert_eq!(record.t[0], 0.0);
        assert!((record.t[3] - 0.025).abs() < 1e-12);
        assert_eq!(record.u[0], 0.0);
        assert_eq!(driver.step_index(), 25);
        assert_eq!(record.final_state(), Some(driver.get_state()));
        assert!(!record.truncated);
    }

    #[test]
    fn max_steps_caps_run() {
        let mut driver = StepDriver::new(InstanceConfig::default()).unwrap();
        let schedule = SetpointSchedule::constant(0.05).unwrap();
        let opts = SimOptions {
            t_end: 10.0,
            max_steps: 7,
            record_every: 1,
        };
        let record = run_sim(&mut driver, &schedule, &opts).unwrap();
        assert_eq!(record.len(), 8);
        assert_eq!(driver.step_index(), 7);
        assert!(record.truncated);
        assert!((record.t[7] - 0.007).abs() < 1e-12);
    }

    #[test]
    fn invalid_options_rejected() {
        let mut driver = StepDriver::new(InstanceConfig::default()).unwrap();
        let schedule = SetpointSchedule::constant(0.05).unwrap();
        let bad = [
            SimOptions {
                max_steps: 0,
                ..SimOptions::default()
            },
            SimOptions {
                record_every: 0,
                ..SimOptions::default()
            },
            SimOptions {
                t_end: -1.0,
                ..SimOptions::default()
            },
        ];
        for opts in bad {
            let err = run_sim(&mut driver, &schedule, &opts).unwrap_err();
            assert!(matches!(err, CylError::InvalidConfiguration { .. }));
        }
        assert_eq!(driver.step_index(), 0);
    }

    #[test]
    fn schedule_is_sampled_before_each_step() {
        let mut driver = StepDriver::new(InstanceConfig::default()).unwrap();
        let schedule = SetpointSchedule::from_pairs(&[(0.0, 0.03), (0.005, 0.06)]).unwrap();
        let opts = SimOptions {
            t_end: 0.01,
            max_steps: 100,
            record_every: 1,
        };
        let record = run_sim(&mut driver, &schedule, &opts).unwrap();

        // Step ending at t = 0.005 started at 0.004 and still saw 0.03.
        assert_eq!(record.w[5], 0.03);
        assert_eq!(record.w[6], 0.06);
        assert_eq!(driver.instance().setpoint(), 0.06);
    }
}
