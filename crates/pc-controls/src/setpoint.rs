//! Piecewise-constant setpoint schedules.
//!
//! A schedule is a list of `(time, value)` samples. Between samples the
//! last value is held (zero-order hold); before the first sample its value
//! applies.

use pc_core::{CylError, CylResult, Real};

/// Sample times within this fraction of the query time (and never less
/// than this many seconds) count as reached. Step times `t0 + k·h` can land
/// a few ulps below a sample time.
const TIME_SLACK: Real = 1e-12;

/// One schedule sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetpointPoint {
    /// Time at which the value takes effect (seconds).
    pub time: Real,
    /// Setpoint value (m).
    pub value: Real,
}

/// Zero-order-hold setpoint over simulation time.
#[derive(Debug, Clone, PartialEq)]
pub struct SetpointSchedule {
    points: Vec<SetpointPoint>,
}

impl SetpointSchedule {
    /// Build a schedule from samples in any order.
    ///
    /// Samples are sorted by time; samples sharing a time keep their input
    /// order, so the later one wins.
    pub fn new(mut points: Vec<SetpointPoint>) -> CylResult<Self> {
        if points.is_empty() {
            return Err(CylError::InvalidConfiguration {
                what: "setpoint schedule must have at least one sample",
            });
        }
        if points
            .iter()
            .any(|p| !p.time.is_finite() || !p.value.is_finite())
        {
            return Err(CylError::InvalidConfiguration {
                what: "setpoint schedule samples must be finite",
            });
        }
        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: &[(Real, Real)]) -> CylResult<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(time, value)| SetpointPoint { time, value })
                .collect(),
        )
    }

    /// A setpoint that never changes.
    pub fn constant(value: Real) -> CylResult<Self> {
        Self::new(vec![SetpointPoint { time: 0.0, value }])
    }

    pub fn points(&self) -> &[SetpointPoint] {
        &self.points
    }

    /// Held value at time `t`.
    pub fn value_at(&self, t: Real) -> Real {
        let slack = TIME_SLACK * t.abs().max(1.0);
        // Index of the first sample strictly after t (with slack).
        let idx = self.points.partition_point(|p| p.time <= t + slack);
        match idx {
            0 => self.points[0].value,
            n => self.points[n - 1].value,
        }
    }
}
