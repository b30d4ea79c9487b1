//! Exact state linearization control law.
//!
//! In linearized coordinates the plant is `z1' = z2`, `z2' = z3`, `z3' = v`
//! with the virtual input
//!
//! ```text
//! v = −(c/m)·x2 − (A/m)·(x2·x3/x1) + (A/m)·(x3/(A·x1))·u
//! ```
//!
//! Solving for `u` gives the physical volumetric flow:
//!
//! ```text
//! u = m·(x1/x3)·((c/m)·x2 + (A/m)·(x2·x3/x1) + v)
//! v = −(r1·z1 + r2·z2 + r3·z3) + f·w
//! ```

use pc_core::{CylError, CylResult, PlantParameters, PlantState, Real};

use crate::gains::{GainSet, compute_gains};
use crate::transform::{LinearizedState, transform};

/// Position and pressure at or below this are treated as singular.
pub const SINGULAR_EPSILON: Real = 1e-9;

/// Feedback-linearizing controller for one cylinder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLaw {
    pub gains: GainSet,
    /// Guard threshold for `x1` and `x3`.
    pub singular_epsilon: Real,
}

impl ControlLaw {
    pub fn new(gains: GainSet) -> Self {
        Self {
            gains,
            singular_epsilon: SINGULAR_EPSILON,
        }
    }

    /// Controller with all closed-loop poles at `pole`.
    pub fn from_pole(pole: Real) -> CylResult<Self> {
        Ok(Self::new(compute_gains(pole)?))
    }

    /// Linear state feedback in canonical coordinates.
    pub fn virtual_input(&self, z: &LinearizedState, setpoint: Real) -> Real {
        let g = &self.gains;
        -(g.r1 * z.z1 + g.r2 * z.z2 + g.r3 * z.z3) + g.f * setpoint
    }

    /// Volumetric flow `u` that drives the plant as the stabilized chain.
    ///
    /// Fails with [`CylError::SingularInput`] instead of returning a
    /// non-finite value.
    pub fn compute_input(
        &self,
        state: &PlantState,
        setpoint: Real,
        params: &PlantParameters,
    ) -> CylResult<Real> {
        let PlantState { x1, x2, x3 } = *state;
        // NaN fails both comparisons, so test for the admissible side.
        if !(x1 > self.singular_epsilon) || !x1.is_finite() {
            return Err(CylError::SingularInput {
                what: "position at or below singular threshold",
                value: x1,
            });
        }
        if !(x3 > self.singular_epsilon) || !x3.is_finite() {
            return Err(CylError::SingularInput {
                what: "pressure at or below singular threshold",
                value: x3,
            });
        }

        let z = transform(state, params);
        let v = self.virtual_input(&z, setpoint);
        let compensation =
            params.spring_ratio() * x2 + params.area_ratio() * (x2 * x3 / x1) + v;
        let u = params.mass * (x1 / x3) * compensation;

        if !u.is_finite() {
            return Err(CylError::SingularInput {
                what: "control input is not finite",
                value: u,
            });
        }
        Ok(u)
    }
}

/// Control input for `state` with explicit gains.
pub fn compute_input(
    state: &PlantState,
    setpoint: Real,
    gains: &GainSet,
    params: &PlantParameters,
) -> CylResult<Real> {
    ControlLaw::new(*gains).compute_input(state, setpoint, params)
}
