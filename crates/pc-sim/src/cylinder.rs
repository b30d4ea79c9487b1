//! Single-acting pneumatic cylinder without valve.
//!
//! State `x = (x1, x2, x3)` = piston position, velocity and chamber
//! pressure; input `u` = volumetric flow into the chamber.
//!
//! ```text
//! dx1/dt = x2
//! dx2/dt = −(c/m)·x1 + (A/m)·x3
//! dx3/dt = −(x2·x3)/x1 + (x3/(A·x1))·u
//! ```
//!
//! The dynamics are singular at `x1 = 0` and the input decouples at
//! `x3 = 0`, so every step ends by clamping position and pressure into the
//! limits given by [`PlantParameters`]. Both lower limits are positive.

use pc_core::{CylError, CylResult, PlantParameters, PlantState, ensure_finite};

use crate::events::saturate;
use crate::integrator::{ForwardEuler, Integrator};
use crate::model::TransientModel;

#[derive(Clone, Debug, PartialEq)]
pub struct PneumaticCylinder {
    params: PlantParameters,
}

impl PneumaticCylinder {
    /// Create a cylinder model from validated parameters.
    pub fn new(params: PlantParameters) -> CylResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PlantParameters {
        &self.params
    }

    /// Time derivative of the state under input `u`.
    ///
    /// # Errors
    /// [`CylError::NumericalInstability`] if any component is not finite,
    /// which only happens once the state has left the admissible box.
    pub fn derivative(&self, state: &PlantState, u: f64) -> CylResult<PlantState> {
        let p = &self.params;
        let PlantState { x1, x2, x3 } = *state;

        let dx1 = ensure_finite(x2, "position derivative")?;
        let dx2 = ensure_finite(
            -p.spring_ratio() * x1 + p.area_ratio() * x3,
            "velocity derivative",
        )?;
        let dx3 = ensure_finite(
            -(x2 * x3) / x1 + (x3 / (p.area * x1)) * u,
            "pressure derivative",
        )?;

        Ok(PlantState::new(dx1, dx2, dx3))
    }

    /// Advance one fixed step with forward Euler and saturate.
    pub fn step(&self, state: &PlantState, u: f64, dt: f64) -> CylResult<PlantState> {
        self.step_with(&ForwardEuler, state, u, dt)
    }

    /// Advance one fixed step with the given integrator and saturate.
    pub fn step_with<I: Integrator>(
        &self,
        integrator: &I,
        state: &PlantState,
        u: f64,
        dt: f64,
    ) -> CylResult<PlantState> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CylError::InvalidConfiguration {
                what: "step size must be positive",
            });
        }

        let raw = integrator.step(self, state, &u, dt)?;
        ensure_finite(raw.x1, "integrated position")?;
        ensure_finite(raw.x2, "integrated velocity")?;
        ensure_finite(raw.x3, "integrated pressure")?;

        Ok(saturate(&self.params, raw))
    }

    /// Measured output `y = x1`.
    pub fn output(state: &PlantState) -> f64 {
        state.x1
    }
}

impl TransientModel for PneumaticCylinder {
    type State = PlantState;
    type Input = f64;

    fn rhs(&self, x: &PlantState, u: &f64) -> CylResult<PlantState> {
        self.derivative(x, *u)
    }

    fn add(&self, a: &PlantState, b: &PlantState) -> PlantState {
        PlantState::new(a.x1 + b.x1, a.x2 + b.x2, a.x3 + b.x3)
    }

    fn scale(&self, a: &PlantState, scale: f64) -> PlantState {
        PlantState::new(a.x1 * scale, a.x2 * scale, a.x3 * scale)
    }
}
