//! Fixed-step time integrators.

use pc_core::CylResult;

use crate::model::TransientModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step with the input held constant.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        x: &M::State,
        u: &M::Input,
        dt: f64,
    ) -> CylResult<M::State>;
}

/// Forward Euler (explicit, 1st order): x_new = x + dt * rhs(x, u).
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        x: &M::State,
        u: &M::Input,
        dt: f64,
    ) -> CylResult<M::State> {
        let xdot = model.rhs(x, u)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}
