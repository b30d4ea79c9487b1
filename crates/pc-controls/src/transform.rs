//! Change of coordinates into the canonical (linearized) form.

use pc_core::{PlantParameters, PlantState, Real};

/// Linearized coordinates: position, velocity, acceleration.
///
/// A view computed from a [`PlantState`]; it is never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearizedState {
    pub z1: Real,
    pub z2: Real,
    pub z3: Real,
}

/// `z1 = x1`, `z2 = x2`, `z3 = −(c/m)·x1 + (A/m)·x3`.
pub fn transform(state: &PlantState, params: &PlantParameters) -> LinearizedState {
    LinearizedState {
        z1: state.x1,
        z2: state.x2,
        z3: -params.spring_ratio() * state.x1 + params.area_ratio() * state.x3,
    }
}
