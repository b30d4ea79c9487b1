//! TransientModel trait for pluggable dynamic systems.

use pc_core::CylResult;

/// Trait for transient (dynamic) system models driven by an external input.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots); also used for derivatives
/// - RHS computation: x_dot = f(x, u)
/// - Vector arithmetic for integration: add states, scale by scalar
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Input held constant over one step.
    type Input;

    /// Compute state derivative dxdt = f(x, u).
    fn rhs(&self, x: &Self::State, u: &Self::Input) -> CylResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}
