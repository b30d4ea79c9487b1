//! Exact state linearization control for the pneumatic cylinder.
//!
//! The plant is brought into Brunovsky canonical form (a chain of three
//! integrators) by a change of coordinates and a compensating input. A
//! state feedback with all three closed-loop poles at one real location
//! then stabilizes the chain.
//!
//! # Pieces
//!
//! - [`gains`]: pole placement, `λ → (r1, r2, r3, f)`
//! - [`transform`]: physical state → linearized coordinates
//! - [`law`]: the control law producing the volumetric flow `u`
//! - [`setpoint`]: piecewise-constant setpoint schedules

pub mod gains;
pub mod law;
pub mod setpoint;
pub mod transform;

pub use gains::{GainSet, compute_gains};
pub use law::{ControlLaw, SINGULAR_EPSILON};
pub use setpoint::{SetpointPoint, SetpointSchedule};
pub use transform::{LinearizedState, transform};
