//! Fixed-step simulation of a single-acting pneumatic cylinder under
//! exact-linearization control.
//!
//! Provides:
//! - Nonlinear plant dynamics with position/pressure saturation
//! - Forward Euler fixed-step integration
//! - Simulation instances and the causal step driver
//! - A runner that drives an instance through a setpoint schedule

pub mod cylinder;
pub mod driver;
pub mod integrator;
pub mod model;
pub mod sim;

// Internal modules
mod events;

// Re-exports for public API
pub use cylinder::PneumaticCylinder;
pub use driver::{DriverPhase, InstanceConfig, SimulationInstance, StepDriver, StepOutput};
pub use integrator::{ForwardEuler, Integrator};
pub use model::TransientModel;
pub use pc_core::{CylError, CylResult, PlantParameters, PlantState};
pub use sim::{SimOptions, SimRecord, run_sim};
