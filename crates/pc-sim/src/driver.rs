//! Simulation instances and the causal step driver.
//!
//! One macro step of length `h`:
//!
//! ```text
//! u_k     = ControlLaw(x_k, w, gains, params)
//! x_{k+1} = PlantModel.step(x_k, u_k, h)
//! y_{k+1} = x_{k+1}.x1
//! ```
//!
//! A step either commits its new state or fails and leaves everything as
//! it was.

use pc_controls::{ControlLaw, GainSet};
use pc_core::{CylError, CylResult, PlantParameters, PlantState, Real};
use tracing::{debug, warn};

use crate::cylinder::PneumaticCylinder;

/// Everything needed to start one plant/controller pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceConfig {
    pub params: PlantParameters,
    pub initial_state: PlantState,
    /// Desired closed-loop pole `λ` (1/s), negative.
    pub pole: Real,
    /// Fixed macro step `h` (seconds).
    pub step_size: Real,
    /// Initial setpoint `w` (m).
    pub setpoint: Real,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        let initial_state = PlantState::default();
        Self {
            params: PlantParameters::default(),
            initial_state,
            pole: -10.0,
            step_size: 1e-3,
            setpoint: initial_state.x1,
        }
    }
}

impl InstanceConfig {
    pub fn with_setpoint(mut self, setpoint: Real) -> Self {
        self.setpoint = setpoint;
        self
    }

    pub fn with_pole(mut self, pole: Real) -> Self {
        self.pole = pole;
        self
    }

    pub fn with_step_size(mut self, step_size: Real) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_initial_state(mut self, state: PlantState) -> Self {
        self.initial_state = state;
        self
    }
}

fn check_setpoint(setpoint: Real) -> CylResult<Real> {
    if setpoint.is_finite() {
        Ok(setpoint)
    } else {
        Err(CylError::InvalidConfiguration {
            what: "setpoint must be finite",
        })
    }
}

/// One cylinder with its controller, parameters and current setpoint.
///
/// Instances share nothing; each may be moved to its own thread.
#[derive(Clone, Debug)]
pub struct SimulationInstance {
    plant: PneumaticCylinder,
    law: ControlLaw,
    pole: Real,
    state: PlantState,
    setpoint: Real,
    step_size: Real,
}

impl SimulationInstance {
    pub fn new(config: InstanceConfig) -> CylResult<Self> {
        let plant = PneumaticCylinder::new(config.params)?;
        let law = ControlLaw::from_pole(config.pole)?;
        if !config.step_size.is_finite() || config.step_size <= 0.0 {
            return Err(CylError::InvalidConfiguration {
                what: "step size must be positive",
            });
        }
        if !config.params.admits(&config.initial_state) {
            return Err(CylError::InvalidConfiguration {
                what: "initial state must lie within the plant limits",
            });
        }
        let setpoint = check_setpoint(config.setpoint)?;

        debug!(
            pole = config.pole,
            step_size = config.step_size,
            setpoint,
            "created simulation instance"
        );

        Ok(Self {
            plant,
            law,
            pole: config.pole,
            state: config.initial_state,
            setpoint,
            step_size: config.step_size,
        })
    }

    pub fn params(&self) -> &PlantParameters {
        self.plant.params()
    }

    pub fn plant(&self) -> &PneumaticCylinder {
        &self.plant
    }

    pub fn gains(&self) -> &GainSet {
        &self.law.gains
    }

    pub fn pole(&self) -> Real {
        self.pole
    }

    pub fn step_size(&self) -> Real {
        self.step_size
    }

    pub fn state(&self) -> PlantState {
        self.state
    }

    /// Restore a checkpointed state.
    ///
    /// Only states a committed step could have produced are accepted.
    pub fn set_state(&mut self, state: PlantState) -> CylResult<()> {
        if !self.params().admits(&state) {
            return Err(CylError::InvalidConfiguration {
                what: "restored state must lie within the plant limits",
            });
        }
        self.state = state;
        Ok(())
    }

    pub fn setpoint(&self) -> Real {
        self.setpoint
    }

    pub fn set_setpoint(&mut self, setpoint: Real) -> CylResult<()> {
        self.setpoint = check_setpoint(setpoint)?;
        Ok(())
    }

    /// Move the closed-loop pole; the cached gains are replaced only on success.
    pub fn reconfigure_pole(&mut self, pole: Real) -> CylResult<()> {
        let law = ControlLaw::from_pole(pole)?;
        debug!(old = self.pole, new = pole, "reconfigured closed-loop pole");
        self.law = law;
        self.pole = pole;
        Ok(())
    }

    /// Measured output `y = x1`.
    pub fn output(&self) -> Real {
        PneumaticCylinder::output(&self.state)
    }

    /// Control input the current state and setpoint call for.
    pub fn control_input(&self) -> CylResult<Real> {
        self.law
            .compute_input(&self.state, self.setpoint, self.plant.params())
    }

    /// Plant right-hand side under the current control input.
    pub fn derivatives(&self) -> CylResult<PlantState> {
        let u = self.control_input()?;
        self.plant.derivative(&self.state, u)
    }

    /// Run one control/plant cycle and commit the result.
    ///
    /// Returns the input that was applied.
    pub fn advance(&mut self) -> CylResult<Real> {
        let u = self.control_input()?;
        let next = self.plant.step(&self.state, u, self.step_size)?;
        self.state = next;
        Ok(u)
    }
}

/// Lifecycle of a [`StepDriver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverPhase {
    /// Constructed; no step committed yet.
    #[default]
    Idle,
    /// At least one step committed.
    Running,
}

/// Values exchanged with the host after a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutput {
    /// Simulation time at the end of the step (seconds).
    pub time: Real,
    /// Measured position `y = x1` (m).
    pub position: Real,
    /// Auxiliary velocity `x2` (m/s).
    pub velocity: Real,
    /// Auxiliary pressure `x3` (Pa).
    pub pressure: Real,
    /// Flow `u` applied during the step (m³/s).
    pub input: Real,
    /// Setpoint `w` held during the step (m).
    pub setpoint: Real,
}

/// Advances a [`SimulationInstance`] through simulated time.
#[derive(Clone, Debug)]
pub struct StepDriver {
    instance: SimulationInstance,
    phase: DriverPhase,
    start_time: Real,
    step_index: u64,
}

impl StepDriver {
    pub fn new(config: InstanceConfig) -> CylResult<Self> {
        Ok(Self::from_instance(SimulationInstance::new(config)?, 0.0))
    }

    pub fn from_instance(instance: SimulationInstance, start_time: Real) -> Self {
        Self {
            instance,
            phase: DriverPhase::Idle,
            start_time,
            step_index: 0,
        }
    }

    pub fn instance(&self) -> &SimulationInstance {
        &self.instance
    }

    pub fn into_instance(self) -> SimulationInstance {
        self.instance
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Current simulation time, `start + k·h`.
    pub fn time(&self) -> Real {
        self.start_time + self.step_index as Real * self.instance.step_size()
    }

    pub fn get_state(&self) -> PlantState {
        self.instance.state()
    }

    pub fn set_state(&mut self, state: PlantState) -> CylResult<()> {
        self.instance.set_state(state)
    }

    pub fn set_setpoint(&mut self, setpoint: Real) -> CylResult<()> {
        self.instance.set_setpoint(setpoint)
    }

    pub fn reconfigure_pole(&mut self, pole: Real) -> CylResult<()> {
        self.instance.reconfigure_pole(pole)
    }

    pub fn output(&self) -> Real {
        self.instance.output()
    }

    pub fn derivatives(&self) -> CylResult<PlantState> {
        self.instance.derivatives()
    }

    /// Execute one macro step.
    pub fn step(&mut self) -> CylResult<StepOutput> {
        let setpoint = self.instance.setpoint();
        let input = match self.instance.advance() {
            Ok(u) => u,
            Err(err) => {
                warn!(step = self.step_index, error = %err, "step failed");
                return Err(err);
            }
        };

        self.step_index += 1;
        self.phase = DriverPhase::Running;

        let state = self.instance.state();
        Ok(StepOutput {
            time: self.time(),
            position: state.x1,
            velocity: state.x2,
            pressure: state.x3,
            input,
            setpoint,
        })
    }
}
