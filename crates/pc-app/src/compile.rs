//! Scenario → simulation instance.

use pc_controls::SetpointSchedule;
use pc_core::{PlantParameters, PlantState};
use pc_project::Scenario;
use pc_sim::{InstanceConfig, SimOptions, SimulationInstance, StepDriver};

use crate::error::AppResult;

/// Everything a run needs, built from a validated scenario.
#[derive(Debug, Clone)]
pub struct CompiledScenario {
    pub config: InstanceConfig,
    pub schedule: SetpointSchedule,
    pub start_time: f64,
    pub options: SimOptions,
}

impl CompiledScenario {
    /// Fresh driver positioned at the scenario start time.
    pub fn driver(&self) -> AppResult<StepDriver> {
        let instance = SimulationInstance::new(self.config)?;
        Ok(StepDriver::from_instance(instance, self.start_time))
    }
}

pub fn compile_scenario(scenario: &Scenario) -> AppResult<CompiledScenario> {
    pc_project::validate_scenario(scenario).map_err(pc_project::ProjectError::from)?;

    let plant = &scenario.plant;
    let params = PlantParameters::new(
        plant.mass_kg,
        plant.stiffness_n_per_m,
        plant.area_m2,
        plant.position_limits_m,
        plant.pressure_limits_pa,
    )?;

    let init = &scenario.initial_state;
    let initial_state = PlantState::new(init.position_m, init.velocity_m_per_s, init.pressure_pa);

    let schedule = SetpointSchedule::from_pairs(&scenario.setpoint)?;
    let sim = &scenario.simulation;

    let config = InstanceConfig {
        params,
        initial_state,
        pole: scenario.controller.pole,
        step_size: sim.step_size_s,
        setpoint: schedule.value_at(sim.start_time_s),
    };

    Ok(CompiledScenario {
        config,
        schedule,
        start_time: sim.start_time_s,
        options: SimOptions {
            t_end: sim.stop_time_s,
            record_every: sim.record_every,
            ..SimOptions::default()
        },
    })
}
