//! Scenario schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub plant: PlantDef,
    #[serde(default)]
    pub initial_state: InitialStateDef,
    #[serde(default)]
    pub controller: ControllerDef,
    #[serde(default)]
    pub simulation: SimulationDef,
    /// `[time_s, value_m]` samples, held until the next sample.
    pub setpoint: Vec<(f64, f64)>,
    #[serde(default = "default_outputs")]
    pub outputs: Vec<OutputVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_csv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    pub mass_kg: f64,
    pub stiffness_n_per_m: f64,
    pub area_m2: f64,
    pub position_limits_m: [f64; 2],
    pub pressure_limits_pa: [f64; 2],
}

impl Default for PlantDef {
    fn default() -> Self {
        Self {
            mass_kg: 1.0,
            stiffness_n_per_m: 2000.0,
            area_m2: 0.005,
            position_limits_m: [0.01, 0.2],
            pressure_limits_pa: [100.0, 1.0e6],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    pub position_m: f64,
    #[serde(default)]
    pub velocity_m_per_s: f64,
    pub pressure_pa: f64,
}

impl Default for InitialStateDef {
    fn default() -> Self {
        Self {
            position_m: 0.02,
            velocity_m_per_s: 0.0,
            pressure_pa: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerDef {
    /// Closed-loop pole (1/s), placed three times.
    pub pole: f64,
}

impl Default for ControllerDef {
    fn default() -> Self {
        Self { pole: -10.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default)]
    pub start_time_s: f64,
    pub stop_time_s: f64,
    #[serde(default = "default_step_size")]
    pub step_size_s: f64,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            start_time_s: 0.0,
            stop_time_s: 3.0,
            step_size_s: default_step_size(),
            record_every: default_record_every(),
        }
    }
}

fn default_step_size() -> f64 {
    1e-3
}

fn default_record_every() -> usize {
    10
}

/// Recordable signals of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OutputVariable {
    Position,
    Velocity,
    Pressure,
    Flow,
    Setpoint,
}

impl OutputVariable {
    pub const ALL: [OutputVariable; 5] = [
        OutputVariable::Position,
        OutputVariable::Velocity,
        OutputVariable::Pressure,
        OutputVariable::Flow,
        OutputVariable::Setpoint,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputVariable::Position => "position",
            OutputVariable::Velocity => "velocity",
            OutputVariable::Pressure => "pressure",
            OutputVariable::Flow => "flow",
            OutputVariable::Setpoint => "setpoint",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            OutputVariable::Position | OutputVariable::Setpoint => "m",
            OutputVariable::Velocity => "m/s",
            OutputVariable::Pressure => "Pa",
            OutputVariable::Flow => "m3/s",
        }
    }

    /// CSV column header, e.g. `position_m`.
    pub fn column(self) -> String {
        let unit = match self {
            OutputVariable::Velocity => "m_per_s",
            OutputVariable::Flow => "m3_per_s",
            OutputVariable::Pressure => "pa",
            _ => "m",
        };
        format!("{}_{}", self.name(), unit)
    }
}

fn default_outputs() -> Vec<OutputVariable> {
    vec![
        OutputVariable::Position,
        OutputVariable::Velocity,
        OutputVariable::Pressure,
    ]
}

impl Scenario {
    /// The documented step-to-50-mm scenario, used for `template`.
    pub fn template() -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: "Step to 50 mm".to_string(),
            description: Some(
                "Single-acting cylinder, exact linearization with a triple pole at -10 1/s"
                    .to_string(),
            ),
            plant: PlantDef::default(),
            initial_state: InitialStateDef::default(),
            controller: ControllerDef::default(),
            simulation: SimulationDef::default(),
            setpoint: vec![(0.0, 0.05)],
            outputs: OutputVariable::ALL.to_vec(),
            output_csv: Some("result.csv".to_string()),
        }
    }
}
