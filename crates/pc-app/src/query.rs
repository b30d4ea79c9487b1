//! Query helpers: variable listing, series extraction and CSV export.

use std::fmt::Write as _;
use std::path::Path;

use pc_core::PlantState;
use pc_core::units::m3ps;
use pc_project::{OutputVariable, Scenario};
use pc_sim::SimRecord;
use uom::si::length::millimeter;
use uom::si::pressure::kilopascal;
use uom::si::velocity::millimeter_per_second;
use uom::si::volume_rate::liter_per_minute;

use crate::error::{AppError, AppResult};

/// Role of a variable in the model interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Causality {
    Parameter,
    Input,
    Output,
    Local,
}

impl Causality {
    pub fn as_str(self) -> &'static str {
        match self {
            Causality::Parameter => "parameter",
            Causality::Input => "input",
            Causality::Output => "output",
            Causality::Local => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: &'static str,
    pub causality: Causality,
    pub unit: &'static str,
    pub start: Option<f64>,
    pub description: &'static str,
}

/// Every variable the scenario exposes, with its start value.
pub fn list_variables(scenario: &Scenario) -> Vec<VariableInfo> {
    let p = &scenario.plant;
    let x0 = &scenario.initial_state;
    let w0 = scenario.setpoint.first().map(|&(_, w)| w);

    let var = |name, causality, unit, start, description| VariableInfo {
        name,
        causality,
        unit,
        start,
        description,
    };

    use Causality::*;
    vec![
        var("mass", Parameter, "kg", Some(p.mass_kg), "piston mass"),
        var("stiffness", Parameter, "N/m", Some(p.stiffness_n_per_m), "spring rate"),
        var("area", Parameter, "m2", Some(p.area_m2), "piston area"),
        var("position_min", Parameter, "m", Some(p.position_limits_m[0]), "lower end stop"),
        var("position_max", Parameter, "m", Some(p.position_limits_m[1]), "upper end stop"),
        var("pressure_min", Parameter, "Pa", Some(p.pressure_limits_pa[0]), "minimum chamber pressure"),
        var("pressure_max", Parameter, "Pa", Some(p.pressure_limits_pa[1]), "maximum chamber pressure"),
        var("pole", Parameter, "1/s", Some(scenario.controller.pole), "closed-loop triple pole"),
        var("step_size", Parameter, "s", Some(scenario.simulation.step_size_s), "integration step"),
        var("setpoint", Input, "m", w0, "position setpoint w"),
        var("position", Output, "m", Some(x0.position_m), "piston position x1 (measured output y)"),
        var("velocity", Local, "m/s", Some(x0.velocity_m_per_s), "piston velocity x2"),
        var("pressure", Local, "Pa", Some(x0.pressure_pa), "chamber pressure x3"),
        var("flow", Local, "m3/s", None, "volumetric flow u from the control law"),
    ]
}

/// Samples of one output variable, aligned with `record.t`.
pub fn series(record: &SimRecord, variable: OutputVariable) -> Vec<f64> {
    match variable {
        OutputVariable::Position => record.positions().collect(),
        OutputVariable::Velocity => record.x.iter().map(|x| x.x2).collect(),
        OutputVariable::Pressure => record.x.iter().map(|x| x.x3).collect(),
        OutputVariable::Flow => record.u.clone(),
        OutputVariable::Setpoint => record.w.clone(),
    }
}

/// Render a record as CSV: `time_s` followed by one column per output.
pub fn to_csv(record: &SimRecord, outputs: &[OutputVariable]) -> String {
    let columns: Vec<Vec<f64>> = outputs.iter().map(|&v| series(record, v)).collect();

    let mut out = String::from("time_s");
    for v in outputs {
        out.push(',');
        out.push_str(&v.column());
    }
    out.push('\n');

    for (i, t) in record.t.iter().enumerate() {
        let _ = write!(out, "{t}");
        for col in &columns {
            let _ = write!(out, ",{}", col[i]);
        }
        out.push('\n');
    }
    out
}

pub fn write_csv(path: &Path, record: &SimRecord, outputs: &[OutputVariable]) -> AppResult<()> {
    std::fs::write(path, to_csv(record, outputs)).map_err(|source| AppError::ResultsWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = record.len(), "wrote results");
    Ok(())
}

/// Human-readable state and applied flow in engineering units.
pub fn format_state(state: &PlantState, flow: f64) -> String {
    format!(
        "x1 = {:.3} mm, x2 = {:.3} mm/s, x3 = {:.3} kPa, u = {:.3} L/min",
        state.position().get::<millimeter>(),
        state.velocity().get::<millimeter_per_second>(),
        state.pressure().get::<kilopascal>(),
        m3ps(flow).get::<liter_per_minute>(),
    )
}
