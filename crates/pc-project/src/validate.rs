//! Scenario validation logic.

use std::collections::HashSet;

use crate::schema::Scenario;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing value: {field}")]
    Missing { field: String },

    #[error("Duplicate output: {name}")]
    DuplicateOutput { name: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, v, "must be finite"))
    }
}

fn range(field: &str, r: [f64; 2]) -> Result<(), ValidationError> {
    let [min, max] = r;
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(invalid(field, format!("[{min}, {max}]"), "must satisfy min < max"))
    }
}

fn within(field: &str, v: f64, r: [f64; 2]) -> Result<(), ValidationError> {
    if (r[0]..=r[1]).contains(&v) {
        Ok(())
    } else {
        Err(invalid(
            field,
            v,
            &format!("must lie within [{}, {}]", r[0], r[1]),
        ))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "name".to_string(),
        });
    }

    let plant = &scenario.plant;
    positive("plant.mass_kg", plant.mass_kg)?;
    positive("plant.area_m2", plant.area_m2)?;
    if !plant.stiffness_n_per_m.is_finite() || plant.stiffness_n_per_m < 0.0 {
        return Err(invalid(
            "plant.stiffness_n_per_m",
            plant.stiffness_n_per_m,
            "cannot be negative",
        ));
    }
    range("plant.position_limits_m", plant.position_limits_m)?;
    range("plant.pressure_limits_pa", plant.pressure_limits_pa)?;
    positive("plant.position_limits_m[0]", plant.position_limits_m[0])?;
    positive("plant.pressure_limits_pa[0]", plant.pressure_limits_pa[0])?;

    let init = &scenario.initial_state;
    within(
        "initial_state.position_m",
        init.position_m,
        plant.position_limits_m,
    )?;
    finite("initial_state.velocity_m_per_s", init.velocity_m_per_s)?;
    within(
        "initial_state.pressure_pa",
        init.pressure_pa,
        plant.pressure_limits_pa,
    )?;

    let pole = scenario.controller.pole;
    if !pole.is_finite() || pole >= 0.0 {
        return Err(invalid("controller.pole", pole, "must be negative"));
    }

    let sim = &scenario.simulation;
    finite("simulation.start_time_s", sim.start_time_s)?;
    finite("simulation.stop_time_s", sim.stop_time_s)?;
    if sim.stop_time_s < sim.start_time_s {
        return Err(invalid(
            "simulation.stop_time_s",
            sim.stop_time_s,
            "must not precede start_time_s",
        ));
    }
    positive("simulation.step_size_s", sim.step_size_s)?;
    if sim.record_every == 0 {
        return Err(invalid("simulation.record_every", 0, "must be positive"));
    }

    if scenario.setpoint.is_empty() {
        return Err(ValidationError::Missing {
            field: "setpoint".to_string(),
        });
    }
    for (i, (t, w)) in scenario.setpoint.iter().enumerate() {
        finite(&format!("setpoint[{i}].time"), *t)?;
        finite(&format!("setpoint[{i}].value"), *w)?;
    }

    if scenario.outputs.is_empty() {
        return Err(ValidationError::Missing {
            field: "outputs".to_string(),
        });
    }
    let mut seen = HashSet::new();
    for output in &scenario.outputs {
        if !seen.insert(*output) {
            return Err(ValidationError::DuplicateOutput {
                name: output.name().to_string(),
            });
        }
    }

    Ok(())
}
