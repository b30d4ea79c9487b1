//! Shared application service layer for pneumacyl.
//!
//! Turns scenario files into simulation runs and runs into tables, so the
//! CLI and any other front end share one path from file to result.

pub mod compile;
pub mod error;
pub mod query;
pub mod run_service;

pub use compile::{CompiledScenario, compile_scenario};
pub use error::{AppError, AppResult};
pub use query::{Causality, VariableInfo, format_state, list_variables, series, to_csv, write_csv};
pub use run_service::{
    RunOutput, RunOverrides, RunSummary, SETTLING_BAND, run_batch, run_scenario,
    run_scenario_with, settling_time,
};
