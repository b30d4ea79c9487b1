//! Error types for the pc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Failed to write results: {path}")]
    ResultsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for pc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pc_project::ProjectError> for AppError {
    fn from(err: pc_project::ProjectError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<pc_core::CylError> for AppError {
    fn from(err: pc_core::CylError) -> Self {
        match err {
            pc_core::CylError::InvalidConfiguration { .. } => {
                AppError::Configuration(err.to_string())
            }
            _ => AppError::Simulation(err.to_string()),
        }
    }
}
