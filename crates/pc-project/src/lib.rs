//! pc-project: scenario file format and validation.

pub mod schema;
pub mod validate;

use std::path::Path;

pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scenario file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the encoding from the file extension.
    pub fn from_path(path: &Path) -> ProjectResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(ProjectError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn from_json_str(content: &str) -> ProjectResult<Scenario> {
    let scenario: Scenario = serde_json::from_str(content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn to_string(scenario: &Scenario, format: Format) -> ProjectResult<String> {
    validate_scenario(scenario)?;
    Ok(match format {
        Format::Yaml => serde_yaml::to_string(scenario)?,
        Format::Json => serde_json::to_string_pretty(scenario)?,
    })
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    from_yaml_str(&std::fs::read_to_string(path)?)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    std::fs::write(path, to_string(scenario, Format::Yaml)?)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    from_json_str(&std::fs::read_to_string(path)?)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    std::fs::write(path, to_string(scenario, Format::Json)?)?;
    Ok(())
}

/// Load a scenario, choosing YAML or JSON by extension.
pub fn load(path: &Path) -> ProjectResult<Scenario> {
    match Format::from_path(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

/// Save a scenario, choosing YAML or JSON by extension.
pub fn save(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    match Format::from_path(path)? {
        Format::Yaml => save_yaml(path, scenario),
        Format::Json => save_json(path, scenario),
    }
}
