use thiserror::Error;

pub type CylResult<T> = Result<T, CylError>;

/// Failures of the cylinder plant and its controller.
///
/// None of these are retryable: a step that trips one leaves the
/// instance at its last committed state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CylError {
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: &'static str },

    #[error("Singular control input: {what} ({value})")]
    SingularInput { what: &'static str, value: f64 },

    #[error("Numerical instability: {what} ({value})")]
    NumericalInstability { what: &'static str, value: f64 },
}

impl CylError {
    pub(crate) fn invalid(what: &'static str) -> Self {
        CylError::InvalidConfiguration { what }
    }
}
