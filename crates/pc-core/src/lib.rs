//! pc-core: stable foundation for pneumacyl.
//!
//! Contains:
//! - error (the shared error taxonomy)
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI types + constructors)
//! - state (plant parameters and the physical state triple)

pub mod error;
pub mod numeric;
pub mod state;
pub mod units;

pub use error::{CylError, CylResult};
pub use numeric::*;
pub use state::{PlantParameters, PlantState};
