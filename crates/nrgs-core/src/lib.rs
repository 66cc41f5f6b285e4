//! nrgs-core: shared foundation for the grid simulator.
//!
//! Contains:
//! - numeric (Real + tolerances + float and series helpers)
//! - units (uom SI types + MW/hour/MWh constructors)
//! - error (shared error type)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
