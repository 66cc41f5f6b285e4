//! Stiff ODE integration for the reactor transient engine.
//!
//! Provides:
//! - `OdeSystem` trait for pluggable right-hand sides (with optional analytic Jacobian)
//! - Finite-difference Jacobians
//! - Variable-order (1-5), variable-step BDF solver with Newton iteration
//! - Polynomial dense output for sampling at arbitrary times
//! - `solve_ivp` driver that samples a trajectory at caller-supplied times

pub mod bdf;
pub mod dense;
pub mod error;
pub mod jacobian;
pub mod solve;
pub mod system;

pub use bdf::{Bdf, BdfStats, MAX_ORDER};
pub use dense::DenseOutput;
pub use error::{OdeError, OdeResult};
pub use jacobian::{DEFAULT_FD_EPSILON, central_difference_jacobian, finite_difference_jacobian};
pub use solve::{OdeOptions, OdeSolution, solve_ivp};
pub use system::{FnSystem, OdeSystem};

pub use nalgebra::{DMatrix, DVector};
