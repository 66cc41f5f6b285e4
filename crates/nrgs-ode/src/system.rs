//! OdeSystem trait for pluggable dynamic systems.

use nalgebra::{DMatrix, DVector};

use crate::error::OdeResult;
use crate::jacobian::{DEFAULT_FD_EPSILON, finite_difference_jacobian};

/// Trait for systems of first-order ODEs `y' = f(t, y)`.
///
/// A system must implement:
/// - its state dimension
/// - the right-hand side `f(t, y)`
///
/// Implicit solvers also need the Jacobian `df/dy`. The default
/// implementation uses forward finite differences; systems with a cheap
/// closed form should override it.
///
/// Evaluation takes `&self`: a system is a pure function of `(t, y)` and its
/// immutable parameters, so one instance can be shared across threads.
pub trait OdeSystem {
    /// Number of state variables.
    fn dim(&self) -> usize;

    /// Compute the state derivative `dy/dt = f(t, y)`.
    fn rhs(&self, t: f64, y: &DVector<f64>) -> OdeResult<DVector<f64>>;

    /// Jacobian `df/dy` evaluated at `(t, y)`.
    fn jacobian(&self, t: f64, y: &DVector<f64>) -> OdeResult<DMatrix<f64>> {
        finite_difference_jacobian(y, |x| self.rhs(t, x), DEFAULT_FD_EPSILON)
    }
}

/// Adapter turning a closure into an [`OdeSystem`].
pub struct FnSystem<F> {
    dim: usize,
    f: F,
}

impl<F> FnSystem<F>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64>,
{
    pub fn new(dim: usize, f: F) -> Self {
        Self { dim, f }
    }
}

impl<F> OdeSystem for FnSystem<F>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64>,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn rhs(&self, t: f64, y: &DVector<f64>) -> OdeResult<DVector<f64>> {
        Ok((self.f)(t, y))
    }
}
