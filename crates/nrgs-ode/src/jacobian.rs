//! Finite-difference Jacobians of vector fields over `DVector` states.

use nalgebra::{DMatrix, DVector};

use crate::error::OdeResult;

/// Relative perturbation used by [`crate::OdeSystem::jacobian`]: `sqrt(f64::EPSILON)`.
pub const DEFAULT_FD_EPSILON: f64 = 1.490_116_119_384_765_6e-8;

/// Step for state component `v`: relative for large values, absolute near zero.
#[inline]
fn perturbation(v: f64, epsilon: f64) -> f64 {
    epsilon * v.abs().max(1.0)
}

/// Forward differences: column `j` is `(f(x + dx e_j) - f(x)) / dx`.
///
/// Costs `n + 1` evaluations of `f`.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> OdeResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> OdeResult<DVector<f64>>,
{
    let f0 = f(x)?;
    let mut jac = DMatrix::zeros(f0.len(), x.len());
    let mut probe = x.clone();

    for (j, &xj) in x.iter().enumerate() {
        let dx = perturbation(xj, epsilon);
        probe[j] = xj + dx;
        let column = (f(&probe)? - &f0) / dx;
        probe[j] = xj;
        jac.set_column(j, &column);
    }

    Ok(jac)
}

/// Central differences: second-order accurate, `2n + 1` evaluations.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> OdeResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> OdeResult<DVector<f64>>,
{
    let rows = f(x)?.len();
    let mut jac = DMatrix::zeros(rows, x.len());
    let mut probe = x.clone();

    for (j, &xj) in x.iter().enumerate() {
        let dx = perturbation(xj, epsilon);
        probe[j] = xj + dx;
        let forward = f(&probe)?;
        probe[j] = xj - dx;
        let backward = f(&probe)?;
        probe[j] = xj;
        jac.set_column(j, &((forward - backward) / (2.0 * dx)));
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_difference_of_scaled_identity() {
        let f = |x: &DVector<f64>| -> OdeResult<DVector<f64>> { Ok(x * 2.0) };
        let x = DVector::from_element(1, 3.0);
        let jac = finite_difference_jacobian(&x, f, 1e-7).unwrap();
        assert!((jac[(0, 0)] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn central_difference_of_square() {
        let f = |x: &DVector<f64>| -> OdeResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0]))
        };
        let x = DVector::from_element(1, 3.0);
        let jac = central_difference_jacobian(&x, f, 1e-6).unwrap();
        assert!((jac[(0, 0)] - 6.0).abs() < 1e-6);
    }

    #[test]
    fn rectangular_jacobian() {
        // f(x0, x1) = [x0 * x1, x0 + x1, x1]
        let f = |x: &DVector<f64>| -> OdeResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[1], x[0] + x[1], x[1]]))
        };
        let x = DVector::from_vec(vec![2.0, 5.0]);
        let jac = finite_difference_jacobian(&x, f, DEFAULT_FD_EPSILON).unwrap();

        assert_eq!(jac.shape(), (3, 2));
        assert!((jac[(0, 0)] - 5.0).abs() < 1e-5);
        assert!((jac[(0, 1)] - 2.0).abs() < 1e-5);
        assert!((jac[(1, 0)] - 1.0).abs() < 1e-5);
        assert!(jac[(2, 0)].abs() < 1e-5);
    }
}
