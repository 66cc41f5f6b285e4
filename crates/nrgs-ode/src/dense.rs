//! Continuous output over the last accepted BDF step.

use nalgebra::DVector;

/// Interpolating polynomial valid on `[t_old, t]` of one accepted step.
///
/// The polynomial is the Newton backward-difference form through the last
/// `order + 1` solution points, spaced `h` apart and ending at `t`.
#[derive(Clone, Debug)]
pub struct DenseOutput {
    t_old: f64,
    t: f64,
    h: f64,
    order: usize,
    d: Vec<DVector<f64>>,
}

impl DenseOutput {
    pub(crate) fn new(t_old: f64, t: f64, h: f64, order: usize, d: Vec<DVector<f64>>) -> Self {
        debug_assert_eq!(d.len(), order + 1);
        Self {
            t_old,
            t,
            h,
            order,
            d,
        }
    }

    /// Interval the interpolant covers.
    pub fn span(&self) -> (f64, f64) {
        (self.t_old, self.t)
    }

    /// Evaluate the interpolant at `t`.
    pub fn eval(&self, t: f64) -> DVector<f64> {
        let mut y = self.d[0].clone();
        let mut p = 1.0;
        for k in 0..self.order {
            let t_shift = self.t - self.h * k as f64;
            let denom = self.h * (k + 1) as f64;
            p *= (t - t_shift) / denom;
            y.axpy(p, &self.d[k + 1], 1.0);
        }
        y
    }
}
