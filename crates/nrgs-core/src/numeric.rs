use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute + relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Tolerance used when checking dispatch energy balance.
    pub const BALANCE: Tolerances = Tolerances {
        abs: 1e-9,
        rel: 1e-6,
    };
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::Negative { what, value: v });
    }
    Ok(v)
}

/// `n` uniformly spaced points over `[start, end]`, both ends included.
///
/// `n == 1` yields `[start]`.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        start + step * i as Real
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_non_negative_rejects_negative() {
        assert_eq!(ensure_non_negative(0.0, "demand").unwrap(), 0.0);
        let err = ensure_non_negative(-1.0, "demand").unwrap_err();
        assert_eq!(
            err,
            CoreError::Negative {
                what: "demand",
                value: -1.0
            }
        );
    }

    #[test]
    fn linspace_hits_both_ends() {
        let pts = linspace(0.0, 30.0, 1000);
        assert_eq!(pts.len(), 1000);
        assert_eq!(pts[0], 0.0);
        assert_eq!(pts[999], 30.0);
        assert!(pts.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_uniform(
            start in -100.0_f64..100.0,
            len in 0.1_f64..100.0,
            n in 2_usize..500
        ) {
            let pts = linspace(start, start + len, n);
            let step = len / (n - 1) as f64;
            let tol_step = Tolerances {
                abs: 1e-9 * len.max(1.0),
                rel: 1e-9,
            };
            for w in pts.windows(2) {
                prop_assert!(nearly_equal(w[1] - w[0], step, tol_step));
            }
        }
    }
}
