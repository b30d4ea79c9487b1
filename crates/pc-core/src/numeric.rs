use crate::CylError;

/// Floating point type used throughout system
pub type Real = f64;

/// Comparison bounds: `a` and `b` agree when their gap is within `abs`
/// or within `rel` of the larger magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    pub const fn new(abs: Real, rel: Real) -> Self {
        Self { abs, rel }
    }

    /// Purely relative band, e.g. `relative(0.01)` for "within 1%".
    pub const fn relative(rel: Real) -> Self {
        Self { abs: 0.0, rel }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::new(1e-12, 1e-9)
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let gap = (a - b).abs();
    gap <= tol.abs || gap <= tol.rel * a.abs().max(b.abs())
}

/// Reject a non-finite intermediate as a numerical instability.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CylError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CylError::NumericalInstability { what, value: v })
    }
}

/// Check that `[min, max]` is a finite, non-empty closed interval.
pub fn ensure_range(range: [Real; 2], what: &'static str) -> Result<[Real; 2], CylError> {
    let [min, max] = range;
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(CylError::InvalidConfiguration { what });
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerance_absorbs_rounding_only() {
        let tol = Tolerances::default();
        assert!(nearly_equal(0.1 + 0.2, 0.3, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(0.05, 0.0501, tol));
    }

    #[test]
    fn relative_band_scales_with_magnitude() {
        let one_percent = Tolerances::relative(0.01);
        assert!(nearly_equal(0.05, 0.0504, one_percent));
        assert!(!nearly_equal(0.05, 0.0506, one_percent));
        assert!(nearly_equal(20_000.0, 20_150.0, one_percent));
        assert!(!nearly_equal(0.0, 1e-300, one_percent));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Numerical instability"));
    }

    #[test]
    fn ensure_range_rejects_empty_and_inverted() {
        assert!(ensure_range([0.0, 1.0], "r").is_ok());
        assert!(ensure_range([1.0, 1.0], "r").is_err());
        assert!(ensure_range([2.0, 1.0], "r").is_err());
        assert!(ensure_range([0.0, Real::INFINITY], "r").is_err());
    }
}
