//! Pole placement for the linearized triple integrator.

use pc_core::{CylError, CylResult, Real};

/// State feedback gains `(r1, r2, r3)` and setpoint prefilter `f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainSet {
    pub r1: Real,
    pub r2: Real,
    pub r3: Real,
    /// Prefilter; equals `r1` so that the static gain from `w` to `z1` is one.
    pub f: Real,
}

impl GainSet {
    /// Coefficients `[a0, a1, a2]` of the closed-loop characteristic
    /// polynomial `s³ + a2·s² + a1·s + a0`.
    pub fn characteristic_polynomial(&self) -> [Real; 3] {
        [self.r1, self.r2, self.r3]
    }
}

/// Gains placing all three closed-loop poles at `pole`.
///
/// Matching `s³ + r3·s² + r2·s + r1` against `(s − λ)³` gives
/// `r1 = −λ³`, `r2 = 3λ²`, `r3 = −3λ`.
pub fn compute_gains(pole: Real) -> CylResult<GainSet> {
    if !pole.is_finite() || pole >= 0.0 {
        return Err(CylError::InvalidConfiguration {
            what: "closed-loop pole must be negative",
        });
    }
    let cube = pole * pole * pole;
    Ok(GainSet {
        r1: -cube,
        r2: 3.0 * pole * pole,
        r3: -3.0 * pole,
        f: -cube,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn gains_for_pole_minus_ten() {
        let g = compute_gains(-10.0).unwrap();
        assert_eq!(g, GainSet {
            r1: 1000.0,
            r2: 300.0,
            r3: 30.0,
            f: 1000.0,
        });
    }

    #[test]
    fn unstable_poles_rejected() {
        for pole in [0.0, 1.0, 1e-12, f64::NAN, f64::NEG_INFINITY] {
            let err = compute_gains(pole).unwrap_err();
            assert!(matches!(err, CylError::InvalidConfiguration { .. }));
        }
    }

    proptest! {
        #[test]
        fn triple_root_at_pole(pole in -200.0f64..-0.01) {
            let g = compute_gains(pole).unwrap();
            prop_assert_eq!(g.r1, g.f);

            // (s - λ)³ evaluated at s = λ must vanish, as must its first two derivatives.
            let [a0, a1, a2] = g.characteristic_polynomial();
            let p = pole.powi(3) + a2 * pole.powi(2) + a1 * pole + a0;
            let dp = 3.0 * pole.powi(2) + 2.0 * a2 * pole + a1;
            let ddp = 6.0 * pole + 2.0 * a2;
            let scale = pole.abs().powi(3).max(1.0);
            prop_assert!(p.abs() <= 1e-9 * scale);
            prop_assert!(dp.abs() <= 1e-9 * scale);
            prop_assert!(ddp.abs() <= 1e-9 * scale);
        }
    }
}
