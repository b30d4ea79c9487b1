//! Saturation of the integrated state at the cylinder's limits.

use pc_core::{PlantParameters, PlantState};

/// Clamp position and pressure into the admissible box.
///
/// The end stops are inelastic: a piston resting on a stop keeps no
/// velocity pointing further into it.
pub(crate) fn saturate(params: &PlantParameters, raw: PlantState) -> PlantState {
    let x1 = params.clamp_position(raw.x1);
    PlantState {
        x1,
        x2: arrest_at_stop(params.position_limits, x1, raw.x2),
        x3: params.clamp_pressure(raw.x3),
    }
}

/// Velocity of a piston at (already clamped) position `x1`.
pub(crate) fn arrest_at_stop(limits: [f64; 2], x1: f64, x2: f64) -> f64 {
    let [x1_min, x1_max] = limits;
    let into_lower = x1 <= x1_min && x2 < 0.0;
    let into_upper = x1 >= x1_max && x2 > 0.0;
    if into_lower || into_upper { 0.0 } else { x2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: [f64; 2] = [0.01, 0.2];

    #[test]
    fn inside_limits_untouched() {
        let params = PlantParameters::default();
        let raw = PlantState::new(0.05, -0.3, 20_000.0);
        assert_eq!(saturate(&params, raw), raw);
    }

    #[test]
    fn lower_stop_arrests_inward_velocity() {
        let params = PlantParameters::default();
        let out = saturate(&params, PlantState::new(0.005, -0.2, 50.0));
        assert_eq!(out, PlantState::new(0.01, 0.0, 100.0));
    }

    #[test]
    fn upper_stop_arrests_outward_velocity() {
        let params = PlantParameters::default();
        let out = saturate(&params, PlantState::new(0.25, 0.4, 2e6));
        assert_eq!(out, PlantState::new(0.2, 0.0, 1e6));
    }

    #[test]
    fn resting_on_stop_cannot_push_into_it() {
        // Landed exactly on the stop while the spring still pulls inward.
        assert_eq!(arrest_at_stop(LIMITS, 0.01, -0.01), 0.0);
        assert_eq!(arrest_at_stop(LIMITS, 0.2, 0.01), 0.0);
    }

    #[test]
    fn velocity_leaving_stop_is_kept() {
        assert_eq!(arrest_at_stop(LIMITS, 0.01, 0.3), 0.3);
        assert_eq!(arrest_at_stop(LIMITS, 0.2, -0.3), -0.3);
        assert_eq!(arrest_at_stop(LIMITS, 0.05, -0.3), -0.3);
    }
}
