//! Plant parameters and the physical state of a single-acting cylinder.

use crate::error::{CylError, CylResult};
use crate::numeric::{Real, ensure_range};
use crate::units::{Length, Pressure, Velocity, m, mps, pa};

/// Physical constants of one cylinder, fixed for the lifetime of an instance.
///
/// The admissible box must keep clear of the singular boundaries of the
/// dynamics: position and pressure both have to stay strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantParameters {
    /// Piston mass `m` (kg)
    pub mass: Real,
    /// Return spring stiffness `c` (N/m)
    pub stiffness: Real,
    /// Piston area `A` (m²)
    pub area: Real,
    /// `[x1_min, x1_max]` (m)
    pub position_limits: [Real; 2],
    /// `[x3_min, x3_max]` (Pa)
    pub pressure_limits: [Real; 2],
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 2000.0,
            area: 0.005,
            position_limits: [0.01, 0.2],
            pressure_limits: [100.0, 1.0e6],
        }
    }
}

impl PlantParameters {
    /// Create a validated parameter set.
    pub fn new(
        mass: Real,
        stiffness: Real,
        area: Real,
        position_limits: [Real; 2],
        pressure_limits: [Real; 2],
    ) -> CylResult<Self> {
        let params = Self {
            mass,
            stiffness,
            area,
            position_limits,
            pressure_limits,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> CylResult<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(CylError::invalid("piston mass must be positive"));
        }
        if !self.stiffness.is_finite() || self.stiffness < 0.0 {
            return Err(CylError::invalid("spring stiffness cannot be negative"));
        }
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(CylError::invalid("piston area must be positive"));
        }
        let [x1_min, _] = ensure_range(
            self.position_limits,
            "position limits must satisfy min < max",
        )?;
        let [x3_min, _] = ensure_range(
            self.pressure_limits,
            "pressure limits must satisfy min < max",
        )?;
        if x1_min <= 0.0 {
            return Err(CylError::invalid("minimum position must be positive"));
        }
        if x3_min <= 0.0 {
            return Err(CylError::invalid("minimum pressure must be positive"));
        }
        Ok(())
    }

    /// `c / m`
    #[inline]
    pub fn spring_ratio(&self) -> Real {
        self.stiffness / self.mass
    }

    /// `A / m`
    #[inline]
    pub fn area_ratio(&self) -> Real {
        self.area / self.mass
    }

    #[inline]
    pub fn clamp_position(&self, x1: Real) -> Real {
        x1.clamp(self.position_limits[0], self.position_limits[1])
    }

    #[inline]
    pub fn clamp_pressure(&self, x3: Real) -> Real {
        x3.clamp(self.pressure_limits[0], self.pressure_limits[1])
    }

    /// True if `state` lies inside the admissible position/pressure box.
    pub fn admits(&self, state: &PlantState) -> bool {
        let [x1_min, x1_max] = self.position_limits;
        let [x3_min, x3_max] = self.pressure_limits;
        state.is_finite()
            && (x1_min..=x1_max).contains(&state.x1)
            && (x3_min..=x3_max).contains(&state.x3)
    }

    /// Pressure that balances the spring at position `x1` (zero acceleration).
    pub fn equilibrium_pressure(&self, x1: Real) -> Real {
        self.stiffness * x1 / self.area
    }
}

/// Physical state `(x1, x2, x3)`: position (m), velocity (m/s), pressure (Pa).
///
/// Also used for the time derivative of the state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantState {
    pub x1: Real,
    pub x2: Real,
    pub x3: Real,
}

impl Default for PlantState {
    fn default() -> Self {
        Self {
            x1: 0.02,
            x2: 0.0,
            x3: 1000.0,
        }
    }
}

impl PlantState {
    pub const fn new(x1: Real, x2: Real, x3: Real) -> Self {
        Self { x1, x2, x3 }
    }

    pub fn from_quantities(position: Length, velocity: Velocity, pressure: Pressure) -> Self {
        Self {
            x1: position.value,
            x2: velocity.value,
            x3: pressure.value,
        }
    }

    /// Raw state vector, as exchanged with a host for checkpointing.
    pub const fn to_array(self) -> [Real; 3] {
        [self.x1, self.x2, self.x3]
    }

    pub const fn from_array(x: [Real; 3]) -> Self {
        Self {
            x1: x[0],
            x2: x[1],
            x3: x[2],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.x2.is_finite() && self.x3.is_finite()
    }

    pub fn position(&self) -> Length {
        m(self.x1)
    }

    pub fn velocity(&self) -> Velocity {
        mps(self.x2)
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.x3)
    }
}

impl From<[Real; 3]> for PlantState {
    fn from(x: [Real; 3]) -> Self {
        Self::from_array(x)
    }
}

impl From<PlantState> for [Real; 3] {
    fn from(state: PlantState) -> Self {
        state.to_array()
    }
}
