//! Global constants for rocket-core

/// Radii and lengths at or below this are treated as zero
pub const EPSILON: f64 = 1e-9;

/// Default exponent of the power-series nose profile
pub const POWER_SERIES_EXPONENT: f64 = 2.0;

/// Default number of uniform samples along a power-series nose profile (apex excluded)
pub const POWER_SERIES_SAMPLES: usize = 20;

/// Full revolution in degrees
pub const FULL_TURN_DEGREES: f64 = 360.0;
