//! Far-field free-space propagation.

use std::f64::consts::PI;

use emfield_core::constants::{FAR_FIELD_CONSTANT, MIN_SLANT_DISTANCE};

/// RMS electric field strength (V/m) at `distance_m` for a source of
/// `eirp_watts` with linear relative `gain` toward the point:
/// `E = sqrt(30 * EIRP * gain) / r`.
pub fn field_strength(eirp_watts: f64, gain: f64, distance_m: f64) -> f64 {
    let r = distance_m.max(MIN_SLANT_DISTANCE);
    (FAR_FIELD_CONSTANT * eirp_watts * gain).sqrt() / r
}

/// Plane-wave power density (W/m²): `EIRP * gain / (4 pi r²)`.
pub fn power_density(eirp_watts: f64, gain: f64, distance_m: f64) -> f64 {
    let r = distance_m.max(MIN_SLANT_DISTANCE);
    eirp_watts * gain / (4.0 * PI * r * r)
}
