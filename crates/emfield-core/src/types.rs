//! Fundamental geometric types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in analysis space (meters, Cartesian).
/// x and y span the ground plane, z = Up (height above ground).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Antenna mounting orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Orientation {
    /// Pointing direction in the ground plane, degrees counter-clockwise from +X.
    pub azimuth_deg: f64,
    /// Mechanical tilt in degrees (negative = down-tilt).
    pub tilt_deg: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Offset this position by `distance` meters along `direction` (need not be unit).
    pub fn offset(&self, direction: DVec3, distance: f64) -> Position {
        Position::from(self.to_dvec3() + direction.normalize_or_zero() * distance)
    }

    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Orientation {
    pub fn new(azimuth_deg: f64, tilt_deg: f64) -> Self {
        Self {
            azimuth_deg,
            tilt_deg,
        }
    }
}
