//! World ↔ antenna-local frame transform.
//!
//! The local frame has boresight along +X and local "up" along +Z. An
//! antenna with azimuth `a` and tilt `t` has its boresight at world
//! direction `(cos t cos a, cos t sin a, sin t)`; negative tilt points
//! below the horizon.

use glam::{DQuat, DVec3};

use emfield_core::constants::MIN_SLANT_DISTANCE;
use emfield_core::types::{Orientation, Position};
use emfield_pattern::pattern::wrap_degrees;

/// Direction from an antenna to a point, expressed in the antenna frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalDirection {
    /// Azimuth off boresight in [0, 360), counter-clockwise.
    pub azimuth_deg: f64,
    /// Elevation above the boresight plane in [-90, 90].
    pub elevation_deg: f64,
    /// Slant distance in meters, clamped to at least `MIN_SLANT_DISTANCE`.
    pub distance_m: f64,
}

/// Rotation taking antenna-local vectors into the world frame.
pub fn local_to_world(orientation: &Orientation) -> DQuat {
    // Tilt about local Y (negated so positive tilt lifts the boresight),
    // then yaw about world Z.
    DQuat::from_rotation_z(orientation.azimuth_deg.to_radians())
        * DQuat::from_rotation_y(-orientation.tilt_deg.to_radians())
}

/// Rotation taking world vectors into the antenna-local frame.
pub fn world_to_local(orientation: &Orientation) -> DQuat {
    local_to_world(orientation).inverse()
}

/// Unit boresight vector in world coordinates.
pub fn boresight(orientation: &Orientation) -> DVec3 {
    local_to_world(orientation) * DVec3::X
}

/// Unit local-frame vector for a local azimuth/elevation.
pub fn local_vector(azimuth_deg: f64, elevation_deg: f64) -> DVec3 {
    let (az, el) = (azimuth_deg.to_radians(), elevation_deg.to_radians());
    DVec3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
}

/// World direction of a local azimuth/elevation.
pub fn world_direction(
    orientation: &Orientation,
    azimuth_deg: f64,
    elevation_deg: f64,
) -> DVec3 {
    local_to_world(orientation) * local_vector(azimuth_deg, elevation_deg)
}

/// Local azimuth/elevation of a local-frame vector. Zero-length maps to (0, 0).
pub fn angles_of(local: DVec3) -> (f64, f64) {
    if local.length_squared() == 0.0 {
        return (0.0, 0.0);
    }
    let azimuth = wrap_degrees(local.y.atan2(local.x).to_degrees());
    let elevation = local.z.atan2(local.x.hypot(local.y)).to_degrees();
    (azimuth, elevation)
}

/// Direction from `antenna` to `point` in the frame given by `world_to_local`.
pub fn local_direction(
    world_to_local: DQuat,
    antenna: &Position,
    point: &Position,
) -> LocalDirection {
    let offset = point.to_dvec3() - antenna.to_dvec3();
    let (azimuth_deg, elevation_deg) = angles_of(world_to_local * offset);
    LocalDirection {
        azimuth_deg,
        elevation_deg,
        distance_m: offset.length().max(MIN_SLANT_DISTANCE),
    }
}

/// Convenience form of [`local_direction`] that builds the rotation.
pub fn transform(
    antenna: &Position,
    orientation: &Orientation,
    point: &Position,
) -> LocalDirection {
    local_direction(world_to_local(orientation), antenna, point)
}
