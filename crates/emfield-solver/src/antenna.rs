//! Resolved antenna: config values plus the shared pattern, the frame
//! rotation and the frequency-dependent limit, fixed for the whole run.

use std::sync::Arc;

use glam::{DQuat, DVec3};

use emfield_core::report::AntennaEcho;
use emfield_core::types::{Orientation, Position};
use emfield_pattern::RadiationPattern;

use crate::orientation::{self, LocalDirection};
use crate::propagation;
use crate::standards;

#[derive(Debug, Clone)]
pub struct Antenna {
    pub id: String,
    pub position: Position,
    pub orientation: Orientation,
    pub frequency_mhz: f64,
    pub eirp_watts: f64,
    /// Pattern file as written in the config; `None` means isotropic.
    pub pattern_file: Option<String>,
    pub pattern: Arc<RadiationPattern>,
    pub enabled: bool,
    /// Reference limit at `frequency_mhz` under the analysis standard (V/m).
    pub limit_v_m: f64,
    world_to_local: DQuat,
}

impl Antenna {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        position: Position,
        orientation: Orientation,
        frequency_mhz: f64,
        eirp_watts: f64,
        pattern_file: Option<String>,
        pattern: Arc<RadiationPattern>,
        enabled: bool,
        limit_v_m: f64,
    ) -> Self {
        Self {
            world_to_local: orientation::world_to_local(&orientation),
            id,
            position,
            orientation,
            frequency_mhz,
            eirp_watts,
            pattern_file,
            pattern,
            enabled,
            limit_v_m,
        }
    }

    /// Direction and distance from this antenna to `point`, local frame.
    pub fn direction_to(&self, point: &Position) -> LocalDirection {
        orientation::local_direction(self.world_to_local, &self.position, point)
    }

    /// World unit vector toward the pattern's peak gain.
    pub fn peak_direction(&self) -> DVec3 {
        let (azimuth_deg, elevation_deg) = self.pattern.peak_direction();
        orientation::world_direction(&self.orientation, azimuth_deg, elevation_deg)
    }

    /// RMS field strength (V/m) this antenna alone produces at `point`.
    pub fn field_at(&self, point: &Position) -> f64 {
        let dir = self.direction_to(point);
        let gain = self.pattern.gain(dir.azimuth_deg, dir.elevation_deg);
        propagation::field_strength(self.eirp_watts, gain, dir.distance_m)
    }

    /// Power density (W/m²) this antenna alone produces at `point`.
    pub fn power_density_at(&self, point: &Position) -> f64 {
        let dir = self.direction_to(point);
        let gain = self.pattern.gain(dir.azimuth_deg, dir.elevation_deg);
        propagation::power_density(self.eirp_watts, gain, dir.distance_m)
    }

    /// Report echo of this antenna.
    pub fn echo(&self) -> AntennaEcho {
        AntennaEcho {
            id: self.id.clone(),
            pattern_file: self
                .pattern_file
                .clone()
                .unwrap_or_else(|| emfield_core::constants::ISOTROPIC_PATTERN.to_string()),
            frequency_mhz: self.frequency_mhz,
            power_eirp_watts: self.eirp_watts,
            position: self.position,
            orientation: self.orientation,
            enabled: self.enabled,
            limit_v_m: self.limit_v_m,
            power_density_limit_w_m2: standards::power_density_from_field(self.limit_v_m),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_antenna(
    id: &str,
    position: Position,
    eirp_watts: f64,
    limit_v_m: f64,
) -> Antenna {
    Antenna::new(
        id.to_string(),
        position,
        Orientation::default(),
        900.0,
        eirp_watts,
        None,
        Arc::new(RadiationPattern::Isotropic),
        true,
        limit_v_m,
    )
}
