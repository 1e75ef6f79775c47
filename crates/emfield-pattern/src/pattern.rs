//! RadiationPattern: the closed set of supported pattern kinds.

use std::path::Path;

use crate::error::PatternResult;
use crate::planet::{self, PlanetPattern};
use crate::table::{self, TablePattern};

/// Direction-dependent relative gain, normalized so the peak is 0 dB.
///
/// Angles are in the antenna's local frame: azimuth counter-clockwise
/// from boresight, elevation positive above the boresight plane.
#[derive(Debug, Clone, PartialEq)]
pub enum RadiationPattern {
    /// Uniform 0 dB in every direction.
    Isotropic,
    /// Horizontal and vertical cuts from a Planet MSI/PLN file.
    Planet(PlanetPattern),
    /// Rectangular azimuth × elevation table from a CSV file.
    Table(TablePattern),
}

impl RadiationPattern {
    /// Load a pattern file, picking the parser from the extension.
    /// `.csv` is a gain table; `.msi`, `.pln` and anything else are Planet cuts.
    pub fn load(path: &Path) -> PatternResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(RadiationPattern::Table(table::load_table(path)?)),
            _ => Ok(RadiationPattern::Planet(planet::load_planet(path)?)),
        }
    }

    /// Attenuation below the peak in dB (0 at boresight peak, positive elsewhere).
    pub fn attenuation_db(&self, azimuth_deg: f64, elevation_deg: f64) -> f64 {
        match self {
            RadiationPattern::Isotropic => 0.0,
            RadiationPattern::Planet(p) => p.attenuation_db(azimuth_deg, elevation_deg),
            RadiationPattern::Table(t) => t.attenuation_db(azimuth_deg, elevation_deg),
        }
    }

    /// Linear relative gain factor in (0, 1] for normalized tables.
    pub fn gain(&self, azimuth_deg: f64, elevation_deg: f64) -> f64 {
        match self {
            RadiationPattern::Isotropic => 1.0,
            RadiationPattern::Planet(p) => p.gain(azimuth_deg, elevation_deg),
            RadiationPattern::Table(t) => t.gain(azimuth_deg, elevation_deg),
        }
    }

    /// Local (azimuth, elevation) of the strongest radiation. Isotropic
    /// patterns report boresight.
    pub fn peak_direction(&self) -> (f64, f64) {
        match self {
            RadiationPattern::Isotropic => (0.0, 0.0),
            RadiationPattern::Planet(p) => p.peak_direction(),
            RadiationPattern::Table(t) => t.peak_direction(),
        }
    }

    /// Display name of the pattern.
    pub fn name(&self) -> &str {
        match self {
            RadiationPattern::Isotropic => "isotropic",
            RadiationPattern::Planet(p) => &p.name,
            RadiationPattern::Table(t) => &t.name,
        }
    }

    pub fn is_isotropic(&self) -> bool {
        matches!(self, RadiationPattern::Isotropic)
    }
}

/// Wrap an angle into [0, 360).
pub fn wrap_degrees(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative number rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert a dB ratio to a linear power factor.
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}
