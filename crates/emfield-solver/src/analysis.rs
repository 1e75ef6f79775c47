//! Configuration resolution.
//!
//! Turns a parsed `SimulationConfig` into an immutable `Analysis`: the
//! standard is resolved, the grid validated, every antenna's limit looked
//! up and every pattern loaded. Nothing is computed until all of this
//! has succeeded.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use emfield_core::config::{AntennaConfig, SimulationConfig};
use emfield_core::error::{ConfigError, ConfigResult};

use crate::antenna::Antenna;
use crate::error::{EngineError, EngineResult};
use crate::grid::GridSpec;
use crate::standards::{ExposureStandard, LimitBand};
use emfield_pattern::PatternLibrary;

/// A fully resolved analysis, ready to evaluate.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub name: String,
    pub standard: ExposureStandard,
    pub grid: GridSpec,
    pub antennas: Vec<Antenna>,
}

impl Analysis {
    /// Load a YAML config file. Relative pattern paths resolve against
    /// the file's directory.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let config = SimulationConfig::load(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_config(&config, base_dir)
    }

    /// Parse YAML text, resolving pattern paths against `base_dir`.
    pub fn from_yaml_str(text: &str, base_dir: &Path) -> EngineResult<Self> {
        let config = SimulationConfig::from_yaml_str(text)?;
        Self::from_config(&config, base_dir)
    }

    pub fn from_config(config: &SimulationConfig, base_dir: &Path) -> EngineResult<Self> {
        let standard =
            ExposureStandard::from_names(&config.compliance.standard, &config.compliance.category)?;
        let grid = GridSpec::from_config(&config.grid)?;

        let mut seen = HashSet::new();
        for a in &config.antennas {
            if !seen.insert(a.id.as_str()) {
                return Err(ConfigError::DuplicateAntenna(a.id.clone()).into());
            }
        }

        let bands = config
            .antennas
            .iter()
            .map(|a| validate_antenna(a, &standard))
            .collect::<ConfigResult<Vec<&LimitBand>>>()?;

        let mut library = PatternLibrary::new(base_dir);
        let mut antennas = Vec::with_capacity(config.antennas.len());
        for (a, band) in config.antennas.iter().zip(bands) {
            let limit_v_m = band.rule.evaluate(a.frequency_mhz);
            let pattern = library
                .get(a.pattern_file.as_deref())
                .map_err(|source| EngineError::Pattern {
                    antenna: a.id.clone(),
                    source,
                })?;
            let pattern_file = a
                .pattern_file
                .clone()
                .filter(|p| !PatternLibrary::is_isotropic_entry(Some(p.as_str())));

            debug!(
                antenna = %a.id,
                frequency_mhz = a.frequency_mhz,
                limit_v_m,
                rule = %band.rule.describe(),
                pattern = pattern.name(),
                enabled = a.enabled,
                "Resolved antenna"
            );

            antennas.push(Antenna::new(
                a.id.clone(),
                a.position,
                a.orientation,
                a.frequency_mhz,
                a.power_eirp_watts,
                pattern_file,
                pattern,
                a.enabled,
                limit_v_m,
            ));
        }

        info!(
            name = %config.name,
            standard = %standard.id,
            category = %standard.category,
            antennas = antennas.len(),
            patterns = library.loaded_count(),
            points = grid.total_points(),
            "Analysis resolved"
        );

        Ok(Self {
            name: config.name.clone(),
            standard,
            grid,
            antennas,
        })
    }

    pub fn enabled_count(&self) -> usize {
        self.antennas.iter().filter(|a| a.enabled).count()
    }
}

/// Check one antenna's values and return the band its frequency falls in.
fn validate_antenna(
    a: &AntennaConfig,
    standard: &ExposureStandard,
) -> ConfigResult<&'static LimitBand> {
    let invalid = |reason: String| ConfigError::InvalidAntenna {
        id: a.id.clone(),
        reason,
    };

    if a.id.trim().is_empty() {
        return Err(invalid("id must not be empty".to_string()));
    }
    if !(a.frequency_mhz.is_finite() && a.frequency_mhz > 0.0) {
        return Err(invalid(format!("frequency_mhz must be positive, got {}", a.frequency_mhz)));
    }
    if !(a.power_eirp_watts.is_finite() && a.power_eirp_watts > 0.0) {
        return Err(invalid(format!(
            "power_eirp_watts must be positive, got {}",
            a.power_eirp_watts
        )));
    }
    if !a.position.is_finite() {
        return Err(invalid("position must be finite".to_string()));
    }
    if !(a.orientation.azimuth_deg.is_finite() && a.orientation.tilt_deg.is_finite()) {
        return Err(invalid("orientation must be finite".to_string()));
    }

    standard
        .band_for(a.frequency_mhz)
        .map_err(|e| e.for_antenna(&a.id))
}
