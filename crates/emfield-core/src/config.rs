//! YAML input schema.
//!
//! These structs mirror the configuration file one-to-one. They carry raw,
//! unvalidated values; the solver crate turns them into an immutable
//! analysis after checking every invariant.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ANALYSIS_NAME, DEFAULT_Z_LEVEL};
use crate::error::{ConfigError, ConfigResult};
use crate::types::{Orientation, Position};

/// Complete analysis configuration as read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub grid: GridConfig,
    pub compliance: ComplianceConfig,
    #[serde(default)]
    pub antennas: Vec<AntennaConfig>,
}

/// Evaluation plane bounds and spacing (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    #[serde(default = "default_z_level")]
    pub z_level: f64,
    /// Spacing along both axes.
    pub resolution: f64,
}

/// Standard and category names, parsed later so that unknown names
/// surface as dedicated errors rather than generic YAML errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplianceConfig {
    pub standard: String,
    pub category: String,
}

/// One antenna definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AntennaConfig {
    pub id: String,
    /// Path to an MSI/PLN or CSV pattern, or `isotropic`. Omitted = isotropic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_file: Option<String>,
    pub frequency_mhz: f64,
    pub power_eirp_watts: f64,
    pub position: Position,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_name() -> String {
    DEFAULT_ANALYSIS_NAME.to_string()
}

fn default_z_level() -> f64 {
    DEFAULT_Z_LEVEL
}

fn default_enabled() -> bool {
    true
}

impl SimulationConfig {
    /// Read and parse a YAML config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
