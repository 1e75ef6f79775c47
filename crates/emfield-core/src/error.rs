//! Configuration error taxonomy.
//!
//! Every variant here is fatal and is raised before any field computation
//! starts. Callers map the whole class to exit code 2.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::enums::{ExposureCategory, StandardId};

/// Result type for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading or validating an analysis configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// YAML syntax error, missing field or wrong field type.
    #[error("malformed config: {0}")]
    Malformed(#[from] serde_yaml::Error),

    /// Standard name not in the supported set.
    #[error("unknown exposure standard '{0}' (expected ICNIRP_2020, FCC or ICASA)")]
    UnknownStandard(String),

    /// Category name not in the supported set.
    #[error("unknown exposure category '{0}' (expected general_public or occupational)")]
    UnknownCategory(String),

    /// Grid bounds or resolution violate the grid invariants.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Frequency outside the coverage of the selected standard.
    #[error(
        "frequency {frequency_mhz} MHz is outside {standard} ({category}) coverage \
         of {min_mhz}-{max_mhz} MHz"
    )]
    UnsupportedFrequency {
        standard: StandardId,
        category: ExposureCategory,
        frequency_mhz: f64,
        min_mhz: f64,
        max_mhz: f64,
    },

    /// Antenna field out of range.
    #[error("invalid antenna '{id}': {reason}")]
    InvalidAntenna { id: String, reason: String },

    /// Two antennas share an identifier.
    #[error("duplicate antenna id '{0}'")]
    DuplicateAntenna(String),

    /// A nested error attributed to one antenna.
    #[error("antenna '{id}': {source}")]
    Antenna {
        id: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attach an antenna id to this error.
    pub fn for_antenna(self, id: &str) -> Self {
        ConfigError::Antenna {
            id: id.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping antenna attribution.
    pub fn root(&self) -> &ConfigError {
        match self {
            ConfigError::Antenna { source, .. } => source.root(),
            other => other,
        }
    }
}
