//! Enumeration types used throughout the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{LIMIT_PERCENT, MARGINAL_THRESHOLD_PERCENT};
use crate::error::ConfigError;

/// Compliance assessment of one evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    /// Below the marginal threshold.
    Compliant,
    /// Within 80–100% of the limit (warning zone).
    Marginal,
    /// Exceeds the limit.
    NonCompliant,
}

/// Exposure category of a standard's reference levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureCategory {
    /// Uncontrolled exposure of the general population.
    #[default]
    GeneralPublic,
    /// Controlled exposure of trained workers.
    Occupational,
}

/// Regulatory exposure standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardId {
    /// ICNIRP 2020 RF guidelines.
    #[serde(rename = "ICNIRP_2020")]
    Icnirp2020,
    /// FCC OET Bulletin 65.
    #[serde(rename = "FCC")]
    Fcc,
    /// ICASA (ICNIRP 1998 reference levels as adopted in South Africa).
    #[serde(rename = "ICASA")]
    Icasa,
}

impl ComplianceStatus {
    /// Classify a percentage of limit.
    /// `< 80` compliant, `80..=100` marginal, `> 100` non-compliant.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > LIMIT_PERCENT {
            ComplianceStatus::NonCompliant
        } else if percentage >= MARGINAL_THRESHOLD_PERCENT {
            ComplianceStatus::Marginal
        } else {
            ComplianceStatus::Compliant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "COMPLIANT",
            ComplianceStatus::Marginal => "MARGINAL",
            ComplianceStatus::NonCompliant => "NON_COMPLIANT",
        }
    }
}

impl ExposureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureCategory::GeneralPublic => "general_public",
            ExposureCategory::Occupational => "occupational",
        }
    }
}

impl StandardId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardId::Icnirp2020 => "ICNIRP_2020",
            StandardId::Fcc => "FCC",
            StandardId::Icasa => "ICASA",
        }
    }
}

impl FromStr for ExposureCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general_public" | "general-public" | "public" => Ok(ExposureCategory::GeneralPublic),
            "occupational" => Ok(ExposureCategory::Occupational),
            _ => Err(ConfigError::UnknownCategory(s.to_string())),
        }
    }
}

impl FromStr for StandardId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ICNIRP_2020" | "ICNIRP" => Ok(StandardId::Icnirp2020),
            "FCC" | "FCC_OET65" | "FCC_OET_65" => Ok(StandardId::Fcc),
            "ICASA" => Ok(StandardId::Icasa),
            _ => Err(ConfigError::UnknownStandard(s.to_string())),
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExposureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StandardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
