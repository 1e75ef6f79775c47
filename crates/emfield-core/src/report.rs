//! Compliance report schema (`report.json`).
//!
//! Field order here is the key order in the written JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Orientation, Position};

/// The full report, assembled once at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub metadata: ReportMetadata,
    pub grid: GridSection,
    pub summary: ReportSummary,
    pub antennas: Vec<AntennaEcho>,
    /// Antenna id → compliance boundary distance (meters).
    pub compliance_boundaries: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub standard: String,
    pub category: String,
    pub simulation_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    pub bounds: GridBounds,
    pub z_level: f64,
    pub resolution: f64,
    pub num_x: usize,
    pub num_y: usize,
    pub total_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_points: usize,
    pub compliant_points: usize,
    pub marginal_points: usize,
    pub non_compliant_points: usize,
    pub max_field_value_v_m: f64,
    pub max_percentage_of_limit: f64,
    /// Highest summed power density over the grid (W/m²).
    pub max_power_density_w_m2: f64,
    /// True iff no point is NON_COMPLIANT.
    pub overall_compliant: bool,
    /// Antennas whose isolated exposure still exceeds the limit at the
    /// search cap; their boundary is reported as the cap distance.
    pub unreachable_boundaries: Vec<String>,
}

/// Antenna definition echoed into the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntennaEcho {
    pub id: String,
    pub pattern_file: String,
    pub frequency_mhz: f64,
    pub power_eirp_watts: f64,
    pub position: Position,
    pub orientation: Orientation,
    pub enabled: bool,
    /// Reference limit at this antenna's frequency (V/m).
    pub limit_v_m: f64,
    /// Equivalent plane-wave power-density limit (W/m²).
    pub power_density_limit_w_m2: f64,
}
