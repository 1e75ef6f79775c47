//! Multi-source exposure aggregation at a single point.
//!
//! Sources at different frequencies have different limits, so compliance
//! is judged on the sum of exposure ratios `R = Σ (E_i / L_i)²`. The
//! reported percentage is `100 * sqrt(R)`; for a single source that is
//! simply `100 * E / L`. Summation is incoherent (power-additive), so
//! power densities add directly.

use emfield_core::enums::ComplianceStatus;
use emfield_core::types::Position;

use crate::antenna::Antenna;

/// Combined exposure at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointExposure {
    /// RMS combined field `sqrt(Σ E_i²)` in V/m.
    pub field_v_m: f64,
    /// Effective limit `field / sqrt(R)`; equals the per-antenna limit
    /// when all sources share a frequency.
    pub limit_v_m: f64,
    /// `100 * sqrt(R)`.
    pub percentage_of_limit: f64,
    pub status: ComplianceStatus,
    /// Summed plane-wave power density in W/m².
    pub power_density_w_m2: f64,
}

/// Evaluate the combined exposure of all enabled antennas at `point`.
pub fn evaluate(point: &Position, antennas: &[Antenna]) -> PointExposure {
    let mut field_sq = 0.0;
    let mut ratio = 0.0;
    let mut power_density_w_m2 = 0.0;
    for antenna in antennas.iter().filter(|a| a.enabled) {
        let e = antenna.field_at(point);
        let r = e / antenna.limit_v_m;
        field_sq += e * e;
        ratio += r * r;
        power_density_w_m2 += antenna.power_density_at(point);
    }

    let field_v_m = field_sq.sqrt();
    let percentage_of_limit = 100.0 * ratio.sqrt();
    let limit_v_m = if ratio > 0.0 {
        field_v_m / ratio.sqrt()
    } else {
        fallback_limit(antennas)
    };

    PointExposure {
        field_v_m,
        limit_v_m,
        percentage_of_limit,
        status: ComplianceStatus::from_percentage(percentage_of_limit),
        power_density_w_m2,
    }
}

/// Limit reported where no field is present: the lowest-frequency enabled
/// antenna's limit, else the lowest-frequency antenna overall, else 0.
pub fn fallback_limit(antennas: &[Antenna]) -> f64 {
    let lowest = |enabled_only: bool| {
        antennas
            .iter()
            .filter(|a| !enabled_only || a.enabled)
            .min_by(|a, b| a.frequency_mhz.total_cmp(&b.frequency_mhz))
            .map(|a| a.limit_v_m)
    };
    lowest(true).or_else(|| lowest(false)).unwrap_or(0.0)
}
