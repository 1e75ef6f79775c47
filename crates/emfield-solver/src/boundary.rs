//! Per-antenna compliance boundary along the direction of peak gain.
//!
//! The antenna is taken alone. The search ray follows the pattern's peak
//! rather than the mechanical boresight. Gain is constant along the ray
//! and exposure falls monotonically with distance, so the 100% crossing
//! is bracketed by doubling and then bisected.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use emfield_core::constants::{
    BOUNDARY_MAX_ITERATIONS, BOUNDARY_SEARCH_CAP, BOUNDARY_TOLERANCE, LIMIT_PERCENT,
    MIN_SLANT_DISTANCE,
};
use emfield_core::types::Position;

use crate::antenna::Antenna;

/// How a boundary search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Crossing found inside the search range.
    Within,
    /// Already below the limit at the closest evaluated distance.
    BelowLimitAtSource,
    /// Still at or above the limit at the search cap.
    BeyondCap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryResult {
    pub distance_m: f64,
    pub kind: BoundaryKind,
}

impl BoundaryResult {
    pub fn is_unreachable(&self) -> bool {
        self.kind == BoundaryKind::BeyondCap
    }
}

/// Point `distance_m` along the antenna's peak-gain direction.
pub fn peak_point(antenna: &Antenna, distance_m: f64) -> Position {
    antenna.position.offset(antenna.peak_direction(), distance_m)
}

/// Percentage of limit from this antenna alone at `distance_m` along the
/// peak-gain direction.
pub fn peak_percentage(antenna: &Antenna, distance_m: f64) -> f64 {
    let point = peak_point(antenna, distance_m);
    100.0 * antenna.field_at(&point) / antenna.limit_v_m
}

/// Distance beyond which the antenna alone is below 100% of its limit.
pub fn boundary_distance(antenna: &Antenna) -> BoundaryResult {
    let exceeds = |d: f64| peak_percentage(antenna, d) >= LIMIT_PERCENT;

    let mut lo = MIN_SLANT_DISTANCE;
    if !exceeds(lo) {
        return BoundaryResult {
            distance_m: 0.0,
            kind: BoundaryKind::BelowLimitAtSource,
        };
    }

    let mut hi = lo;
    loop {
        if hi >= BOUNDARY_SEARCH_CAP {
            return BoundaryResult {
                distance_m: BOUNDARY_SEARCH_CAP,
                kind: BoundaryKind::BeyondCap,
            };
        }
        let next = (hi * 2.0).min(BOUNDARY_SEARCH_CAP);
        if !exceeds(next) {
            lo = hi;
            hi = next;
            break;
        }
        hi = next;
    }

    let mut iterations = 0;
    while hi - lo > BOUNDARY_TOLERANCE && iterations < BOUNDARY_MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if exceeds(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
        iterations += 1;
    }

    debug!(antenna = %antenna.id, distance_m = hi, iterations, "Boundary solved");
    BoundaryResult {
        distance_m: hi,
        kind: BoundaryKind::Within,
    }
}

/// Solve every antenna (enabled or not) in parallel, keyed by id.
pub fn solve_all(antennas: &[Antenna]) -> BTreeMap<String, BoundaryResult> {
    let results: Vec<(String, BoundaryResult)> = antennas
        .par_iter()
        .map(|a| (a.id.clone(), boundary_distance(a)))
        .collect();

    for (id, result) in &results {
        if result.is_unreachable() {
            warn!(
                antenna = %id,
                cap_m = BOUNDARY_SEARCH_CAP,
                "Compliance boundary beyond search cap"
            );
        }
    }
    results.into_iter().collect()
}
