//! CSV gain table: `azimuth_deg, elevation_deg, gain_db` rows covering a
//! complete rectangular azimuth × elevation grid.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{PatternError, PatternResult};
use crate::pattern::{db_to_linear, wrap_degrees};
use crate::planet::file_stem;

/// Angles are keyed in thousandths of a degree when building the grid.
const ANGLE_KEY_SCALE: f64 = 1000.0;

/// Full-circle azimuth in key units.
const FULL_CIRCLE_KEY: i64 = 360_000;

/// Pattern sampled on a rectangular grid, normalized so the maximum is 0 dB.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePattern {
    pub name: String,
    /// Peak gain of the raw table in dB (subtracted during normalization).
    pub peak_db: f64,
    /// Sorted, distinct azimuths in [0, 360).
    azimuths: Vec<f64>,
    /// Sorted, distinct elevations in [-90, 90].
    elevations: Vec<f64>,
    /// Normalized gains (≤ 0 dB), azimuth-major: `[ai * elevations.len() + ei]`.
    gains_db: Vec<f64>,
}

impl TablePattern {
    /// Build from `(azimuth, elevation, gain_db)` samples.
    pub fn from_samples(name: String, samples: &[(f64, f64, f64)]) -> Result<Self, String> {
        if samples.is_empty() {
            return Err("table has no samples".to_string());
        }

        let mut cells: BTreeMap<(i64, i64), f64> = BTreeMap::new();
        for &(az, el, gain) in samples {
            if !(-90.0..=90.0).contains(&el) {
                return Err(format!("elevation {el} outside [-90, 90]"));
            }
            let az_key = ((wrap_degrees(az) * ANGLE_KEY_SCALE).round() as i64) % FULL_CIRCLE_KEY;
            let el_key = (el * ANGLE_KEY_SCALE).round() as i64;
            if let Some(existing) = cells.insert((az_key, el_key), gain) {
                // 0° and 360° rows often both appear; they must agree.
                if existing != gain {
                    return Err(format!(
                        "conflicting gains {existing} and {gain} at azimuth {az}, elevation {el}"
                    ));
                }
            }
        }

        let az_keys: Vec<i64> = dedup_sorted(cells.keys().map(|k| k.0).collect());
        let el_keys: Vec<i64> = dedup_sorted(cells.keys().map(|k| k.1).collect());

        let expected = az_keys.len() * el_keys.len();
        if cells.len() != expected {
            return Err(format!(
                "incomplete grid: {} of {} azimuth × elevation cells present",
                cells.len(),
                expected
            ));
        }

        let peak_db = cells.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut gains_db = Vec::with_capacity(expected);
        for &az in &az_keys {
            for &el in &el_keys {
                gains_db.push(cells[&(az, el)] - peak_db);
            }
        }

        Ok(Self {
            name,
            peak_db,
            azimuths: az_keys.iter().map(|&k| k as f64 / ANGLE_KEY_SCALE).collect(),
            elevations: el_keys.iter().map(|&k| k as f64 / ANGLE_KEY_SCALE).collect(),
            gains_db,
        })
    }

    /// Grid dimensions as (azimuth count, elevation count).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.azimuths.len(), self.elevations.len())
    }

    /// Local (azimuth, elevation) of the 0 dB cell. The first in
    /// azimuth-major order wins a tie.
    pub fn peak_direction(&self) -> (f64, f64) {
        let n_el = self.elevations.len();
        let index = self
            .gains_db
            .iter()
            .enumerate()
            .fold(0, |best, (i, &g)| if g > self.gains_db[best] { i } else { best });
        (self.azimuths[index / n_el], self.elevations[index % n_el])
    }

    fn cell(&self, ai: usize, ei: usize) -> f64 {
        self.gains_db[ai * self.elevations.len() + ei]
    }

    /// Bracketing azimuth indices and fraction, wrapping across the 0/360 seam.
    fn azimuth_bracket(&self, azimuth_deg: f64) -> (usize, usize, f64) {
        let n = self.azimuths.len();
        if n == 1 {
            return (0, 0, 0.0);
        }
        let a = wrap_degrees(azimuth_deg);
        let i = self.azimuths.partition_point(|&v| v <= a);
        if i == 0 || i == n {
            let first = self.azimuths[0];
            let last = self.azimuths[n - 1];
            let span = first + 360.0 - last;
            let offset = if a >= last { a - last } else { a + 360.0 - last };
            (n - 1, 0, offset / span)
        } else {
            let lo = self.azimuths[i - 1];
            let hi = self.azimuths[i];
            (i - 1, i, (a - lo) / (hi - lo))
        }
    }

    /// Bracketing elevation indices and fraction, clamped to the table range.
    fn elevation_bracket(&self, elevation_deg: f64) -> (usize, usize, f64) {
        let n = self.elevations.len();
        let e = elevation_deg.clamp(self.elevations[0], self.elevations[n - 1]);
        let i = self.elevations.partition_point(|&v| v <= e);
        if i >= n {
            return (n - 1, n - 1, 0.0);
        }
        // e >= elevations[0] guarantees i >= 1 here.
        let lo = self.elevations[i - 1];
        let hi = self.elevations[i];
        (i - 1, i, (e - lo) / (hi - lo))
    }

    /// Attenuation below the table peak (dB, ≥ 0), bilinear in dB.
    pub fn attenuation_db(&self, azimuth_deg: f64, elevation_deg: f64) -> f64 {
        let (a0, a1, fa) = self.azimuth_bracket(azimuth_deg);
        let (e0, e1, fe) = self.elevation_bracket(elevation_deg);

        let g00 = self.cell(a0, e0);
        let g01 = self.cell(a0, e1);
        let g10 = self.cell(a1, e0);
        let g11 = self.cell(a1, e1);

        let low = g00 * (1.0 - fe) + g01 * fe;
        let high = g10 * (1.0 - fe) + g11 * fe;
        -(low * (1.0 - fa) + high * fa)
    }

    /// Linear relative gain.
    pub fn gain(&self, azimuth_deg: f64, elevation_deg: f64) -> f64 {
        db_to_linear(-self.attenuation_db(azimuth_deg, elevation_deg))
    }
}

fn dedup_sorted(mut keys: Vec<i64>) -> Vec<i64> {
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Load a CSV gain table from disk.
pub fn load_table(path: &Path) -> PatternResult<TablePattern> {
    let text = std::fs::read_to_string(path).map_err(|source| PatternError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&text, path)
}

/// Parse CSV gain table text. A first row that is not numeric is a header.
pub fn parse_table(text: &str, path: &Path) -> PatternResult<TablePattern> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut samples = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = |r: &csv::StringRecord| r.position().map_or(index as u64 + 1, |p| p.line());
        let record = record.map_err(|e| PatternError::Syntax {
            path: path.to_path_buf(),
            line: e.position().map_or(index as u64 + 1, |p| p.line()),
            reason: e.to_string(),
        })?;

        let values: Vec<Option<f64>> = record
            .iter()
            .take(3)
            .map(|field| field.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect();

        match values.as_slice() {
            [Some(az), Some(el), Some(gain)] => samples.push((*az, *el, *gain)),
            _ if index == 0 => continue,
            _ => {
                return Err(PatternError::Syntax {
                    path: path.to_path_buf(),
                    line: line(&record),
                    reason: "expected 'azimuth, elevation, gain' numbers".to_string(),
                })
            }
        }
    }

    let table = TablePattern::from_samples(file_stem(path), &samples).map_err(|reason| {
        PatternError::Invalid {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    let (n_az, n_el) = table.dimensions();
    debug!(
        pattern = %table.name,
        azimuths = n_az,
        elevations = n_el,
        peak_db = table.peak_db,
        "Loaded gain table"
    );

    Ok(table)
}
