//! Planet MSI/PLN pattern parser.
//!
//! The format is line-oriented: header keywords (`NAME`, `FREQUENCY`,
//! `GAIN`, ...) followed by a `HORIZONTAL n` and a `VERTICAL n` section,
//! each holding `angle attenuation_dB` pairs. Attenuations are relative
//! to the antenna peak. Vertical angles are depression angles: 0 is the
//! horizon, 90 straight down, 270 straight up.

use std::path::Path;

use tracing::debug;

use crate::error::{PatternError, PatternResult};
use crate::pattern::{db_to_linear, wrap_degrees};

/// Number of one-degree bins in a resampled cut.
const CUT_BINS: usize = 360;

/// dBd to dBi offset.
const DBD_TO_DBI: f64 = 2.15;

/// One principal-plane cut resampled onto one-degree bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    /// Attenuation in dB for angles 0, 1, ..., 359.
    bins: Vec<f64>,
}

/// Pattern defined by a horizontal and a vertical cut.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetPattern {
    pub name: String,
    /// Frequency the pattern was measured at (MHz), if stated.
    pub frequency_mhz: Option<f64>,
    /// Peak gain from the header in dBi, if stated. Informational only:
    /// EIRP already includes the antenna gain.
    pub peak_gain_dbi: Option<f64>,
    pub horizontal: Cut,
    pub vertical: Cut,
}

impl Cut {
    /// Resample scattered `(angle, attenuation)` samples onto one-degree bins
    /// by linear interpolation with wrap-around.
    pub fn from_samples(samples: &[(f64, f64)]) -> Result<Self, String> {
        if samples.is_empty() {
            return Err("cut has no samples".to_string());
        }

        let mut sorted: Vec<(f64, f64)> = samples
            .iter()
            .map(|&(angle, atten)| (wrap_degrees(angle), atten))
            .collect();
        // Stable sort keeps the first occurrence of a repeated angle first.
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        sorted.dedup_by(|later, earlier| later.0 == earlier.0);

        let n = sorted.len();
        let mut bins = Vec::with_capacity(CUT_BINS);
        for k in 0..CUT_BINS {
            let angle = k as f64;
            let i = sorted.partition_point(|s| s.0 <= angle);

            // Neighbours below and above, unwrapped across the 0/360 seam.
            let (a0, v0) = if i == 0 {
                let (a, v) = sorted[n - 1];
                (a - 360.0, v)
            } else {
                sorted[i - 1]
            };
            let (a1, v1) = if i == n {
                let (a, v) = sorted[0];
                (a + 360.0, v)
            } else {
                sorted[i]
            };

            let span = a1 - a0;
            let value = if span <= 0.0 {
                v0
            } else {
                let t = (angle - a0) / span;
                v0 * (1.0 - t) + v1 * t
            };
            bins.push(value);
        }

        Ok(Self { bins })
    }

    /// Attenuation at an arbitrary angle, linear between the two nearest bins.
    pub fn value(&self, angle_deg: f64) -> f64 {
        let a = wrap_degrees(angle_deg);
        let i0 = (a.floor() as usize) % CUT_BINS;
        let i1 = (i0 + 1) % CUT_BINS;
        let frac = a - a.floor();
        self.bins[i0] * (1.0 - frac) + self.bins[i1] * frac
    }

    /// Least-attenuated bin among `candidates`; the first wins a tie.
    fn peak_bin(&self, candidates: impl IntoIterator<Item = usize>) -> usize {
        candidates
            .into_iter()
            .fold(None, |best: Option<usize>, k| match best {
                Some(b) if self.bins[b] <= self.bins[k] => Some(b),
                _ => Some(k),
            })
            .unwrap_or(0)
    }
}

impl PlanetPattern {
    /// Combined attenuation: horizontal cut at the azimuth plus vertical cut
    /// at the depression angle.
    pub fn attenuation_db(&self, azimuth_deg: f64, elevation_deg: f64) -> f64 {
        let elevation = elevation_deg.clamp(-90.0, 90.0);
        let h = self.horizontal.value(azimuth_deg);
        let v = self.vertical.value(-elevation);
        h + v
    }

    /// Local (azimuth, elevation) of the least-attenuated bins. Only the
    /// depression angles reachable from [-90, 90] elevation are considered.
    pub fn peak_direction(&self) -> (f64, f64) {
        let azimuth = self.horizontal.peak_bin(0..CUT_BINS) as f64;
        let depression = self.vertical.peak_bin((0..=90).chain(270..CUT_BINS));
        let elevation = if depression <= 90 {
            -(depression as f64)
        } else {
            (CUT_BINS - depression) as f64
        };
        (azimuth, elevation)
    }

    /// Product of the two cuts' linear gains.
    pub fn gain(&self, azimuth_deg: f64, elevation_deg: f64) -> f64 {
        let elevation = elevation_deg.clamp(-90.0, 90.0);
        db_to_linear(-self.horizontal.value(azimuth_deg))
            * db_to_linear(-self.vertical.value(-elevation))
    }
}

/// Section currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Horizontal,
    Vertical,
}

/// Load a Planet pattern from disk.
pub fn load_planet(path: &Path) -> PatternResult<PlanetPattern> {
    let text = std::fs::read_to_string(path).map_err(|source| PatternError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_planet(&text, path)
}

/// Parse Planet pattern text. `path` is used for naming and error messages.
pub fn parse_planet(text: &str, path: &Path) -> PatternResult<PlanetPattern> {
    let syntax = |line: usize, reason: String| PatternError::Syntax {
        path: path.to_path_buf(),
        line: line as u64 + 1,
        reason,
    };
    let invalid = |reason: String| PatternError::Invalid {
        path: path.to_path_buf(),
        reason,
    };

    let mut name: Option<String> = None;
    let mut frequency_mhz = None;
    let mut peak_gain_dbi = None;
    let mut section = Section::Header;
    let mut horizontal: Vec<(f64, f64)> = Vec::new();
    let mut vertical: Vec<(f64, f64)> = Vec::new();
    let mut declared_h: Option<usize> = None;
    let mut declared_v: Option<usize> = None;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let starts_alpha = line.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if starts_alpha {
            let (keyword, rest) = match line.split_once(char::is_whitespace) {
                Some((k, r)) => (k, r.trim()),
                None => (line, ""),
            };

            match keyword.to_ascii_uppercase().as_str() {
                "NAME" => {
                    name = Some(rest.to_string());
                    section = Section::Header;
                }
                "FREQUENCY" => {
                    let value = first_number(rest)
                        .ok_or_else(|| syntax(line_no, format!("bad FREQUENCY value '{rest}'")))?;
                    frequency_mhz = Some(value);
                    section = Section::Header;
                }
                "GAIN" => {
                    let value = first_number(rest)
                        .ok_or_else(|| syntax(line_no, format!("bad GAIN value '{rest}'")))?;
                    let is_dbd = rest.to_ascii_lowercase().contains("dbd");
                    peak_gain_dbi = Some(if is_dbd { value + DBD_TO_DBI } else { value });
                    section = Section::Header;
                }
                "HORIZONTAL" => {
                    section = Section::Horizontal;
                    declared_h = parse_count(rest).map_err(|r| syntax(line_no, r))?;
                }
                "VERTICAL" => {
                    section = Section::Vertical;
                    declared_v = parse_count(rest).map_err(|r| syntax(line_no, r))?;
                }
                // MAKE, TILT, POLARIZATION, COMMENT, ... carry nothing we use.
                _ => section = Section::Header,
            }
            continue;
        }

        let sample = parse_sample(line).map_err(|r| syntax(line_no, r))?;
        match section {
            Section::Horizontal => horizontal.push(sample),
            Section::Vertical => vertical.push(sample),
            Section::Header => {
                return Err(syntax(
                    line_no,
                    "data line outside a HORIZONTAL or VERTICAL section".to_string(),
                ))
            }
        }
    }

    for (label, samples, declared) in [
        ("HORIZONTAL", &horizontal, declared_h),
        ("VERTICAL", &vertical, declared_v),
    ] {
        if samples.is_empty() {
            return Err(invalid(format!("missing or empty {label} section")));
        }
        if let Some(count) = declared {
            if count != samples.len() {
                return Err(invalid(format!(
                    "{label} declares {count} samples but has {}",
                    samples.len()
                )));
            }
        }
    }

    let horizontal = Cut::from_samples(&horizontal).map_err(invalid)?;
    let vertical = Cut::from_samples(&vertical).map_err(invalid)?;

    let name = name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| file_stem(path));

    debug!(
        pattern = %name,
        frequency_mhz = ?frequency_mhz,
        peak_gain_dbi = ?peak_gain_dbi,
        "Loaded Planet pattern"
    );

    Ok(PlanetPattern {
        name,
        frequency_mhz,
        peak_gain_dbi,
        horizontal,
        vertical,
    })
}

fn first_number(text: &str) -> Option<f64> {
    text.split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_count(rest: &str) -> Result<Option<usize>, String> {
    match rest.split_whitespace().next() {
        None => Ok(None),
        Some(tok) => tok
            .parse::<usize>()
            .map(Some)
            .map_err(|_| format!("bad sample count '{tok}'")),
    }
}

fn parse_sample(line: &str) -> Result<(f64, f64), String> {
    let mut parts = line.split_whitespace();
    let angle = parts.next().and_then(|t| t.parse::<f64>().ok());
    let atten = parts.next().and_then(|t| t.parse::<f64>().ok());
    match (angle, atten) {
        (Some(a), Some(v)) if a.is_finite() && v.is_finite() => Ok((a, v)),
        _ => Err(format!("expected 'angle attenuation', got '{line}'")),
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pattern")
        .to_string()
}
