//! Regulatory reference-level tables.
//!
//! Each {standard, category} pair is a fixed list of frequency bands with
//! a field-strength rule per band. Bands are half-open `[lo, hi)` except
//! the last, which also includes its upper edge. Frequencies outside the
//! covered range are a configuration error, never clamped.

use emfield_core::constants::FREE_SPACE_IMPEDANCE;
use emfield_core::enums::{ExposureCategory, StandardId};
use emfield_core::error::{ConfigError, ConfigResult};

/// Field-strength rule within one band (f in MHz, result in V/m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitRule {
    /// Constant limit.
    Flat(f64),
    /// `k * sqrt(f)`.
    SqrtScaled(f64),
    /// `k / f`.
    InverseScaled(f64),
    /// `k / sqrt(f)`.
    InverseSqrtScaled(f64),
    /// `min(k / f, cap)`.
    InverseCapped { k: f64, cap: f64 },
    /// `sqrt(377 * f / divisor)`: E from a power-density limit `f / divisor` W/m².
    FromPowerDensity { divisor: f64 },
}

/// One regulatory band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitBand {
    pub lo_mhz: f64,
    pub hi_mhz: f64,
    pub rule: LimitRule,
}

impl LimitRule {
    pub fn evaluate(&self, f: f64) -> f64 {
        match *self {
            LimitRule::Flat(e) => e,
            LimitRule::SqrtScaled(k) => k * f.sqrt(),
            LimitRule::InverseScaled(k) => k / f,
            LimitRule::InverseSqrtScaled(k) => k / f.sqrt(),
            LimitRule::InverseCapped { k, cap } => (k / f).min(cap),
            LimitRule::FromPowerDensity { divisor } => (FREE_SPACE_IMPEDANCE * f / divisor).sqrt(),
        }
    }

    /// Human-readable formula, for logs.
    pub fn describe(&self) -> String {
        match *self {
            LimitRule::Flat(e) => format!("{e} V/m"),
            LimitRule::SqrtScaled(k) => format!("{k}*sqrt(f) V/m"),
            LimitRule::InverseScaled(k) => format!("{k}/f V/m"),
            LimitRule::InverseSqrtScaled(k) => format!("{k}/sqrt(f) V/m"),
            LimitRule::InverseCapped { k, cap } => format!("min({k}/f, {cap}) V/m"),
            LimitRule::FromPowerDensity { divisor } => format!("sqrt(377*f/{divisor}) V/m"),
        }
    }
}

const fn band(lo_mhz: f64, hi_mhz: f64, rule: LimitRule) -> LimitBand {
    LimitBand {
        lo_mhz,
        hi_mhz,
        rule,
    }
}

// --- ICNIRP 2020 ---

const ICNIRP_2020_PUBLIC: &[LimitBand] = &[
    band(0.1, 30.0, LimitRule::Flat(87.0)),
    band(30.0, 400.0, LimitRule::Flat(28.0)),
    band(400.0, 2000.0, LimitRule::SqrtScaled(1.375)),
    band(2000.0, 300_000.0, LimitRule::Flat(61.0)),
];

const ICNIRP_2020_OCCUPATIONAL: &[LimitBand] = &[
    band(0.1, 30.0, LimitRule::Flat(194.6)),
    band(30.0, 400.0, LimitRule::Flat(62.6)),
    band(400.0, 2000.0, LimitRule::SqrtScaled(3.07)),
    band(2000.0, 300_000.0, LimitRule::Flat(137.0)),
];

// --- FCC OET-65 ---

const FCC_PUBLIC: &[LimitBand] = &[
    band(0.3, 1.34, LimitRule::Flat(614.0)),
    band(1.34, 3.0, LimitRule::InverseCapped { k: 824.0, cap: 614.0 }),
    band(3.0, 30.0, LimitRule::InverseScaled(824.0)),
    band(30.0, 300.0, LimitRule::Flat(27.5)),
    band(300.0, 1500.0, LimitRule::FromPowerDensity { divisor: 150.0 }),
    band(1500.0, 100_000.0, LimitRule::Flat(61.4)),
];

const FCC_OCCUPATIONAL: &[LimitBand] = &[
    band(0.3, 1.34, LimitRule::Flat(614.0)),
    band(1.34, 3.0, LimitRule::Flat(614.0)),
    band(3.0, 30.0, LimitRule::InverseScaled(1842.0)),
    band(30.0, 300.0, LimitRule::Flat(61.4)),
    band(300.0, 1500.0, LimitRule::FromPowerDensity { divisor: 30.0 }),
    band(1500.0, 100_000.0, LimitRule::Flat(137.0)),
];

// --- ICASA (ICNIRP 1998 reference levels) ---

const ICASA_PUBLIC: &[LimitBand] = &[
    band(0.1, 1.0, LimitRule::Flat(87.0)),
    band(1.0, 10.0, LimitRule::InverseSqrtScaled(87.0)),
    band(10.0, 400.0, LimitRule::Flat(28.0)),
    band(400.0, 2000.0, LimitRule::SqrtScaled(1.375)),
    band(2000.0, 300_000.0, LimitRule::Flat(61.0)),
];

const ICASA_OCCUPATIONAL: &[LimitBand] = &[
    band(0.1, 1.0, LimitRule::Flat(610.0)),
    band(1.0, 10.0, LimitRule::InverseScaled(610.0)),
    band(10.0, 400.0, LimitRule::Flat(61.0)),
    band(400.0, 2000.0, LimitRule::SqrtScaled(3.0)),
    band(2000.0, 300_000.0, LimitRule::Flat(137.0)),
];

/// A resolved {standard, category} limit function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureStandard {
    pub id: StandardId,
    pub category: ExposureCategory,
    bands: &'static [LimitBand],
}

impl ExposureStandard {
    pub fn new(id: StandardId, category: ExposureCategory) -> Self {
        let bands = match (id, category) {
            (StandardId::Icnirp2020, ExposureCategory::GeneralPublic) => ICNIRP_2020_PUBLIC,
            (StandardId::Icnirp2020, ExposureCategory::Occupational) => ICNIRP_2020_OCCUPATIONAL,
            (StandardId::Fcc, ExposureCategory::GeneralPublic) => FCC_PUBLIC,
            (StandardId::Fcc, ExposureCategory::Occupational) => FCC_OCCUPATIONAL,
            (StandardId::Icasa, ExposureCategory::GeneralPublic) => ICASA_PUBLIC,
            (StandardId::Icasa, ExposureCategory::Occupational) => ICASA_OCCUPATIONAL,
        };
        Self {
            id,
            category,
            bands,
        }
    }

    /// Parse standard and category names from the config.
    pub fn from_names(standard: &str, category: &str) -> ConfigResult<Self> {
        let id: StandardId = standard.parse()?;
        let category: ExposureCategory = category.parse()?;
        Ok(Self::new(id, category))
    }

    pub fn bands(&self) -> &'static [LimitBand] {
        self.bands
    }

    /// Covered frequency range (MHz), inclusive at both ends.
    pub fn coverage(&self) -> (f64, f64) {
        let first = self.bands[0].lo_mhz;
        let last = self.bands[self.bands.len() - 1].hi_mhz;
        (first, last)
    }

    /// Band containing `frequency_mhz`.
    pub fn band_for(&self, frequency_mhz: f64) -> ConfigResult<&'static LimitBand> {
        let last = self.bands.len() - 1;
        self.bands
            .iter()
            .enumerate()
            .find(|(i, b)| {
                frequency_mhz >= b.lo_mhz
                    && (frequency_mhz < b.hi_mhz || (*i == last && frequency_mhz == b.hi_mhz))
            })
            .map(|(_, b)| b)
            .ok_or_else(|| {
                let (min_mhz, max_mhz) = self.coverage();
                ConfigError::UnsupportedFrequency {
                    standard: self.id,
                    category: self.category,
                    frequency_mhz,
                    min_mhz,
                    max_mhz,
                }
            })
    }

    /// Reference E-field limit (V/m) at `frequency_mhz`.
    pub fn limit_v_m(&self, frequency_mhz: f64) -> ConfigResult<f64> {
        Ok(self.band_for(frequency_mhz)?.rule.evaluate(frequency_mhz))
    }
}

/// Plane-wave power density for an RMS field: `E² / 377`.
pub fn power_density_from_field(e_v_m: f64) -> f64 {
    e_v_m * e_v_m / FREE_SPACE_IMPEDANCE
}
