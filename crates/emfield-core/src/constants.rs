//! Physical constants and engine tuning parameters.

// --- Physics ---

/// Far-field constant in `E = sqrt(30 * EIRP * G) / r` (V/m, W, m).
pub const FAR_FIELD_CONSTANT: f64 = 30.0;

/// Free-space wave impedance used to convert field strength to power density (ohms).
pub const FREE_SPACE_IMPEDANCE: f64 = 377.0;

/// Slant distances below this are clamped to it (meters).
/// Keeps `1/r` finite when an antenna sits exactly on a grid point.
pub const MIN_SLANT_DISTANCE: f64 = 0.1;

// --- Classification ---

/// Percentage of limit at which a point becomes MARGINAL.
pub const MARGINAL_THRESHOLD_PERCENT: f64 = 80.0;

/// Percentage of limit above which a point is NON_COMPLIANT.
pub const LIMIT_PERCENT: f64 = 100.0;

// --- Compliance boundary search ---

/// Distance at which the boundary search gives up (meters, 10 km).
pub const BOUNDARY_SEARCH_CAP: f64 = 10_000.0;

/// Absolute tolerance of the boundary bisection (meters).
pub const BOUNDARY_TOLERANCE: f64 = 0.01;

/// Iteration cap for the bisection phase.
pub const BOUNDARY_MAX_ITERATIONS: u32 = 200;

// --- Grid ---

/// Upper bound on evaluation points for one run.
pub const MAX_GRID_POINTS: usize = 25_000_000;

/// Slack applied before flooring `extent / resolution`, absorbs binary
/// representation error such as `200.0 / 0.1 = 1999.9999…`.
pub const GRID_COUNT_EPSILON: f64 = 1e-9;

// --- Configuration defaults ---

/// Run name used when the config omits `name`.
pub const DEFAULT_ANALYSIS_NAME: &str = "EMF Compliance Analysis";

/// Evaluation height used when the config omits `grid.z_level` (meters).
pub const DEFAULT_Z_LEVEL: f64 = 1.5;

/// `pattern_file` value selecting the isotropic pattern.
pub const ISOTROPIC_PATTERN: &str = "isotropic";

// --- Output ---

/// Per-point results file name.
pub const RESULTS_FILE_NAME: &str = "results.csv";

/// Summary report file name.
pub const REPORT_FILE_NAME: &str = "report.json";

/// Decimal places used for numeric CSV columns.
pub const CSV_DECIMALS: usize = 6;
