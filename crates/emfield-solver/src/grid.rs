//! Grid evaluation.
//!
//! The grid is walked row-major (y outer, x inner) at a fixed height.
//! Rows are evaluated in parallel; each row yields its points and a
//! partial summary, and rows are joined back in order so the output is
//! identical to the sequential walk.

use rayon::prelude::*;
use tracing::debug;

use emfield_core::config::GridConfig;
use emfield_core::constants::{GRID_COUNT_EPSILON, MAX_GRID_POINTS};
use emfield_core::enums::ComplianceStatus;
use emfield_core::error::{ConfigError, ConfigResult};
use emfield_core::report::{GridBounds, GridSection};
use emfield_core::types::Position;

use crate::aggregate::{self, PointExposure};
use crate::antenna::Antenna;

/// Validated evaluation grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_level: f64,
    pub resolution: f64,
    num_x: usize,
    num_y: usize,
}

impl GridSpec {
    /// Validate a grid config and derive the point counts.
    pub fn from_config(config: &GridConfig) -> ConfigResult<Self> {
        let fields = [
            ("x_min", config.x_min),
            ("x_max", config.x_max),
            ("y_min", config.y_min),
            ("y_max", config.y_max),
            ("z_level", config.z_level),
            ("resolution", config.resolution),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::InvalidGrid(format!("{name} must be finite, got {value}")));
        }
        if config.resolution <= 0.0 {
            return Err(ConfigError::InvalidGrid(format!(
                "resolution must be positive, got {}",
                config.resolution
            )));
        }

        let num_x = axis_count("x", config.x_min, config.x_max, config.resolution)?;
        let num_y = axis_count("y", config.y_min, config.y_max, config.resolution)?;
        let total = num_x.checked_mul(num_y).filter(|&n| n <= MAX_GRID_POINTS);
        if total.is_none() {
            return Err(ConfigError::InvalidGrid(format!(
                "{num_x} x {num_y} points exceeds the limit of {MAX_GRID_POINTS}"
            )));
        }

        Ok(Self {
            x_min: config.x_min,
            x_max: config.x_max,
            y_min: config.y_min,
            y_max: config.y_max,
            z_level: config.z_level,
            resolution: config.resolution,
            num_x,
            num_y,
        })
    }

    pub fn num_x(&self) -> usize {
        self.num_x
    }

    pub fn num_y(&self) -> usize {
        self.num_y
    }

    pub fn total_points(&self) -> usize {
        self.num_x * self.num_y
    }

    /// Position of grid cell (ix, iy).
    pub fn point(&self, ix: usize, iy: usize) -> Position {
        Position::new(
            self.x_min + ix as f64 * self.resolution,
            self.y_min + iy as f64 * self.resolution,
            self.z_level,
        )
    }

    /// Report section describing this grid.
    pub fn section(&self) -> GridSection {
        GridSection {
            bounds: GridBounds {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
            },
            z_level: self.z_level,
            resolution: self.resolution,
            num_x: self.num_x,
            num_y: self.num_y,
            total_points: self.total_points(),
        }
    }
}

fn axis_count(axis: &str, min: f64, max: f64, resolution: f64) -> ConfigResult<usize> {
    if min > max {
        return Err(ConfigError::InvalidGrid(format!(
            "{axis}_min {min} is greater than {axis}_max {max}"
        )));
    }
    let extent = max - min;
    if extent > 0.0 && resolution > extent {
        return Err(ConfigError::InvalidGrid(format!(
            "resolution {resolution} exceeds the {axis} extent {extent}"
        )));
    }
    let steps = (extent / resolution + GRID_COUNT_EPSILON).floor();
    if steps >= MAX_GRID_POINTS as f64 {
        return Err(ConfigError::InvalidGrid(format!(
            "{axis} axis has more than {MAX_GRID_POINTS} points"
        )));
    }
    Ok(steps as usize + 1)
}

/// One evaluated grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationPoint {
    pub position: Position,
    pub exposure: PointExposure,
}

/// Running counts and maxima over evaluated points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SummaryAccumulator {
    pub total_points: usize,
    pub compliant_points: usize,
    pub marginal_points: usize,
    pub non_compliant_points: usize,
    pub max_field_v_m: f64,
    pub max_percentage_of_limit: f64,
    pub max_power_density_w_m2: f64,
}

impl SummaryAccumulator {
    pub fn push(&mut self, exposure: &PointExposure) {
        self.total_points += 1;
        match exposure.status {
            ComplianceStatus::Compliant => self.compliant_points += 1,
            ComplianceStatus::Marginal => self.marginal_points += 1,
            ComplianceStatus::NonCompliant => self.non_compliant_points += 1,
        }
        self.max_field_v_m = self.max_field_v_m.max(exposure.field_v_m);
        self.max_percentage_of_limit =
            self.max_percentage_of_limit.max(exposure.percentage_of_limit);
        self.max_power_density_w_m2 =
            self.max_power_density_w_m2.max(exposure.power_density_w_m2);
    }

    pub fn merge(mut self, other: SummaryAccumulator) -> SummaryAccumulator {
        self.total_points += other.total_points;
        self.compliant_points += other.compliant_points;
        self.marginal_points += other.marginal_points;
        self.non_compliant_points += other.non_compliant_points;
        self.max_field_v_m = self.max_field_v_m.max(other.max_field_v_m);
        self.max_percentage_of_limit =
            self.max_percentage_of_limit.max(other.max_percentage_of_limit);
        self.max_power_density_w_m2 =
            self.max_power_density_w_m2.max(other.max_power_density_w_m2);
        self
    }

    /// True when no point exceeds its limit.
    pub fn overall_compliant(&self) -> bool {
        self.non_compliant_points == 0
    }
}

/// Evaluated grid in row-major order plus its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct GridResults {
    pub points: Vec<EvaluationPoint>,
    pub summary: SummaryAccumulator,
}

type Row = (Vec<EvaluationPoint>, SummaryAccumulator);

fn evaluate_row(grid: &GridSpec, antennas: &[Antenna], iy: usize) -> Row {
    let mut points = Vec::with_capacity(grid.num_x);
    let mut summary = SummaryAccumulator::default();
    for ix in 0..grid.num_x {
        let position = grid.point(ix, iy);
        let exposure = aggregate::evaluate(&position, antennas);
        summary.push(&exposure);
        points.push(EvaluationPoint { position, exposure });
    }
    (points, summary)
}

fn join_rows(grid: &GridSpec, rows: Vec<Row>) -> GridResults {
    let mut points = Vec::with_capacity(grid.total_points());
    let mut summary = SummaryAccumulator::default();
    for (row, partial) in rows {
        points.extend(row);
        summary = summary.merge(partial);
    }
    GridResults { points, summary }
}

/// Evaluate every grid point, rows in parallel on the current rayon pool.
pub fn run(grid: &GridSpec, antennas: &[Antenna]) -> GridResults {
    debug!(num_x = grid.num_x, num_y = grid.num_y, "Evaluating grid (parallel)");
    let rows: Vec<_> = (0..grid.num_y)
        .into_par_iter()
        .map(|iy| evaluate_row(grid, antennas, iy))
        .collect();
    join_rows(grid, rows)
}

/// Single-threaded evaluation; output is identical to [`run`].
pub fn run_sequential(grid: &GridSpec, antennas: &[Antenna]) -> GridResults {
    debug!(num_x = grid.num_x, num_y = grid.num_y, "Evaluating grid (sequential)");
    let rows: Vec<_> = (0..grid.num_y).map(|iy| evaluate_row(grid, antennas, iy)).collect();
    join_rows(grid, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antenna::test_antenna;

    fn config(x: (f64, f64), y: (f64, f64), resolution: f64) -> GridConfig {
        GridConfig {
            x_min: x.0,
            x_max: x.1,
            y_min: y.0,
            y_max: y.1,
            z_level: 1.5,
            resolution,
        }
    }

    #[test]
    fn test_point_counts() {
        let g = GridSpec::from_config(&config((-10.0, 10.0), (0.0, 5.0), 1.0)).unwrap();
        assert_eq!((g.num_x(), g.num_y()), (21, 6));
        assert_eq!(g.total_points(), 126);

        // Non-dividing resolution stops short of the max edge.
        let g = GridSpec::from_config(&config((0.0, 10.0), (0.0, 10.0), 3.0)).unwrap();
        assert_eq!(g.num_x(), 4);
        assert_eq!(g.point(3, 0).x, 9.0);
    }

    #[test]
    fn test_fractional_resolution_count() {
        // 0.3 / 0.1 is 2.9999999999999996 in floating point.
        let g = GridSpec::from_config(&config((0.0, 0.3), (0.0, 0.3), 0.1)).unwrap();
        assert_eq!(g.num_x(), 4);
    }

    #[test]
    fn test_degenerate_axis() {
        let g = GridSpec::from_config(&config((5.0, 5.0), (0.0, 2.0), 1.0)).unwrap();
        assert_eq!(g.num_x(), 1);
        assert_eq!(g.num_y(), 3);
    }

    #[test]
    fn test_invalid_grids() {
        let bad = [
            config((0.0, 10.0), (0.0, 10.0), 0.0),
            config((0.0, 10.0), (0.0, 10.0), -1.0),
            config((10.0, 0.0), (0.0, 10.0), 1.0),
            config((0.0, 10.0), (0.0, 10.0), 20.0),
            config((0.0, f64::NAN), (0.0, 10.0), 1.0),
            config((0.0, 1e6), (0.0, 1e6), 0.01),
        ];
        for c in bad {
            assert!(
                matches!(GridSpec::from_config(&c), Err(ConfigError::InvalidGrid(_))),
                "{c:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_row_major_order() {
        let g = GridSpec::from_config(&config((0.0, 2.0), (0.0, 1.0), 1.0)).unwrap();
        let a = test_antenna("a", Position::new(1.0, 0.5, 10.0), 10.0, 28.0);
        let r = run(&g, &[a]);
        let xy: Vec<(f64, f64)> = r.points.iter().map(|p| (p.position.x, p.position.y)).collect();
        assert_eq!(
            xy,
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0), (1.0, 1.0), (2.0, 1.0)]
        );
        assert!(r.points.iter().all(|p| p.position.z == 1.5));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let g = GridSpec::from_config(&config((-50.0, 50.0), (-30.0, 30.0), 0.7)).unwrap();
        let antennas = vec![
            test_antenna("a", Position::new(0.0, 0.0, 20.0), 500.0, 28.0),
            test_antenna("b", Position::new(10.0, -5.0, 3.0), 80.0, 41.0),
        ];
        assert_eq!(run(&g, &antennas), run_sequential(&g, &antennas));
    }

    #[test]
    fn test_summary_counts() {
        let g = GridSpec::from_config(&config((-20.0, 20.0), (-20.0, 20.0), 1.0)).unwrap();
        let antennas = vec![test_antenna("a", Position::new(0.0, 0.0, 2.0), 2000.0, 28.0)];
        let r = run(&g, &antennas);
        let s = r.summary;
        assert_eq!(s.total_points, r.points.len());
        assert_eq!(s.compliant_points + s.marginal_points + s.non_compliant_points, s.total_points);
        assert!(s.non_compliant_points > 0);
        assert!(!s.overall_compliant());
        let max_pct = r.points.iter().map(|p| p.exposure.percentage_of_limit).fold(0.0, f64::max);
        assert_eq!(s.max_percentage_of_limit, max_pct);
        let max_pd = r.points.iter().map(|p| p.exposure.power_density_w_m2).fold(0.0, f64::max);
        assert_eq!(s.max_power_density_w_m2, max_pd);
        assert!(max_pd > 0.0);
    }

    #[test]
    fn test_empty_summary() {
        let s = SummaryAccumulator::default();
        assert_eq!(s.max_field_v_m, 0.0);
        assert_eq!(s.max_percentage_of_limit, 0.0);
        assert_eq!(s.max_power_density_w_m2, 0.0);
        assert!(s.overall_compliant());
    }
}
