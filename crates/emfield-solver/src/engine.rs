//! Compliance engine: the pipeline from resolved analysis to report.
//!
//! `ComplianceEngine` owns an immutable `Analysis` and runs the grid
//! evaluation, the boundary searches and report assembly. Completely
//! headless (no I/O until `AnalysisOutcome::write`), so runs can be
//! compared directly in tests.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use emfield_core::report::ComplianceReport;

use crate::analysis::Analysis;
use crate::boundary::{self, BoundaryResult};
use crate::error::EngineResult;
use crate::grid::{self, EvaluationPoint, GridResults};
use crate::output::{self, OutputPaths};
use crate::report;

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub points: Vec<EvaluationPoint>,
    pub boundaries: BTreeMap<String, BoundaryResult>,
    pub report: ComplianceReport,
}

impl AnalysisOutcome {
    /// Write `results.csv` and `report.json` into `dir`.
    pub fn write(&self, dir: &Path) -> EngineResult<OutputPaths> {
        output::write_outputs(dir, &self.points, &self.report)
    }
}

/// Execution mode for the grid pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// Rows spread over the current rayon pool.
    #[default]
    Parallel,
    /// Single thread, same output.
    Sequential,
}

pub struct ComplianceEngine {
    analysis: Analysis,
}

impl ComplianceEngine {
    pub fn new(analysis: Analysis) -> Self {
        Self { analysis }
    }

    /// Load and resolve a config file.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        Ok(Self::new(Analysis::load(path)?))
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Run the full pipeline on the rayon pool.
    pub fn run(&self) -> AnalysisOutcome {
        self.run_with(Execution::Parallel)
    }

    pub fn run_with(&self, execution: Execution) -> AnalysisOutcome {
        let analysis = &self.analysis;

        // 1. Grid evaluation
        let GridResults { points, summary } = match execution {
            Execution::Parallel => grid::run(&analysis.grid, &analysis.antennas),
            Execution::Sequential => grid::run_sequential(&analysis.grid, &analysis.antennas),
        };
        info!(
            enabled_antennas = analysis.enabled_count(),
            points = summary.total_points,
            compliant = summary.compliant_points,
            marginal = summary.marginal_points,
            non_compliant = summary.non_compliant_points,
            max_percentage = summary.max_percentage_of_limit,
            max_power_density_w_m2 = summary.max_power_density_w_m2,
            "Grid evaluated"
        );

        // 2. Compliance boundaries
        let boundaries = boundary::solve_all(&analysis.antennas);
        info!(antennas = boundaries.len(), "Boundaries solved");

        // 3. Report
        let report = report::assemble(analysis, &summary, &boundaries);

        AnalysisOutcome {
            points,
            boundaries,
            report,
        }
    }
}
