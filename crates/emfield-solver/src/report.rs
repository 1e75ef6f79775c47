//! Report assembly.

use std::collections::BTreeMap;

use emfield_core::report::{ComplianceReport, ReportMetadata, ReportSummary};

use crate::analysis::Analysis;
use crate::boundary::BoundaryResult;
use crate::grid::SummaryAccumulator;

/// Build the final report from the grid summary and boundary results.
pub fn assemble(
    analysis: &Analysis,
    summary: &SummaryAccumulator,
    boundaries: &BTreeMap<String, BoundaryResult>,
) -> ComplianceReport {
    let unreachable_boundaries = boundaries
        .iter()
        .filter(|(_, b)| b.is_unreachable())
        .map(|(id, _)| id.clone())
        .collect();

    ComplianceReport {
        metadata: ReportMetadata {
            standard: analysis.standard.id.to_string(),
            category: analysis.standard.category.to_string(),
            simulation_name: analysis.name.clone(),
        },
        grid: analysis.grid.section(),
        summary: ReportSummary {
            total_points: summary.total_points,
            compliant_points: summary.compliant_points,
            marginal_points: summary.marginal_points,
            non_compliant_points: summary.non_compliant_points,
            max_field_value_v_m: summary.max_field_v_m,
            max_percentage_of_limit: summary.max_percentage_of_limit,
            max_power_density_w_m2: summary.max_power_density_w_m2,
            overall_compliant: summary.overall_compliant(),
            unreachable_boundaries,
        },
        antennas: analysis.antennas.iter().map(|a| a.echo()).collect(),
        compliance_boundaries: boundaries
            .iter()
            .map(|(id, b)| (id.clone(), b.distance_m))
            .collect(),
    }
}
