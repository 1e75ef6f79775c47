//! End-to-end tests for the compliance engine: grid, aggregation,
//! boundaries, report and output files.

use std::path::Path;

use proptest::prelude::*;

use emfield_core::enums::ComplianceStatus;
use emfield_core::error::ConfigError;
use emfield_core::types::Position;

use crate::aggregate;
use crate::analysis::Analysis;
use crate::boundary::{self, BoundaryKind};
use crate::engine::{ComplianceEngine, Execution};
use crate::error::EngineError;
use crate::orientation;

fn config(antennas: &str) -> String {
    format!(
        r#"
name: Test Site
grid:
  x_min: -30
  x_max: 30
  y_min: -20
  y_max: 20
  z_level: 1.5
  resolution: 0.5
compliance:
  standard: ICNIRP_2020
  category: general_public
antennas:
{antennas}"#
    )
}

const ROOFTOP: &str = r#"
  - id: gsm900
    frequency_mhz: 900
    power_eirp_watts: 1500
    position: { x: 0, y: 0, z: 6 }
    orientation: { azimuth_deg: 30, tilt_deg: -8 }
  - id: nr3500
    frequency_mhz: 3500
    power_eirp_watts: 4000
    position: { x: 2, y: -1, z: 5 }
    orientation: { azimuth_deg: 210, tilt_deg: -4 }
  - id: fm100
    frequency_mhz: 100
    power_eirp_watts: 300
    position: { x: -10, y: 5, z: 12 }
"#;

fn engine(antennas: &str) -> ComplianceEngine {
    ComplianceEngine::new(Analysis::from_yaml_str(&config(antennas), Path::new(".")).unwrap())
}

fn isotropic(id: &str, power: f64, x: f64, y: f64, z: f64, enabled: bool) -> String {
    format!(
        "  - id: {id}\n    frequency_mhz: 100\n    power_eirp_watts: {power}\n    \
         position: {{ x: {x}, y: {y}, z: {z} }}\n    enabled: {enabled}\n"
    )
}

// ---- Determinism ----

#[test]
fn test_parallel_and_sequential_agree() {
    let e = engine(ROOFTOP);
    let par = e.run_with(Execution::Parallel);
    let seq = e.run_with(Execution::Sequential);
    assert_eq!(par, seq);
}

#[test]
fn test_reruns_are_byte_identical() {
    let e = engine(ROOFTOP);
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let a = e.run().write(dir_a.path()).unwrap();
    let b = engine(ROOFTOP).run().write(dir_b.path()).unwrap();

    for (x, y) in [(&a.results, &b.results), (&a.report, &b.report)] {
        let x = std::fs::read(x).unwrap();
        let y = std::fs::read(y).unwrap();
        assert!(!x.is_empty());
        assert_eq!(x, y);
    }
}

// ---- Classification ----

#[test]
fn test_every_point_status_matches_percentage() {
    let outcome = engine(ROOFTOP).run();
    assert_eq!(outcome.points.len(), 121 * 81);
    for p in &outcome.points {
        let pct = p.exposure.percentage_of_limit;
        let expected = if pct < 80.0 {
            ComplianceStatus::Compliant
        } else if pct <= 100.0 {
            ComplianceStatus::Marginal
        } else {
            ComplianceStatus::NonCompliant
        };
        assert_eq!(p.exposure.status, expected, "at {:?} ({pct}%)", p.position);
    }
}

#[test]
fn test_summary_matches_points() {
    let outcome = engine(ROOFTOP).run();
    let s = &outcome.report.summary;
    let count = |status| outcome.points.iter().filter(|p| p.exposure.status == status).count();
    assert_eq!(s.total_points, outcome.points.len());
    assert_eq!(s.compliant_points, count(ComplianceStatus::Compliant));
    assert_eq!(s.marginal_points, count(ComplianceStatus::Marginal));
    assert_eq!(s.non_compliant_points, count(ComplianceStatus::NonCompliant));
    assert_eq!(s.overall_compliant, s.non_compliant_points == 0);
    let max_field = outcome.points.iter().map(|p| p.exposure.field_v_m).fold(0.0, f64::max);
    assert_eq!(s.max_field_value_v_m, max_field);
    let max_pd = outcome.points.iter().map(|p| p.exposure.power_density_w_m2).fold(0.0, f64::max);
    assert_eq!(s.max_power_density_w_m2, max_pd);
}

proptest! {
    #[test]
    fn prop_status_thresholds(pct in 0.0f64..1000.0) {
        let status = ComplianceStatus::from_percentage(pct);
        match status {
            ComplianceStatus::Compliant => prop_assert!(pct < 80.0),
            ComplianceStatus::Marginal => prop_assert!((80.0..=100.0).contains(&pct)),
            ComplianceStatus::NonCompliant => prop_assert!(pct > 100.0),
        }
    }

    #[test]
    fn prop_isotropic_inverse_distance(
        power in 0.1f64..10_000.0,
        d in 0.5f64..500.0
    ) {
        let yaml = config(&isotropic("a", power, 0.0, 0.0, 0.0, true));
        let analysis = Analysis::from_yaml_str(&yaml, Path::new(".")).unwrap();
        let near = aggregate::evaluate(&Position::new(d, 0.0, 0.0), &analysis.antennas);
        let far = aggregate::evaluate(&Position::new(2.0 * d, 0.0, 0.0), &analysis.antennas);

        let expected = (30.0 * power).sqrt() / d;
        prop_assert!((near.field_v_m - expected).abs() <= 1e-9 * expected);
        // 28 V/m flat in the 30-400 MHz band.
        let pct = near.percentage_of_limit;
        prop_assert!((pct - 100.0 * expected / 28.0).abs() <= 1e-9 * pct);

        let ratio_sq = (near.percentage_of_limit / far.percentage_of_limit).powi(2);
        prop_assert!((ratio_sq - 4.0).abs() < 1e-9);
    }
}

// ---- Aggregation ----

#[test]
fn test_all_disabled_is_compliant() {
    let antennas = [
        isotropic("a", 1e5, 0.0, 0.0, 2.0, false),
        isotropic("b", 1e5, 5.0, 0.0, 2.0, false),
    ]
    .concat();
    let outcome = engine(&antennas).run();
    let all_zero = outcome.points.iter().all(|p| {
        p.exposure.percentage_of_limit == 0.0 && p.exposure.status == ComplianceStatus::Compliant
    });
    assert!(all_zero);
    assert!(outcome.report.summary.overall_compliant);
    assert_eq!(outcome.report.summary.max_field_value_v_m, 0.0);
    // Disabled antennas are still echoed and solved.
    assert_eq!(outcome.report.antennas.len(), 2);
    assert_eq!(outcome.report.compliance_boundaries.len(), 2);
}

#[test]
fn test_colocated_pair_is_sqrt2() {
    let single = engine(&isotropic("a", 250.0, 0.0, 0.0, 10.0, true)).run();
    let pair = engine(
        &[
            isotropic("a", 250.0, 0.0, 0.0, 10.0, true),
            isotropic("b", 250.0, 0.0, 0.0, 10.0, true),
        ]
        .concat(),
    )
    .run();
    for (s, p) in single.points.iter().zip(&pair.points) {
        let ratio = p.exposure.percentage_of_limit / s.exposure.percentage_of_limit;
        assert!((ratio - 2f64.sqrt()).abs() < 1e-12);
    }
}

// ---- Boundaries ----

#[test]
fn test_boundary_feedback() {
    let e = engine(ROOFTOP);
    let outcome = e.run();
    for antenna in &e.analysis().antennas {
        let result = outcome.boundaries[&antenna.id];
        if result.kind != BoundaryKind::Within {
            continue;
        }
        let d = result.distance_m;
        let pct = boundary::peak_percentage(antenna, d);
        assert!(pct < 100.0, "{}: {pct}% at {d} m", antenna.id);
        assert!(
            100.0 - pct <= 100.0 * 0.01 / d + 1e-9,
            "{}: {pct}% at {d} m is not near the limit",
            antenna.id
        );
        assert_eq!(outcome.report.compliance_boundaries[&antenna.id], d);
    }
}

/// Panel with 8° electrical downtilt: 3 dB per 10° off azimuth, 6 dB per
/// 10° off the 8° depression.
fn downtilted_msi() -> String {
    let mut text = String::from("NAME Downtilt Panel\nFREQUENCY 900\nGAIN 16 dBi\n");
    text.push_str("HORIZONTAL 360\n");
    for angle in 0..360 {
        let off = angle.min(360 - angle) as f64;
        text.push_str(&format!("{angle} {}\n", off * 0.3));
    }
    text.push_str("VERTICAL 360\n");
    for angle in 0..360 {
        let off = (angle as f64 - 8.0).rem_euclid(360.0);
        text.push_str(&format!("{angle} {}\n", off.min(360.0 - off) * 0.6));
    }
    text
}

/// Gain table peaking at local azimuth 90°, 20° below the boresight plane.
fn offset_peak_csv() -> String {
    let mut text = String::from("azimuth,elevation,gain_dbi\n");
    for (az, az_db) in [(0.0, -6.0), (90.0, 0.0), (180.0, -20.0), (270.0, -12.0)] {
        for (el, el_db) in [(-90.0, -25.0), (-20.0, 0.0), (0.0, -4.0), (30.0, -10.0), (90.0, -25.0)]
        {
            text.push_str(&format!("{az},{el},{}\n", 18.0 + az_db + el_db));
        }
    }
    text
}

#[test]
fn test_boundary_feedback_directional_patterns() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("downtilt.msi"), downtilted_msi()).unwrap();
    std::fs::write(dir.path().join("offset.csv"), offset_peak_csv()).unwrap();
    let antennas = r#"
  - id: panel
    pattern_file: downtilt.msi
    frequency_mhz: 900
    power_eirp_watts: 2000
    position: { x: 0, y: 0, z: 30 }
    orientation: { azimuth_deg: 60, tilt_deg: -4 }
  - id: table
    pattern_file: offset.csv
    frequency_mhz: 1800
    power_eirp_watts: 1200
    position: { x: 5, y: 5, z: 25 }
    orientation: { azimuth_deg: 200, tilt_deg: 6 }
"#;
    let analysis = Analysis::from_yaml_str(&config(antennas), dir.path()).unwrap();
    let e = ComplianceEngine::new(analysis);
    let outcome = e.run();

    // Known peak of each pattern in its local frame.
    let peaks = [(0.0, -8.0), (90.0, -20.0)];
    for (antenna, (az, el)) in e.analysis().antennas.iter().zip(peaks) {
        let result = outcome.boundaries[&antenna.id];
        assert_eq!(result.kind, BoundaryKind::Within, "{}", antenna.id);
        let d = result.distance_m;

        let toward = orientation::world_direction(&antenna.orientation, az, el);
        let point = antenna.position.offset(toward, d);
        let pct = 100.0 * antenna.field_at(&point) / antenna.limit_v_m;
        assert!(pct <= 100.0 + 1e-9, "{}: {pct}% along the peak at {d} m", antenna.id);
        assert!(
            100.0 - pct <= 100.0 * 0.01 / d + 1e-6,
            "{}: {pct}% at {d} m is not near the limit",
            antenna.id
        );

        // The mechanical boresight is off the peak for both patterns.
        let boresight = antenna.position.offset(orientation::boresight(&antenna.orientation), d);
        assert!(antenna.field_at(&boresight) < antenna.field_at(&point), "{}", antenna.id);
    }
}

#[test]
fn test_unreachable_boundary_flagged() {
    let antennas = [
        isotropic("big", 1e12, 0.0, 0.0, 50.0, true),
        isotropic("small", 10.0, 0.0, 0.0, 50.0, true),
    ]
    .concat();
    let report = engine(&antennas).run().report;
    assert_eq!(report.summary.unreachable_boundaries, vec!["big".to_string()]);
    assert_eq!(report.compliance_boundaries["big"], 10_000.0);
}

// ---- Report ----

#[test]
fn test_report_metadata_and_grid() {
    let report = engine(ROOFTOP).run().report;
    assert_eq!(report.metadata.standard, "ICNIRP_2020");
    assert_eq!(report.metadata.category, "general_public");
    assert_eq!(report.metadata.simulation_name, "Test Site");
    assert_eq!(report.grid.num_x, 121);
    assert_eq!(report.grid.num_y, 81);
    assert_eq!(report.grid.total_points, 121 * 81);
    let ids: Vec<&str> = report.antennas.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["gsm900", "nr3500", "fm100"]);
    assert_eq!(report.antennas[2].limit_v_m, 28.0);
}

#[test]
fn test_report_json_keys() {
    let report = engine(ROOFTOP).run().report;
    let json = serde_json::to_value(&report).unwrap();
    for key in ["metadata", "grid", "summary", "antennas", "compliance_boundaries"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    let summary = &json["summary"];
    for key in [
        "total_points",
        "compliant_points",
        "marginal_points",
        "non_compliant_points",
        "max_field_value_v_m",
        "max_percentage_of_limit",
        "max_power_density_w_m2",
        "overall_compliant",
        "unreachable_boundaries",
    ] {
        assert!(summary.get(key).is_some(), "missing summary.{key}");
    }
}

// ---- Output ----

#[test]
fn test_outputs_written_without_partials() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("out");
    let paths = engine(ROOFTOP).run().write(&out).unwrap();
    assert!(paths.results.exists());
    assert!(paths.report.exists());

    let names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|n| !n.ends_with(".partial")), "{names:?}");

    let csv = std::fs::read_to_string(&paths.results).unwrap();
    assert_eq!(csv.lines().count(), 1 + 121 * 81);
}

// ---- Configuration errors ----

#[test]
fn test_config_errors_exit_code_2() {
    let bad = [
        config(ROOFTOP).replace("ICNIRP_2020", "XYZ"),
        config(ROOFTOP).replace("resolution: 0.5", "resolution: -1"),
        config(ROOFTOP).replace("frequency_mhz: 100\n", "frequency_mhz: 0.01\n"),
        config(ROOFTOP).replace("x_max: 30", "x_max: [1, 2]"),
        "grid: {".to_string(),
    ];
    for yaml in bad {
        let err = Analysis::from_yaml_str(&yaml, Path::new(".")).unwrap_err();
        assert_eq!(err.exit_code(), 2, "{err}");
        assert!(matches!(err, EngineError::Config(_)));
    }
}

#[test]
fn test_unsupported_frequency_root_cause() {
    let yaml = config(ROOFTOP).replace("frequency_mhz: 3500", "frequency_mhz: 300001");
    match Analysis::from_yaml_str(&yaml, Path::new(".")) {
        Err(EngineError::Config(e)) => {
            assert!(matches!(e.root(), ConfigError::UnsupportedFrequency { .. }), "{e}");
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_io_error_exit_code_1() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let err = engine(ROOFTOP).run().write(&blocker.join("out")).unwrap_err();
    assert!(matches!(err, EngineError::Output { .. }));
    assert_eq!(err.exit_code(), 1);
}
