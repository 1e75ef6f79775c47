//! Writes `results.csv` and `report.json`.
//!
//! Both files go to `*.partial` siblings first and are renamed into place
//! only once both are complete. The report is renamed first and removed
//! again if the results table cannot follow it, so a failed run never
//! leaves a result that looks final.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use emfield_core::constants::{CSV_DECIMALS, REPORT_FILE_NAME, RESULTS_FILE_NAME};
use emfield_core::report::ComplianceReport;

use crate::error::{EngineError, EngineResult};
use crate::grid::EvaluationPoint;

pub const CSV_HEADER: [&str; 7] = [
    "x",
    "y",
    "z",
    "field_value_v_m",
    "limit_v_m",
    "percentage_of_limit",
    "status",
];

/// Paths of the written output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub results: PathBuf,
    pub report: PathBuf,
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn fixed(value: f64) -> String {
    format!("{value:.prec$}", prec = CSV_DECIMALS)
}

/// Write the per-point table to any writer. Values are rounded to six
/// decimals; `status` comes from the unrounded percentage.
pub fn write_results<W: Write>(writer: W, points: &[EvaluationPoint]) -> EngineResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for p in points {
        csv.write_record([
            fixed(p.position.x),
            fixed(p.position.y),
            fixed(p.position.z),
            fixed(p.exposure.field_v_m),
            fixed(p.exposure.limit_v_m),
            fixed(p.exposure.percentage_of_limit),
            p.exposure.status.as_str().to_string(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Serialize the report as pretty JSON with a trailing newline.
pub fn report_json(report: &ComplianceReport) -> EngineResult<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Write both output files into `dir`, creating it if needed.
pub fn write_outputs(
    dir: &Path,
    points: &[EvaluationPoint],
    report: &ComplianceReport,
) -> EngineResult<OutputPaths> {
    fs::create_dir_all(dir).map_err(EngineError::output(dir))?;

    let paths = OutputPaths {
        results: dir.join(RESULTS_FILE_NAME),
        report: dir.join(REPORT_FILE_NAME),
    };
    let results_tmp = partial_path(&paths.results);
    let report_tmp = partial_path(&paths.report);

    let committed = stage(&results_tmp, &report_tmp, points, report)
        .and_then(|()| commit(&results_tmp, &report_tmp, &paths));
    if let Err(e) = committed {
        let _ = fs::remove_file(&results_tmp);
        let _ = fs::remove_file(&report_tmp);
        return Err(e);
    }

    info!(
        results = %paths.results.display(),
        report = %paths.report.display(),
        rows = points.len(),
        "Outputs written"
    );
    Ok(paths)
}

fn stage(
    results_tmp: &Path,
    report_tmp: &Path,
    points: &[EvaluationPoint],
    report: &ComplianceReport,
) -> EngineResult<()> {
    debug!(path = %results_tmp.display(), "Writing results table");
    let file = fs::File::create(results_tmp).map_err(EngineError::output(results_tmp))?;
    write_results(std::io::BufWriter::new(file), points)?;

    debug!(path = %report_tmp.display(), "Writing report");
    fs::write(report_tmp, report_json(report)?).map_err(EngineError::output(report_tmp))?;
    Ok(())
}

fn commit(results_tmp: &Path, report_tmp: &Path, paths: &OutputPaths) -> EngineResult<()> {
    fs::rename(report_tmp, &paths.report).map_err(EngineError::output(&paths.report))?;
    if let Err(e) = fs::rename(results_tmp, &paths.results) {
        let _ = fs::remove_file(&paths.report);
        return Err(EngineError::output(&paths.results)(e));
    }
    Ok(())
}
