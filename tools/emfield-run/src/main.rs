//! emfield-run: evaluate an RF-EMF exposure configuration.
//!
//! Usage:
//!   emfield-run site.yaml --output results/
//!   emfield-run site.yaml --threads 4 --verbose
//!
//! Exit codes: 0 on success, 2 for configuration or pattern errors
//! (nothing written), 1 for any other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};

use emfield_core::report::ComplianceReport;
use emfield_solver::engine::AnalysisOutcome;
use emfield_solver::output::OutputPaths;
use emfield_solver::{ComplianceEngine, EngineError};

#[derive(Parser, Debug)]
#[command(name = "emfield-run")]
#[command(about = "RF-EMF exposure compliance engine", long_about = None)]
struct Cli {
    /// YAML analysis configuration
    config: PathBuf,

    /// Directory for results.csv and report.json
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Worker threads for grid evaluation (default: all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Log per-stage detail
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok((outcome, paths)) => {
            print_summary(&outcome.report, &paths);
            ExitCode::SUCCESS
        }
        Err(RunError::Engine(e)) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
        Err(RunError::ThreadPool(e)) => {
            error!("{e}");
            eprintln!("Error: cannot start worker pool: {e}");
            ExitCode::from(1)
        }
    }
}

enum RunError {
    Engine(EngineError),
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl From<EngineError> for RunError {
    fn from(e: EngineError) -> Self {
        RunError::Engine(e)
    }
}

fn run(cli: &Cli) -> Result<(AnalysisOutcome, OutputPaths), RunError> {
    info!(config = %cli.config.display(), "Loading configuration");
    let engine = ComplianceEngine::from_path(&cli.config)?;

    let outcome = match cli.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(RunError::ThreadPool)?;
            info!(threads = n, "Using dedicated worker pool");
            pool.install(|| engine.run())
        }
        None => engine.run(),
    };

    let paths = outcome.write(&cli.output)?;
    Ok((outcome, paths))
}

fn print_summary(report: &ComplianceReport, paths: &OutputPaths) {
    let s = &report.summary;
    let verdict = if s.overall_compliant { "COMPLIANT" } else { "NON-COMPLIANT" };

    println!("{}", report.metadata.simulation_name);
    println!(
        "  Standard:        {} ({})",
        report.metadata.standard, report.metadata.category
    );
    println!(
        "  Grid:            {} x {} = {} points",
        report.grid.num_x, report.grid.num_y, s.total_points
    );
    println!("  Compliant:       {}", s.compliant_points);
    println!("  Marginal:        {}", s.marginal_points);
    println!("  Non-compliant:   {}", s.non_compliant_points);
    println!("  Max field:       {:.3} V/m", s.max_field_value_v_m);
    println!("  Max exposure:    {:.2}% of limit", s.max_percentage_of_limit);
    println!("  Max power dens.: {:.4} W/m²", s.max_power_density_w_m2);
    println!("  Overall:         {verdict}");

    if !report.compliance_boundaries.is_empty() {
        println!("  Compliance boundaries:");
        for (id, distance) in &report.compliance_boundaries {
            let flag = if s.unreachable_boundaries.contains(id) {
                " (beyond search range)"
            } else {
                ""
            };
            println!("    {id:<16} {distance:.2} m{flag}");
        }
    }

    println!("  Results:         {}", paths.results.display());
    println!("  Report:          {}", paths.report.display());
}
