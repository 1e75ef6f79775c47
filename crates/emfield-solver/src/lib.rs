//! Field computation and compliance classification engine.
//!
//! Resolves a YAML configuration into an immutable `Analysis`, evaluates
//! the combined RF field over the evaluation grid, solves per-antenna
//! compliance boundaries and assembles the report. Headless and
//! deterministic: identical input gives bit-identical output.

pub mod aggregate;
pub mod analysis;
pub mod antenna;
pub mod boundary;
pub mod engine;
pub mod error;
pub mod grid;
pub mod orientation;
pub mod output;
pub mod propagation;
pub mod report;
pub mod standards;

pub use analysis::Analysis;
pub use engine::{AnalysisOutcome, ComplianceEngine};
pub use error::{EngineError, EngineResult};

#[cfg(test)]
mod tests;
