//! Core types and definitions for the EMF exposure engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, enums, constants, the YAML input schema, the report schema
//! and the configuration error taxonomy. It performs no field computation.

pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod report;
pub mod types;

#[cfg(test)]
mod tests;
