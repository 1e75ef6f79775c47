//! Antenna radiation patterns.
//!
//! Pattern file loading (Planet MSI/PLN cuts and CSV gain tables),
//! direction-dependent gain lookup with interpolation, and a shared
//! library so antennas of the same type reference one table.

pub mod error;
pub mod library;
pub mod pattern;
pub mod planet;
pub mod table;

// Re-export key types for convenience.
pub use error::{PatternError, PatternResult};
pub use library::PatternLibrary;
pub use pattern::RadiationPattern;
