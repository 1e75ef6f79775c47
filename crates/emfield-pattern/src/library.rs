//! Shared pattern library.
//!
//! Each distinct pattern file is loaded once per analysis and handed out
//! as an `Arc`, so every antenna of the same type reads the same table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use emfield_core::constants::ISOTROPIC_PATTERN;

use crate::error::PatternResult;
use crate::pattern::RadiationPattern;

/// Cache of loaded patterns keyed by resolved path.
#[derive(Debug)]
pub struct PatternLibrary {
    base_dir: PathBuf,
    isotropic: Arc<RadiationPattern>,
    loaded: HashMap<PathBuf, Arc<RadiationPattern>>,
}

impl PatternLibrary {
    /// Create a library resolving relative paths against `base_dir`
    /// (normally the directory holding the config file).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            isotropic: Arc::new(RadiationPattern::Isotropic),
            loaded: HashMap::new(),
        }
    }

    /// True for the pattern entries that select the isotropic pattern.
    pub fn is_isotropic_entry(entry: Option<&str>) -> bool {
        match entry.map(str::trim) {
            None => true,
            Some(s) => s.is_empty() || s.eq_ignore_ascii_case(ISOTROPIC_PATTERN),
        }
    }

    /// Resolve a config `pattern_file` to a path on disk.
    pub fn resolve_path(&self, entry: &str) -> PathBuf {
        let path = Path::new(entry.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Get the pattern for a config `pattern_file`, loading it on first use.
    pub fn get(&mut self, entry: Option<&str>) -> PatternResult<Arc<RadiationPattern>> {
        let entry = match entry {
            Some(s) if !Self::is_isotropic_entry(Some(s)) => s,
            _ => return Ok(Arc::clone(&self.isotropic)),
        };

        let path = self.resolve_path(entry);
        if let Some(pattern) = self.loaded.get(&path) {
            return Ok(Arc::clone(pattern));
        }

        debug!(path = %path.display(), "Loading radiation pattern");
        let pattern = Arc::new(RadiationPattern::load(&path)?);
        self.loaded.insert(path, Arc::clone(&pattern));
        Ok(pattern)
    }

    /// Number of distinct pattern files loaded so far.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}
