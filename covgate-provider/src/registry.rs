//! Registry of the data sources covgate exposes.

use std::sync::OnceLock;

use crate::source::{CodecovSettingsSource, DataSource};

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for the registered data sources.
static SOURCES: OnceLock<Vec<Box<dyn DataSource>>> = OnceLock::new();

fn init_sources() -> Vec<Box<dyn DataSource>> {
    vec![Box::new(CodecovSettingsSource::new())]
}

// ============================================================================
// Source Registry
// ============================================================================

/// Global registry of data sources.
///
/// Initialized lazily on first access; thread safe.
pub struct SourceRegistry;

impl SourceRegistry {
    /// Returns all registered data sources.
    pub fn all() -> &'static [Box<dyn DataSource>] {
        SOURCES.get_or_init(init_sources)
    }

    /// Looks up a data source by schema name.
    pub fn get(name: &str) -> Option<&'static dyn DataSource> {
        Self::all()
            .iter()
            .find(|source| source.schema().name == name)
            .map(|boxed| boxed.as_ref())
    }

    /// Returns the names of all registered sources.
    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(|source| source.schema().name).collect()
    }

    /// Returns the number of registered sources.
    pub fn count() -> usize {
        Self::all().len()
    }
}
