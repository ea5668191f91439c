//! Indexer type definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::locale::Locale;

/// A catalog found and parsed during discovery.
#[derive(Debug, Clone)]
pub struct DiscoveredCatalog {
    /// Path the catalog was loaded from.
    pub path: PathBuf,
    /// Locale, from the `language` attribute or the file name.
    pub locale: Option<Locale>,
    /// The parsed catalog.
    pub catalog: Catalog,
}

/// Errors raised while discovering catalogs.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Error when the configured patterns cannot be compiled
    #[error(transparent)]
    Matcher(#[from] crate::config::MatcherError),
}
