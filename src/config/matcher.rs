//! File pattern matcher for catalog files.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::CatalogSettings;

/// Errors raised while building a matcher from settings.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// An include pattern is not a valid glob
    #[error("Invalid catalog include pattern '{pattern}': {source}")]
    InvalidIncludePattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: globset::Error,
    },

    /// An exclude pattern is not a valid glob
    #[error("Invalid catalog exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: globset::Error,
    },

    /// The combined pattern set could not be built
    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches catalog files against the configured glob patterns.
#[derive(Debug, Clone)]
pub struct CatalogMatcher {
    /// Search root the relative patterns apply under.
    root: PathBuf,
    /// Compiled include patterns.
    include_set: GlobSet,
    /// Compiled exclude patterns.
    exclude_set: GlobSet,
}

impl CatalogMatcher {
    /// Creates a new matcher from settings.
    ///
    /// # Errors
    /// [`MatcherError`] when a configured pattern is not a valid glob.
    pub fn new(root: PathBuf, settings: &CatalogSettings) -> Result<Self, MatcherError> {
        let include_set =
            Self::build_glob_set(&settings.catalog_files.include_patterns, |pattern, source| {
                MatcherError::InvalidIncludePattern { pattern, source }
            })?;

        let exclude_set =
            Self::build_glob_set(&settings.catalog_files.exclude_patterns, |pattern, source| {
                MatcherError::InvalidExcludePattern { pattern, source }
            })?;

        Ok(Self { root, include_set, exclude_set })
    }

    /// パターン一覧から `GlobSet` を構築する
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Search root the matcher was built for.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if the path matches the include patterns but not the
    /// exclude patterns.
    ///
    /// The path must be absolute and under the search root.
    #[must_use]
    pub fn is_catalog_file(&self, absolute_path: &Path) -> bool {
        let Ok(relative_path) = absolute_path.strip_prefix(&self.root) else {
            return false;
        };

        self.is_catalog_file_relative(relative_path)
    }

    /// Returns true if the path matches the include patterns but not the
    /// exclude patterns.
    ///
    /// The path must be relative to the search root.
    #[must_use]
    pub fn is_catalog_file_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}
