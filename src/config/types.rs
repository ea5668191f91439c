use std::str::FromStr as _;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale::Locale;

/// A single problem found while validating the settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "catalogFiles.includePatterns[0]")
    pub field_path: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Errors raised while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more fields failed validation
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// Error when failing to read the settings file
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error when failing to parse the settings file
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// バリデーションエラーの一覧を番号付きで整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings controlling catalog discovery and validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Which files under the search root are catalogs.
    pub catalog_files: CatalogFilesConfig,

    /// Context holding the `LANGUAGE_NAME` entry used for language menus.
    /// If unset, every context is searched.
    pub language_name_context: Option<String>,

    /// Locales a release requires catalogs for.
    ///
    /// - `None`: whatever is discovered is accepted (default)
    /// - `Some([...])`: missing catalogs for these locales are errors
    ///
    /// Mutually exclusive with `optional_locales`.
    pub required_locales: Option<Vec<String>>,

    /// Locales whose incomplete translations are reported as hints
    /// instead of warnings.
    ///
    /// Mutually exclusive with `required_locales`.
    pub optional_locales: Option<Vec<String>>,

    /// Discovery parallelism.
    pub indexing: IndexingConfig,

    /// Which catalog checks are enabled.
    pub diagnostics: DiagnosticsConfig,
}

/// Glob patterns selecting catalog files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogFilesConfig {
    /// Patterns a catalog path must match.
    pub include_patterns: Vec<String>,
    /// Patterns that exclude a path even when included.
    pub exclude_patterns: Vec<String>,
}

impl Default for CatalogFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.ts".to_string()],
            exclude_patterns: vec!["**/build/**".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Parallel task count for catalog parsing.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

/// Toggles for the individual catalog checks.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    /// Report unfinished and empty translations.
    pub unfinished: bool,
    /// Report mnemonic accelerators lost in translation.
    pub accelerators: bool,
    /// Report `%1`/`%n` place markers lost in translation.
    pub place_markers: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { unfinished: true, accelerators: true, place_markers: true }
    }
}

impl CatalogSettings {
    /// # Errors
    /// - No include pattern is configured
    /// - Invalid glob pattern
    /// - Invalid locale name
    /// - Both `requiredLocales` and `optionalLocales` are set
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.catalog_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "catalogFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/i18n/**/*.ts\"]",
            ));
        }

        for (index, pattern) in self.catalog_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("catalogFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.catalog_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("catalogFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.required_locales.is_some() && self.optional_locales.is_some() {
            errors.push(ValidationError::new(
                "requiredLocales/optionalLocales",
                "Cannot specify both 'requiredLocales' and 'optionalLocales'. Please use only one",
            ));
        }

        validate_locales(&mut errors, "requiredLocales", self.required_locales.as_deref());
        validate_locales(&mut errors, "optionalLocales", self.optional_locales.as_deref());

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Parsed `optional_locales`, skipping entries that failed validation.
    #[must_use]
    pub fn parsed_optional_locales(&self) -> Vec<Locale> {
        parse_locales(self.optional_locales.as_deref())
    }

    /// Parsed `required_locales`, skipping entries that failed validation.
    #[must_use]
    pub fn parsed_required_locales(&self) -> Vec<Locale> {
        parse_locales(self.required_locales.as_deref())
    }
}

/// ロケール名のリストを検証する
fn validate_locales(
    errors: &mut Vec<ValidationError>,
    field: &str,
    locales: Option<&[String]>,
) {
    for (index, name) in locales.unwrap_or_default().iter().enumerate() {
        if Locale::from_str(name).is_err() {
            errors.push(ValidationError::new(
                format!("{field}[{index}]"),
                format!("Invalid locale name '{name}'. Example: \"de_DE\""),
            ));
        }
    }
}

/// ロケール名のリストをパースする（不正な項目は読み飛ばす）
fn parse_locales(locales: Option<&[String]>) -> Vec<Locale> {
    locales
        .unwrap_or_default()
        .iter()
        .filter_map(|name| Locale::from_str(name).ok())
        .collect()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            catalog_files: CatalogFilesConfig::default(),
            language_name_context: None,
            required_locales: None,
            optional_locales: None,
            indexing: IndexingConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}
