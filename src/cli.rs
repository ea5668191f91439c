//! コマンドラインフロントエンド
//!
//! `check` / `languages` / `query` / `fmt` の各サブコマンドを提供します。
//! 人向けの出力はここだけが担い、ライブラリ層は一切出力しません。
#![allow(clippy::print_stdout)]

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::diagnostics::{
    self,
    Severity,
};
use crate::indexer::{
    self,
    DiscoveredCatalog,
    IndexerError,
};
use crate::translator;
use crate::ts;

/// Command line interface of the catalog toolkit.
#[derive(Parser, Debug)]
#[command(name = "ts-catalog")]
#[command(version)]
#[command(about = "Qt Linguist translation catalog (.ts) toolkit")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover catalogs under a directory and validate them
    Check {
        /// Directory to search for catalogs
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List discovered catalog languages with their display names
    Languages {
        /// Directory to search for catalogs
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Look up one translation, falling back to the source text
    Query {
        /// Catalog file to query
        file: PathBuf,

        /// Context name (e.g. "GUI::MainMenuBar")
        context: String,

        /// Source text (e.g. "&Game")
        source: String,

        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Re-serialize a catalog in canonical form
    Fmt {
        /// Catalog file to format
        file: PathBuf,

        /// Rewrite the file instead of printing to stdout
        #[arg(long)]
        write: bool,
    },
}

/// Errors surfaced to the user by the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// Settings could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Discovery failed
    #[error(transparent)]
    Indexer(#[from] IndexerError),
    /// A catalog could not be read
    #[error(transparent)]
    Read(#[from] ts::ReadError),
    /// A catalog could not be written
    #[error(transparent)]
    Write(#[from] ts::WriteError),
}

/// Runs a parsed command and reports the exit code.
///
/// # Errors
/// [`CliError`] when settings, discovery or catalog I/O fail; findings
/// themselves are reported through the exit code, not as errors.
pub async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Check { path } => check(path).await,
        Command::Languages { path } => languages(path).await,
        Command::Query { file, context, source, comment } => {
            query(&file, &context, &source, comment.as_deref())
        }
        Command::Fmt { file, write } => fmt(&file, write),
    }
}

/// `check` サブコマンド
async fn check(path: PathBuf) -> Result<ExitCode, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(path.clone()))?;
    let settings = config_manager.get_settings();

    let discovered = indexer::index_directory(&path, settings).await?;

    let mut warnings = 0usize;
    let mut errors = 0usize;

    for entry in &discovered {
        let findings = diagnostics::check_catalog(&entry.catalog, settings);
        if findings.is_empty() {
            continue;
        }

        println!("{}:", entry.path.display());
        for finding in findings {
            match finding.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Hint => {}
            }
            match &finding.location {
                Some(location) => println!(
                    "  {}: {} [{} @ {}]",
                    finding.severity, finding.message, finding.context, location
                ),
                None => {
                    println!("  {}: {} [{}]", finding.severity, finding.message, finding.context);
                }
            }
        }
    }

    let found_locales: Vec<_> =
        discovered.iter().filter_map(|entry| entry.locale.clone()).collect();
    for locale in diagnostics::missing_locales(&found_locales, settings) {
        errors += 1;
        println!("error: no catalog found for required locale '{locale}'");
    }

    println!(
        "checked {} catalog(s): {} error(s), {} warning(s)",
        discovered.len(),
        errors,
        warnings
    );

    if errors > 0 { Ok(ExitCode::FAILURE) } else { Ok(ExitCode::SUCCESS) }
}

/// `languages` サブコマンド
async fn languages(path: PathBuf) -> Result<ExitCode, CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(path.clone()))?;
    let settings = config_manager.get_settings();

    let discovered: Vec<DiscoveredCatalog> = indexer::index_directory(&path, settings).await?;
    let entries =
        translator::language_entries(&discovered, settings.language_name_context.as_deref());

    for entry in entries {
        let locale = entry.locale.map_or_else(|| "?".to_string(), |locale| locale.to_string());
        let name = entry.name.unwrap_or_else(|| "(no language name)".to_string());
        println!("{locale}\t{name}\t{}", entry.path.display());
    }

    Ok(ExitCode::SUCCESS)
}

/// `query` サブコマンド
fn query(
    file: &Path,
    context: &str,
    source: &str,
    comment: Option<&str>,
) -> Result<ExitCode, CliError> {
    let catalog = ts::parse_file(file)?;

    let mut translator = translator::Translator::new();
    translator.install(catalog);

    // 見つからなければソース文字列がそのまま表示される
    println!("{}", translator.translate_with_comment(context, source, comment));

    Ok(ExitCode::SUCCESS)
}

/// `fmt` サブコマンド
fn fmt(file: &Path, write: bool) -> Result<ExitCode, CliError> {
    let catalog = ts::parse_file(file)?;

    if write {
        ts::write_file(&catalog, file)?;
    } else {
        print!("{}", ts::to_xml(&catalog));
    }

    Ok(ExitCode::SUCCESS)
}
