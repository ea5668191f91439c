//! Entry point for the catalog toolkit CLI.
#![allow(clippy::print_stderr)]

use std::process::ExitCode;

use clap::Parser as _;
use ts_catalog::cli::{
    self,
    Cli,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
