//! invseek - find documents by invoice tokens, copy matches, report the rest
//!
//! invseek reads search tokens from a CSV column, scans a directory tree
//! for documents whose filename or text content contains one of the tokens,
//! copies every match into a target directory under a token-prefixed name,
//! and writes a report of tokens that matched nothing.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backends;
mod cli;
mod core;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    cli::run(cli)
}
