//! CLI module - argument definitions and the run sequence

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::backends::{scan, sink};
use crate::core::extract::Utf8Extractor;
use crate::core::tokens::{TokenSet, TOKEN_COLUMN};

/// Extension of the documents considered by the scan.
const TARGET_EXTENSION: &str = "pdf";

/// invseek - find documents by invoice tokens, copy matches, report the rest.
#[derive(Parser, Debug)]
#[command(name = "invseek")]
#[command(
    author,
    version,
    about,
    long_about = r#"invseek reads search tokens from the "Invoice #" column of a CSV file,
recursively scans ROOT for .pdf documents whose filename or text content
contains one of the tokens, copies every match into TARGET as
{token}_{original name}, and writes tokens that matched nothing to REPORT,
one per line.

Filename matching is substring containment; content matching is whole-word.
Existing copies are never overwritten, so re-runs are idempotent.

Example:
    invseek invoices.csv /archive/2025 ./matched unmatched.txt 8
"#
)]
pub struct Cli {
    /// CSV file containing the token column.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Root directory to scan recursively.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Directory receiving copies of matched files (created if absent).
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Output path for the unmatched-token report (overwritten).
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    /// Number of concurrent scan workers.
    #[arg(value_name = "WORKERS", value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: u64,

    /// Upper-case the token prefix of copied file names.
    #[arg(long)]
    pub upper: bool,
}

/// Run the tool with parsed arguments.
///
/// Fatal errors (unreadable CSV, missing token column) abort before any
/// target-directory output or report is written.
pub fn run(cli: Cli) -> Result<()> {
    let tokens = TokenSet::from_csv(&cli.csv, TOKEN_COLUMN)?;
    info!("loaded {} search tokens from {}", tokens.len(), cli.csv.display());

    let extractor = Utf8Extractor::default();
    let outcome = scan::scan(
        &cli.root,
        &tokens,
        &extractor,
        cli.workers as usize,
        TARGET_EXTENSION,
    )?;
    info!(
        "scanned {} files: {} tokens matched, {} extraction failures",
        outcome.files_scanned,
        outcome.matches.len(),
        outcome.extract_failures
    );

    let stats = sink::copy_matches(&outcome.matches, &cli.target, cli.upper)?;
    let unmatched = sink::write_unmatched(&tokens, &outcome.matches, &cli.report)?;
    info!(
        "copied {} files ({} already present), {} tokens unmatched",
        stats.copied, stats.skipped, unmatched
    );

    Ok(())
}
