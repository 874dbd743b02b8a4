//! Scan backend - concurrent walk, extract and match
//!
//! The coordinator enumerates candidate files under a root, fans the
//! per-file work (extract text, match tokens) out to a bounded pool of
//! worker threads, and funnels every per-file result through a channel
//! into a single aggregator that owns the final map. A failing file is
//! logged and contributes no matches; it never aborts the scan.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::core::extract::TextExtractor;
use crate::core::matcher::Matcher;
use crate::core::tokens::TokenSet;

/// Aggregated token -> matched file paths.
///
/// Ordered containers, so iteration (and with it the copy pass and the
/// unmatched report) is deterministic regardless of worker completion
/// order.
pub type MatchMap = BTreeMap<String, BTreeSet<PathBuf>>;

/// What one scan produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub matches: MatchMap,
    pub files_scanned: usize,
    pub extract_failures: usize,
}

/// Result of processing a single candidate file. Owned by one worker
/// until it is handed to the aggregator.
struct FileMatches {
    path: PathBuf,
    tokens: BTreeSet<usize>,
    extract_failed: bool,
}

/// Scan `root` for files with `extension` whose name or text matches any
/// token, using `workers` concurrent extraction threads.
///
/// At most `workers` files are being extracted and matched at any
/// instant. The token map is only ever touched by the aggregator, so the
/// merge needs no locking and the file-set union is immune to completion
/// order.
pub fn scan(
    root: &Path,
    tokens: &TokenSet,
    extractor: &dyn TextExtractor,
    workers: usize,
    extension: &str,
) -> Result<ScanOutcome> {
    let matcher = Matcher::new(tokens).context("failed to compile token patterns")?;

    let candidates = enumerate(root, extension);
    let files_scanned = candidates.len();
    debug!("found {} candidate files under {}", files_scanned, root.display());

    // Queue every candidate up front; dispatch order does not affect the
    // merged result, only which worker gets which file.
    let (task_tx, task_rx) = mpsc::channel::<PathBuf>();
    for path in candidates {
        let _ = task_tx.send(path);
    }
    drop(task_tx);
    let task_rx = Mutex::new(task_rx);

    let (result_tx, result_rx) = mpsc::channel::<FileMatches>();

    let mut matches = MatchMap::new();
    let mut extract_failures = 0usize;

    thread::scope(|s| {
        for _ in 0..workers.max(1) {
            let result_tx = result_tx.clone();
            let matcher = &matcher;
            let task_rx = &task_rx;
            s.spawn(move || loop {
                let task = match task_rx.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => break,
                };
                let Ok(path) = task else { break };
                if result_tx.send(process_file(&path, matcher, extractor)).is_err() {
                    break;
                }
            });
        }
        // The last sender clone must go, or the drain below never ends.
        drop(result_tx);

        for file in result_rx.iter() {
            if file.extract_failed {
                extract_failures += 1;
            }
            for index in file.tokens {
                matches
                    .entry(matcher.token(index).to_string())
                    .or_default()
                    .insert(file.path.clone());
            }
        }
    });

    Ok(ScanOutcome {
        matches,
        files_scanned,
        extract_failures,
    })
}

/// Recursively enumerate regular files whose name ends in `extension`
/// (case-insensitive). Walk errors are logged and skipped; the scan
/// degrades to whatever was reachable.
fn enumerate(root: &Path, extension: &str) -> Vec<PathBuf> {
    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(false);

    let mut candidates = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("error walking {}: {}", root.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(&suffix) {
            candidates.push(entry.into_path());
        }
    }
    candidates
}

/// One unit of work: extract text, match every token, report back.
///
/// Extraction failure means "no text for this file" - the filename is
/// still matched, the failure is logged, and siblings are unaffected.
fn process_file(path: &Path, matcher: &Matcher, extractor: &dyn TextExtractor) -> FileMatches {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (lines, extract_failed) = match extractor.extract(path) {
        Ok(lines) => (lines, false),
        Err(err) => {
            warn!("cannot extract text from {}: {}", path.display(), err);
            (Vec::new(), true)
        }
    };

    FileMatches {
        tokens: matcher.match_file(&filename, &lines),
        path: path.to_path_buf(),
        extract_failed,
    }
}
