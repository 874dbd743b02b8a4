//! Sink backend - copy matched files and write the unmatched report

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::backends::scan::MatchMap;
use crate::core::tokens::TokenSet;

/// Counts from one copy pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyStats {
    pub copied: usize,
    pub skipped: usize,
}

/// Copy every matched file into `target_dir` as
/// `{token}_{original file name}`.
///
/// The token prefix is as stored (lowercase) unless `uppercase_prefix` is
/// set. A destination that already exists is skipped, never overwritten,
/// so re-running a scan performs zero additional copies. A single failed
/// copy is logged and does not stop the pass.
pub fn copy_matches(
    matches: &MatchMap,
    target_dir: &Path,
    uppercase_prefix: bool,
) -> Result<CopyStats> {
    fs::create_dir_all(target_dir)
        .with_context(|| format!("failed to create target directory {}", target_dir.display()))?;

    let mut stats = CopyStats::default();
    for (token, files) in matches {
        let prefix = if uppercase_prefix {
            token.to_uppercase()
        } else {
            token.clone()
        };
        for source in files {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            let target = target_dir.join(format!("{}_{}", prefix, file_name.to_string_lossy()));
            if target.exists() {
                debug!("skipping existing copy {}", target.display());
                stats.skipped += 1;
                continue;
            }
            match fs::copy(source, &target) {
                Ok(_) => stats.copied += 1,
                Err(err) => warn!(
                    "failed to copy {} to {}: {}",
                    source.display(),
                    target.display(),
                    err
                ),
            }
        }
    }
    Ok(stats)
}

/// Write one line per token that matched no file, in sorted order,
/// newline-terminated, no header. The file is created or overwritten.
/// Returns how many tokens went unmatched.
pub fn write_unmatched(tokens: &TokenSet, matches: &MatchMap, out_path: &Path) -> Result<usize> {
    let mut report = String::new();
    let mut unmatched = 0usize;
    for token in tokens.iter() {
        if !matches.contains_key(token) {
            report.push_str(token);
            report.push('\n');
            unmatched += 1;
        }
    }
    fs::write(out_path, report)
        .with_context(|| format!("failed to write report {}", out_path.display()))?;
    Ok(unmatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn match_map(entries: &[(&str, &[PathBuf])]) -> MatchMap {
        entries
            .iter()
            .map(|(token, files)| {
                (
                    token.to_string(),
                    files.iter().cloned().collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_copy_uses_token_prefixed_names() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("scan-001.pdf");
        fs::write(&source, "content").unwrap();
        let target = temp.path().join("out");

        let matches = match_map(&[("inv001", &[source])]);
        let stats = copy_matches(&matches, &target, false).unwrap();

        assert_eq!(stats.copied, 1);
        assert_eq!(
            fs::read_to_string(target.join("inv001_scan-001.pdf")).unwrap(),
            "content"
        );
    }

    #[test]
    fn test_copy_is_idempotent() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("scan.pdf");
        fs::write(&source, "v1").unwrap();
        let target = temp.path().join("out");
        let matches = match_map(&[("inv001", &[source.clone()])]);

        copy_matches(&matches, &target, false).unwrap();
        fs::write(&source, "v2").unwrap();
        let second = copy_matches(&matches, &target, false).unwrap();

        assert_eq!(second.copied, 0);
        assert_eq!(second.skipped, 1);
        // The first copy wins; re-runs never clobber.
        assert_eq!(
            fs::read_to_string(target.join("inv001_scan.pdf")).unwrap(),
            "v1"
        );
    }

    #[test]
    fn test_uppercase_prefix_option() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("scan.pdf");
        fs::write(&source, "content").unwrap();
        let target = temp.path().join("out");

        let matches = match_map(&[("inv001", &[source])]);
        copy_matches(&matches, &target, true).unwrap();

        assert!(target.join("INV001_scan.pdf").exists());
    }

    #[test]
    fn test_nested_target_directory_is_created() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("scan.pdf");
        fs::write(&source, "content").unwrap();
        let target = temp.path().join("a/b/c");

        let matches = match_map(&[("inv001", &[source])]);
        let stats = copy_matches(&matches, &target, false).unwrap();

        assert_eq!(stats.copied, 1);
        assert!(target.join("inv001_scan.pdf").exists());
    }

    #[test]
    fn test_missing_source_is_logged_not_fatal() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("out");

        let matches = match_map(&[("inv001", &[temp.path().join("gone.pdf")])]);
        let stats = copy_matches(&matches, &target, false).unwrap();

        assert_eq!(stats.copied, 0);
    }

    #[test]
    fn test_unmatched_report_lists_only_absent_tokens() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("report.txt");
        let tokens = TokenSet::from_tokens(["inv001", "inv002", "inv003"]);
        let matches = match_map(&[("inv002", &[temp.path().join("x.pdf")])]);

        let unmatched = write_unmatched(&tokens, &matches, &out).unwrap();

        assert_eq!(unmatched, 2);
        assert_eq!(fs::read_to_string(&out).unwrap(), "inv001\ninv003\n");
    }

    #[test]
    fn test_unmatched_report_empty_when_all_match() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("report.txt");
        let tokens = TokenSet::from_tokens(["inv001"]);
        let matches = match_map(&[("inv001", &[temp.path().join("x.pdf")])]);

        assert_eq!(write_unmatched(&tokens, &matches, &out).unwrap(), 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "");
    }

    #[test]
    fn test_unmatched_report_is_overwritten() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("report.txt");
        fs::write(&out, "stale contents\n").unwrap();
        let tokens = TokenSet::from_tokens(["inv001"]);

        write_unmatched(&tokens, &MatchMap::new(), &out).unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), "inv001\n");
    }
}
