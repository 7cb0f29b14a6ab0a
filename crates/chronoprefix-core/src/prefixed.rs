use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `YYYY-MM-DD HH:MM:SS[.mmm] ` at the start of a name
static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(\.\d{3})? .+").unwrap());

/// What to do with files whose names already carry a date prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixPolicy {
    /// Leave them alone
    Skip,
    /// Prefix them again
    Reprefix,
}

/// Check if a filename starts with a chronological prefix
pub fn is_already_prefixed(filename: &str) -> bool {
    PREFIX_RE.is_match(filename)
}

fn file_name_of(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Split scanned paths into (unprefixed, already prefixed), keeping order.
pub fn partition_prefixed(paths: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    paths
        .into_iter()
        .partition(|p| !is_already_prefixed(file_name_of(p)))
}

/// Apply a policy to a scan: the paths that should be processed.
pub fn apply_policy(fresh: Vec<PathBuf>, prefixed: Vec<PathBuf>, policy: PrefixPolicy) -> Vec<PathBuf> {
    match policy {
        PrefixPolicy::Skip => fresh,
        PrefixPolicy::Reprefix => {
            let mut all = fresh;
            all.extend(prefixed);
            all.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            all
        }
    }
}
