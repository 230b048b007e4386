//! Helper functions for CLI operations

use anyhow::{bail, Context, Result};
use patchstat_core::RangeSpec;
use patchstat_db::CommitCache;
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = "patch-status.cache";

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Cache location: the explicit path, else the user cache directory
pub fn cache_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_FILE_NAME)
    })
}

/// Opens the commit cache, starting cold when there is none yet
pub fn open_cache(path: &Path) -> Result<CommitCache> {
    CommitCache::open(path).with_context(|| format!("Failed to open commit cache at {:?}", path))
}

/// Closest known name to `name`, if any is close enough
pub fn suggest<'a>(name: &str, known: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    known
        .into_iter()
        .map(|k| (k, strsim::jaro_winkler(name, k)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k)
}

/// Fails with a suggestion when `name` is not one of the declared ranges
pub fn check_range_name(name: &str, specs: &[RangeSpec]) -> Result<()> {
    if specs.iter().any(|s| s.name == name) {
        return Ok(());
    }
    match suggest(name, specs.iter().map(|s| s.name.as_str())) {
        Some(close) => bail!("Unknown range '{}'. Did you mean '{}'?", name, close),
        None => {
            let known: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
            bail!("Unknown range '{}' (declared: {})", name, known.join(", "))
        }
    }
}
