//! Cache warming

use std::time::Duration;

use anyhow::{Context, Result};
use patchstat_core::{CancelToken, CommitSource, CoreError};
use patchstat_db::CommitCache;

use crate::progress::Progress;
use crate::stats::WarmStats;

/// Ensures facts for every id are cached
///
/// Dominates run time on a cold cache. When cancelled, whatever was
/// computed so far is saved before the error is returned.
pub(crate) fn warm_cache(
    cache: &mut CommitCache,
    source: &dyn CommitSource,
    ids: &[String],
    interval: Duration,
    cancel: &CancelToken,
) -> Result<WarmStats> {
    log::info!("Generating database");
    let mut stats = WarmStats::default();
    let mut progress = Progress::new("commits", ids.len(), interval);

    for (i, id) in ids.iter().enumerate() {
        stop_if_cancelled(cache, cancel)?;
        progress.tick(i);

        let computed = cache
            .ensure(id, source)
            .with_context(|| format!("Failed to read commit {}", id))?;
        if computed {
            log::debug!("Computed facts for {}", id);
            stats.misses += 1;
        } else {
            stats.hits += 1;
        }
    }
    progress.finish();

    Ok(stats)
}

/// Ensures file lists of every id are cached
pub(crate) fn warm_files(
    cache: &mut CommitCache,
    source: &dyn CommitSource,
    ids: &[String],
    interval: Duration,
    cancel: &CancelToken,
) -> Result<()> {
    let mut progress = Progress::new("file lists", ids.len(), interval);

    for (i, id) in ids.iter().enumerate() {
        stop_if_cancelled(cache, cancel)?;
        progress.tick(i);

        cache
            .files(id, source)
            .with_context(|| format!("Failed to list files of commit {}", id))?;
    }
    progress.finish();

    Ok(())
}

fn stop_if_cancelled(cache: &CommitCache, cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        cache.save().context("Failed to save commit cache")?;
        return Err(CoreError::Cancelled.into());
    }
    Ok(())
}
