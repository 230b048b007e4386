//! Tests for the commit cache

use std::cell::Cell;
use std::collections::HashMap;

use anyhow::Result;
use patchstat_core::{CommitSource, CommitStream, CoreError};
use patchstat_db::{CommitCache, LoadOutcome};
use tempfile::TempDir;

// ── fixtures ─────────────────────────────────────────────────────────────────

/// In-memory commit source counting how often facts are derived
#[derive(Default)]
struct CountingSource {
    commits: HashMap<String, (String, String, Vec<String>)>,
    fingerprint_calls: Cell<usize>,
    title_calls: Cell<usize>,
    files_calls: Cell<usize>,
}

impl CountingSource {
    fn with(mut self, id: &str, fingerprint: &str, title: &str, files: &[&str]) -> Self {
        self.commits.insert(
            id.to_string(),
            (
                fingerprint.to_string(),
                title.to_string(),
                files.iter().map(|f| f.to_string()).collect(),
            ),
        );
        self
    }

    fn get(&self, id: &str) -> Result<&(String, String, Vec<String>), CoreError> {
        self.commits
            .get(id)
            .ok_or_else(|| CoreError::commit(id, "no such commit"))
    }
}

impl CommitSource for CountingSource {
    fn enumerate<'a>(&'a self, expression: &str) -> Result<CommitStream<'a>, CoreError> {
        Err(CoreError::source(expression, "not supported"))
    }

    fn fingerprint_of(&self, id: &str) -> Result<String, CoreError> {
        self.fingerprint_calls.set(self.fingerprint_calls.get() + 1);
        Ok(self.get(id)?.0.clone())
    }

    fn title_of(&self, id: &str) -> Result<String, CoreError> {
        self.title_calls.set(self.title_calls.get() + 1);
        Ok(self.get(id)?.1.clone())
    }

    fn files_of(&self, id: &str) -> Result<Vec<String>, CoreError> {
        self.files_calls.set(self.files_calls.get() + 1);
        Ok(self.get(id)?.2.clone())
    }
}

fn source() -> CountingSource {
    CountingSource::default()
        .with("c1", "x", "Fix bug", &["drivers/media/a.c"])
        .with("c2", "y", "Add feature", &["sound/b.c", "sound/c.c"])
        .with("c3", "x", "Fix bug (backport)", &["drivers/media/a.c"])
}

// ── ensure ───────────────────────────────────────────────────────────────────

#[test]
fn test_ensure_computes_once() -> Result<()> {
    let src = source();
    let mut cache = CommitCache::in_memory();

    assert!(cache.ensure("c1", &src)?);
    let first = cache.record("c1").cloned();
    assert!(!cache.ensure("c1", &src)?);

    assert_eq!(cache.record("c1").cloned(), first);
    assert_eq!(src.fingerprint_calls.get(), 1);
    assert_eq!(src.title_calls.get(), 1);
    assert_eq!(cache.computed_count(), 1);
    Ok(())
}

#[test]
fn test_ensure_updates_side_indexes() -> Result<()> {
    let src = source();
    let mut cache = CommitCache::in_memory();
    for id in ["c1", "c2", "c3"] {
        cache.ensure(id, &src)?;
    }

    assert_eq!(cache.commits_with_fingerprint("x"), &["c1", "c3"]);
    assert_eq!(cache.commits_with_fingerprint("y"), &["c2"]);
    assert_eq!(cache.commits_with_title("Fix bug"), &["c1"]);
    assert!(cache.commits_with_title("missing").is_empty());
    assert_eq!(cache.fingerprint_count(), 2);
    assert_eq!(cache.title_count(), 3);
    Ok(())
}

#[test]
fn test_ensure_failure_stores_nothing() {
    let src = source();
    let mut cache = CommitCache::in_memory();

    assert!(cache.ensure("nope", &src).is_err());
    assert!(!cache.contains("nope"));
    assert!(cache.is_empty());
}

// ── files ────────────────────────────────────────────────────────────────────

#[test]
fn test_files_are_lazy_and_cached() -> Result<()> {
    let src = source();
    let mut cache = CommitCache::in_memory();
    cache.ensure("c2", &src)?;
    assert_eq!(cache.record("c2").unwrap().files, None);

    assert_eq!(cache.files("c2", &src)?, &["sound/b.c", "sound/c.c"]);
    assert_eq!(cache.files("c2", &src)?.len(), 2);
    assert_eq!(src.files_calls.get(), 1);
    assert_eq!(cache.files_count(), 1);
    Ok(())
}

// ── load / save ──────────────────────────────────────────────────────────────

#[test]
fn test_load_missing_file_is_cold_start() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut cache = CommitCache::new(tmp.path().join("absent.cache"));
    assert_eq!(cache.load()?, LoadOutcome::Cold);
    assert!(cache.is_empty());
    Ok(())
}

#[test]
fn test_save_then_load_round_trip() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("nested/dir/patch-status.cache");
    let src = source();

    let mut cache = CommitCache::new(&path);
    for id in ["c1", "c2", "c3"] {
        cache.ensure(id, &src)?;
    }
    cache.files("c1", &src)?;
    cache.save()?;

    let reloaded = CommitCache::open(&path)?;
    assert_eq!(
        reloaded.records().collect::<Vec<_>>(),
        cache.records().collect::<Vec<_>>()
    );
    assert_eq!(
        reloaded.fingerprint_index().collect::<Vec<_>>(),
        cache.fingerprint_index().collect::<Vec<_>>()
    );
    assert_eq!(
        reloaded.title_index().collect::<Vec<_>>(),
        cache.title_index().collect::<Vec<_>>()
    );
    assert_eq!(reloaded.computed_count(), 0);

    // Saving the reloaded cache reproduces the same bytes
    let original_bytes = std::fs::read(&path)?;
    reloaded.save()?;
    assert_eq!(std::fs::read(&path)?, original_bytes);
    Ok(())
}

#[test]
fn test_loaded_commits_are_not_recomputed() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("patch-status.cache");

    let mut cache = CommitCache::new(&path);
    cache.ensure("c1", &source())?;
    cache.save()?;

    let src = source();
    let mut reloaded = CommitCache::open(&path)?;
    assert!(!reloaded.ensure("c1", &src)?);
    assert_eq!(src.fingerprint_calls.get(), 0);
    Ok(())
}

#[test]
fn test_corrupt_cache_is_discarded() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("patch-status.cache");
    std::fs::write(&path, b"\x00garbage that is not a cache")?;

    let mut cache = CommitCache::new(&path);
    assert_eq!(cache.load()?, LoadOutcome::Discarded);
    assert!(cache.is_empty());

    // Still usable, and saving replaces the corrupt file
    cache.ensure("c1", &source())?;
    cache.save()?;
    assert_eq!(CommitCache::open(&path)?.len(), 1);
    Ok(())
}

#[test]
fn test_in_memory_save_is_noop() -> Result<()> {
    let mut cache = CommitCache::in_memory();
    cache.ensure("c1", &source())?;
    cache.save()?;
    assert!(cache.path().is_none());
    Ok(())
}
