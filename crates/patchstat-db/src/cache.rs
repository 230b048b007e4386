//! Commit cache: load, populate, persist

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use patchstat_core::{CommitRecord, CommitSource, CoreError};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::CacheError;

/// Format version of the on-disk blob.
/// A blob with any other version is discarded like a corrupt one.
pub const CACHE_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// On-disk format
// ---------------------------------------------------------------------------

/// Record as stored on disk; the id is the map key, not repeated in the value.
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    fingerprint: String,
    title: String,
    files: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
struct StoredCache {
    version: u32,
    commits: BTreeMap<String, StoredRecord>,
    fingerprints: BTreeMap<String, Vec<String>>,
    titles: BTreeMap<String, Vec<String>>,
}

/// What `load` found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No cache file (or no path configured)
    Cold,
    /// Cache file read, with this many commits
    Loaded(usize),
    /// Cache file present but unreadable; started empty
    Discarded,
}

/// In-memory commit cache backed by a single file
///
/// Entries are append-only: a commit's content never changes, so facts once
/// computed stay valid for the lifetime of the file.
#[derive(Debug, Default)]
pub struct CommitCache {
    /// Backing file, `None` for a purely in-memory cache
    path: Option<PathBuf>,

    /// commit id → facts
    commits: BTreeMap<String, CommitRecord>,

    /// fingerprint → commit ids, in insertion order
    fingerprints: BTreeMap<String, Vec<String>>,

    /// title → commit ids, in insertion order
    titles: BTreeMap<String, Vec<String>>,

    /// Number of commits whose facts were computed by this process
    computed: usize,
}

impl CommitCache {
    /// Creates an empty cache bound to `path` without reading it
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Creates an empty cache that is never persisted
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates a cache bound to `path` and loads it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let mut cache = Self::new(path);
        cache.load()?;
        Ok(cache)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replaces in-memory state with the contents of the backing file
    ///
    /// A missing file is a cold start. A file that fails to decode is
    /// discarded with a warning, since every fact can be derived again.
    pub fn load(&mut self) -> Result<LoadOutcome, CacheError> {
        let Some(path) = self.path.clone() else {
            return Ok(LoadOutcome::Cold);
        };
        if !path.is_file() {
            log::debug!("No commit cache at {}, starting cold", path.display());
            return Ok(LoadOutcome::Cold);
        }

        let bytes = fs::read(&path)?;
        match unpack(&bytes) {
            Ok(stored) => {
                self.restore(stored);
                log::info!("Cache loaded with {} commits", self.commits.len());
                Ok(LoadOutcome::Loaded(self.commits.len()))
            }
            Err(e) => {
                log::warn!("Discarding unreadable commit cache {}: {}", path.display(), e);
                self.commits.clear();
                self.fingerprints.clear();
                self.titles.clear();
                Ok(LoadOutcome::Discarded)
            }
        }
    }

    /// Makes sure facts for `id` are cached
    ///
    /// Returns `true` when the facts had to be computed. Nothing is stored
    /// unless both the fingerprint and the title were obtained.
    pub fn ensure(&mut self, id: &str, source: &dyn CommitSource) -> Result<bool, CoreError> {
        if self.commits.contains_key(id) {
            return Ok(false);
        }

        let fingerprint = source.fingerprint_of(id)?;
        let title = source.title_of(id)?;

        self.fingerprints
            .entry(fingerprint.clone())
            .or_default()
            .push(id.to_string());
        self.titles
            .entry(title.clone())
            .or_default()
            .push(id.to_string());
        self.commits.insert(
            id.to_string(),
            CommitRecord::new(id.to_string(), fingerprint, title),
        );
        self.computed += 1;
        Ok(true)
    }

    /// Changed paths of `id`, computed on first request
    pub fn files(&mut self, id: &str, source: &dyn CommitSource) -> Result<&[String], CoreError> {
        self.ensure(id, source)?;

        let missing = self.commits.get(id).is_some_and(|r| r.files.is_none());
        if missing {
            let files = source.files_of(id)?;
            if let Some(record) = self.commits.get_mut(id) {
                record.files = Some(files);
            }
        }

        Ok(self
            .commits
            .get(id)
            .and_then(|r| r.files.as_deref())
            .unwrap_or(&[]))
    }

    /// Writes the whole cache to the backing file
    ///
    /// The blob goes to a temporary file in the same directory which then
    /// replaces the old file, so an interrupted save leaves the previous
    /// cache intact.
    pub fn save(&self) -> Result<(), CacheError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let bytes = self.pack()?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;

        log::info!("Cache saved with {} commits", self.commits.len());
        Ok(())
    }

    pub fn record(&self, id: &str) -> Option<&CommitRecord> {
        self.commits.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commits.contains_key(id)
    }

    /// Every cached commit sharing `fingerprint`
    pub fn commits_with_fingerprint(&self, fingerprint: &str) -> &[String] {
        self.fingerprints
            .get(fingerprint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every cached commit sharing `title`
    pub fn commits_with_title(&self, title: &str) -> &[String] {
        self.titles.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn records(&self) -> impl Iterator<Item = &CommitRecord> {
        self.commits.values()
    }

    pub fn fingerprint_index(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fingerprints
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn title_index(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.titles.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of cached commits
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn fingerprint_count(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn title_count(&self) -> usize {
        self.titles.len()
    }

    /// Number of commits whose file list is cached
    pub fn files_count(&self) -> usize {
        self.commits.values().filter(|r| r.files.is_some()).count()
    }

    /// Number of commits computed (not loaded) by this process
    pub fn computed_count(&self) -> usize {
        self.computed
    }

    fn pack(&self) -> Result<Vec<u8>, CacheError> {
        let stored = StoredCache {
            version: CACHE_VERSION,
            commits: self
                .commits
                .iter()
                .map(|(id, r)| {
                    let value = StoredRecord {
                        fingerprint: r.fingerprint.clone(),
                        title: r.title.clone(),
                        files: r.files.clone(),
                    };
                    (id.clone(), value)
                })
                .collect(),
            fingerprints: self.fingerprints.clone(),
            titles: self.titles.clone(),
        };
        Ok(bincode::serialize(&stored)?)
    }

    fn restore(&mut self, stored: StoredCache) {
        self.commits = stored
            .commits
            .into_iter()
            .map(|(id, r)| {
                let record = CommitRecord {
                    id: id.clone(),
                    fingerprint: r.fingerprint,
                    title: r.title,
                    files: r.files,
                };
                (id, record)
            })
            .collect();
        self.fingerprints = stored.fingerprints;
        self.titles = stored.titles;
    }
}

fn unpack(bytes: &[u8]) -> Result<StoredCache, CacheError> {
    let stored: StoredCache = bincode::deserialize(bytes)?;
    if stored.version != CACHE_VERSION {
        return Err(CacheError::VersionMismatch {
            found: stored.version,
            expected: CACHE_VERSION,
        });
    }
    Ok(stored)
}
