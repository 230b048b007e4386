//! Cross-reference index over the flattened universe of a run

use std::collections::HashMap;

use patchstat_core::{CommitRecord, CoreError};
use patchstat_db::CommitCache;

/// Fingerprint and title lookups restricted to the commits of one run
///
/// The cache already maintains fingerprint → ids and title → ids for every
/// commit it has ever seen; this view only filters those lists down to the
/// commits of the ranges being compared.
#[derive(Debug)]
pub struct CrossReferenceIndex<'c> {
    cache: &'c CommitCache,
    records: HashMap<&'c str, &'c CommitRecord>,
}

impl<'c> CrossReferenceIndex<'c> {
    /// Builds the index for `universe`
    ///
    /// Every id must have been `ensure`d in `cache` beforehand.
    pub fn new(cache: &'c CommitCache, universe: &[String]) -> Result<Self, CoreError> {
        let mut records = HashMap::with_capacity(universe.len());
        for id in universe {
            let record = cache
                .record(id)
                .ok_or_else(|| CoreError::NotCached(id.clone()))?;
            records.insert(record.id.as_str(), record);
        }
        Ok(Self { cache, records })
    }

    pub fn cache(&self) -> &'c CommitCache {
        self.cache
    }

    /// Facts of a commit in the universe
    pub fn record(&self, id: &str) -> Option<&'c CommitRecord> {
        self.records.get(id).copied()
    }

    /// Commits of the universe sharing `fingerprint`
    pub fn by_fingerprint<'s>(&'s self, fingerprint: &str) -> impl Iterator<Item = &'c str> + 's {
        self.restrict(self.cache.commits_with_fingerprint(fingerprint))
    }

    /// Commits of the universe sharing `title`
    pub fn by_title<'s>(&'s self, title: &str) -> impl Iterator<Item = &'c str> + 's {
        self.restrict(self.cache.commits_with_title(title))
    }

    /// Number of commits in the universe
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn restrict<'s>(&'s self, ids: &'c [String]) -> impl Iterator<Item = &'c str> + 's {
        ids.iter()
            .map(String::as_str)
            .filter(move |id| self.records.contains_key(id))
    }
}
