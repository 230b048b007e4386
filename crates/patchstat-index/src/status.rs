//! Patch-status report: which vendor commits made it upstream
//!
//! Unlike a plain comparison, the vendor range is first reduced to the
//! commits someone cares about (by people or by paths), duplicates are
//! dropped, and every remaining commit is resolved against all upstream
//! ranges at once.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use patchstat_core::{CancelToken, CommitSource, CoreError, MatchResult, Range, RangeSpec};
use patchstat_db::CommitCache;
use serde::{Deserialize, Serialize};

use crate::formatting::format_number;
use crate::processing::{collect_ranges, flatten, warm_cache, warm_files};
use crate::progress::{Progress, DEFAULT_PROGRESS_INTERVAL};
use crate::resolver::{Ambiguity, Resolver};
use crate::xref::CrossReferenceIndex;

/// A label given to commits touching any of `paths`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Path prefixes
    pub paths: Vec<String>,
}

impl Category {
    fn matches(&self, files: &[String]) -> bool {
        files
            .iter()
            .any(|f| self.paths.iter().any(|p| f.starts_with(p.as_str())))
    }
}

/// Inputs of a patch-status report
#[derive(Debug, Clone)]
pub struct StatusOptions {
    /// Range holding the carried patches
    pub vendor: RangeSpec,
    /// Ranges searched for the carried patches
    pub upstreams: Vec<RangeSpec>,
    /// Keep commits authored or committed by these emails
    pub people: Vec<String>,
    /// Keep commits touching these path prefixes
    pub paths: Vec<String>,
    /// First matching category wins
    pub categories: Vec<Category>,
    /// Upstream range names whose matches are left out of the report
    pub drop_upstreamed: Vec<String>,
    pub match_by_title: bool,
    pub progress_interval: Duration,
}

impl StatusOptions {
    pub fn new(vendor: RangeSpec, upstreams: Vec<RangeSpec>) -> Self {
        Self {
            vendor,
            upstreams,
            people: Vec::new(),
            paths: Vec::new(),
            categories: Vec::new(),
            drop_upstreamed: Vec::new(),
            match_by_title: true,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    fn needs_files(&self) -> bool {
        !self.paths.is_empty() || !self.categories.is_empty()
    }
}

/// One vendor commit in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    /// 1-based position among the kept vendor commits, oldest first
    pub number: usize,
    pub commit: String,
    pub title: String,
    pub author: String,
    pub committer: String,
    pub category: Option<String>,
    pub upstream: MatchResult,
    /// Name of the upstream range the match was found in
    pub upstream_range: Option<String>,
}

/// Outcome of a patch-status run
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub rows: Vec<StatusRow>,
    /// Vendor commits after duplicate removal and filtering
    pub vendor_commits: usize,
    /// Vendor commits dropped as duplicates of an earlier vendor commit
    pub duplicates: usize,
    /// Matched commits per upstream range, in declaration order
    pub upstream_counts: Vec<(String, usize)>,
    pub ambiguities: Vec<Ambiguity>,
}

impl StatusReport {
    /// Builds the report described by `options`
    pub fn run(
        source: &dyn CommitSource,
        options: &StatusOptions,
        cache: &mut CommitCache,
        cancel: &CancelToken,
    ) -> Result<Self> {
        let start_time = Instant::now();
        let interval = options.progress_interval;

        for name in &options.drop_upstreamed {
            if !options.upstreams.iter().any(|u| &u.name == name) {
                return Err(CoreError::UnknownRange(name.clone()).into());
            }
        }

        let mut specs = vec![options.vendor.clone()];
        specs.extend(options.upstreams.iter().cloned());
        let ranges = collect_ranges(source, &specs, cancel)?;
        let Some((vendor, upstreams)) = ranges.split_first() else {
            return Err(CoreError::UnknownRange(options.vendor.name.clone()).into());
        };

        let universe = flatten(&ranges);
        warm_cache(cache, source, &universe, interval, cancel)?;

        let (vendor_ids, duplicates) = drop_duplicates(vendor, cache)?;
        log::info!("Dropped {} duplicates", format_number(duplicates));

        if options.needs_files() {
            warm_files(cache, source, &vendor_ids, interval, cancel)?;
        }
        cache.save().context("Failed to save commit cache")?;

        let vendor_ids = filter_commits(source, options, cache, vendor_ids)?;
        log::info!("  found {} interesting commits", format_number(vendor_ids.len()));

        let index = CrossReferenceIndex::new(cache, &universe)?;
        let resolver = Resolver::new(&index, options.match_by_title);

        let mut rows = Vec::new();
        let mut ambiguities = Vec::new();
        let mut upstream_counts: Vec<(String, usize)> = upstreams
            .iter()
            .map(|r| (r.name().to_string(), 0))
            .collect();
        let mut progress = Progress::new("report", vendor_ids.len(), interval);

        for (i, id) in vendor_ids.iter().enumerate() {
            cancel.check()?;
            progress.tick(i);

            let record = index
                .record(id)
                .ok_or_else(|| CoreError::NotCached(id.clone()))?;
            let (resolution, found_in) = resolver.resolve_any(record, upstreams);

            if let Some(ambiguity) = resolution.ambiguity {
                ambiguity.log();
                ambiguities.push(ambiguity);
            }

            if let Some(range) = found_in {
                if let Some(count) = upstream_counts
                    .iter_mut()
                    .find(|(n, _)| n.as_str() == range.name())
                {
                    count.1 += 1;
                }
                if options.drop_upstreamed.iter().any(|n| n.as_str() == range.name()) {
                    continue;
                }
            }

            let signature = source
                .signature_of(id)
                .with_context(|| format!("Failed to read signature of {}", id))?;
            let files = record.files.as_deref().unwrap_or(&[]);
            let category = options
                .categories
                .iter()
                .find(|c| c.matches(files))
                .map(|c| c.name.clone());

            rows.push(StatusRow {
                number: i + 1,
                commit: id.clone(),
                title: record.title.clone(),
                author: signature.author_name,
                committer: signature.committer_name,
                category,
                upstream: resolution.result,
                upstream_range: found_in.map(|r| r.name().to_string()),
            });
        }
        progress.finish();

        log::info!(
            "Patch status: {} vendor commits, {} rows in {:.1}s",
            format_number(vendor_ids.len()),
            format_number(rows.len()),
            start_time.elapsed().as_secs_f64()
        );

        Ok(Self {
            rows,
            vendor_commits: vendor_ids.len(),
            duplicates,
            upstream_counts,
            ambiguities,
        })
    }
}

/// Keeps the oldest vendor commit of every fingerprint
///
/// The result is in oldest-first order, which is also the numbering order
/// of the report. Every vendor commit must already be cached.
fn drop_duplicates(
    vendor: &Range,
    cache: &CommitCache,
) -> Result<(Vec<String>, usize), CoreError> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(vendor.len());
    let mut dropped = 0;

    for id in vendor.members().iter().rev() {
        let record = cache
            .record(id)
            .ok_or_else(|| CoreError::NotCached(id.clone()))?;
        if seen.insert(record.fingerprint.as_str()) {
            kept.push(id.clone());
        } else {
            log::debug!("Dropping duplicate {}", record);
            dropped += 1;
        }
    }

    Ok((kept, dropped))
}

/// Applies the people and path filters; with neither configured keeps all
fn filter_commits(
    source: &dyn CommitSource,
    options: &StatusOptions,
    cache: &CommitCache,
    ids: Vec<String>,
) -> Result<Vec<String>> {
    if options.people.is_empty() && options.paths.is_empty() {
        return Ok(ids);
    }

    log::info!("Filtering interesting commits...");
    let mut kept = Vec::with_capacity(ids.len());
    for id in ids {
        let by_path = cache
            .record(&id)
            .and_then(|r| r.files.as_deref())
            .is_some_and(|files| {
                files
                    .iter()
                    .any(|f| options.paths.iter().any(|p| f.starts_with(p.as_str())))
            });

        let by_people = !options.people.is_empty() && {
            let signature = source
                .signature_of(&id)
                .with_context(|| format!("Failed to read signature of {}", id))?;
            options
                .people
                .iter()
                .any(|p| *p == signature.author_email || *p == signature.committer_email)
        };

        if by_path || by_people {
            kept.push(id);
        }
    }
    Ok(kept)
}
