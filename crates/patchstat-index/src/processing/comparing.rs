//! Full comparison run

use std::time::Instant;

use anyhow::{Context, Result};
use patchstat_core::{CoreError, RangeSpec};
use patchstat_db::CommitCache;

use crate::comparison::{
    Comparison, ComparisonReport, ComparisonRow, DisplayRange, RangeSummary, Stage,
};
use crate::progress::Progress;
use crate::resolver::Resolver;
use crate::stats::ComparisonStats;
use crate::xref::CrossReferenceIndex;

use super::{collect_ranges, flatten, warm_cache};

impl Comparison<'_> {
    /// Runs the comparison of `specs`
    ///
    /// Every commit of the display range is resolved against every declared
    /// range, its own included. Rows keep the commit source's order.
    pub fn run(&mut self, specs: &[RangeSpec], cache: &mut CommitCache) -> Result<ComparisonReport> {
        let start_time = Instant::now();
        self.stage = Stage::Init;

        if let DisplayRange::Range(name) = &self.options.display {
            if !specs.iter().any(|s| &s.name == name) {
                return Err(CoreError::UnknownRange(name.clone()).into());
            }
        }

        let ranges = collect_ranges(self.source, specs, &self.cancel)?;
        self.advance(Stage::RangesResolved);

        let universe = flatten(&ranges);
        let warm = warm_cache(
            cache,
            self.source,
            &universe,
            self.options.progress_interval,
            &self.cancel,
        )?;
        cache.save().context("Failed to save commit cache")?;
        self.advance(Stage::CacheWarmed);

        let index = CrossReferenceIndex::new(cache, &universe)?;
        let resolver = Resolver::new(&index, self.options.match_by_title);
        self.advance(Stage::IndexReady);

        let display: &[String] = match &self.options.display {
            DisplayRange::Union => &universe,
            DisplayRange::Range(name) => ranges
                .iter()
                .find(|r| r.name() == name)
                .map(|r| r.members())
                .ok_or_else(|| CoreError::UnknownRange(name.clone()))?,
        };

        self.advance(Stage::Resolving);
        let mut rows = Vec::new();
        let mut ambiguities = Vec::new();
        let mut dropped_common = 0;
        let mut progress = Progress::new("resolved", display.len(), self.options.progress_interval);

        for (i, id) in display.iter().enumerate() {
            self.cancel.check()?;
            progress.tick(i);

            let record = index
                .record(id)
                .ok_or_else(|| CoreError::NotCached(id.clone()))?;

            let mut matches = Vec::with_capacity(ranges.len());
            for target in &ranges {
                let resolution = resolver.resolve(record, target);
                if let Some(ambiguity) = resolution.ambiguity {
                    ambiguity.log();
                    ambiguities.push(ambiguity);
                }
                matches.push(resolution.result);
            }

            let row = ComparisonRow {
                commit: id.clone(),
                title: record.title.clone(),
                matches,
            };
            if self.options.drop_common && row.is_common() {
                dropped_common += 1;
                continue;
            }
            rows.push(row);
        }
        progress.finish();

        let stats = ComparisonStats {
            universe: universe.len(),
            cache_hits: warm.hits,
            cache_misses: warm.misses,
            resolved: display.len(),
            rows: rows.len(),
            dropped_common,
            ambiguous: ambiguities.len(),
            elapsed: start_time.elapsed(),
        };
        log::info!("{}", stats);

        let ranges = ranges
            .iter()
            .map(|r| RangeSummary {
                name: r.name().to_string(),
                expression: r.expression().to_string(),
                commits: r.len(),
            })
            .collect();

        self.advance(Stage::Done);
        Ok(ComparisonReport {
            ranges,
            rows,
            ambiguities,
            stats,
        })
    }
}
