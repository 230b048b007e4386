//! Comparison driver types

use std::fmt;
use std::time::Duration;

use patchstat_core::{CancelToken, CommitSource, MatchResult};
use serde::Serialize;

use crate::progress::DEFAULT_PROGRESS_INTERVAL;
use crate::resolver::Ambiguity;
use crate::stats::ComparisonStats;

/// Which commits get a row in the report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayRange {
    /// Every commit of every range, first occurrence order
    #[default]
    Union,
    /// Only the commits of the named range
    Range(String),
}

/// Knobs for one comparison
#[derive(Debug, Clone)]
pub struct ComparisonOptions {
    pub display: DisplayRange,
    /// Fall back to title equality when fingerprints differ
    pub match_by_title: bool,
    /// Leave out commits found in every range
    pub drop_common: bool,
    pub progress_interval: Duration,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            display: DisplayRange::Union,
            match_by_title: true,
            drop_common: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Stages of a comparison run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    RangesResolved,
    CacheWarmed,
    IndexReady,
    Resolving,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::RangesResolved => "ranges resolved",
            Stage::CacheWarmed => "cache warmed",
            Stage::IndexReady => "index ready",
            Stage::Resolving => "resolving",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Compares declared ranges against each other
///
/// The driver borrows the commit source; the commit cache is passed to
/// `run` so that one cache can serve several comparisons.
pub struct Comparison<'s> {
    pub(crate) source: &'s dyn CommitSource,
    pub(crate) options: ComparisonOptions,
    pub(crate) cancel: CancelToken,
    pub(crate) stage: Stage,
}

impl<'s> Comparison<'s> {
    pub fn new(source: &'s dyn CommitSource, options: ComparisonOptions) -> Self {
        Self {
            source,
            options,
            cancel: CancelToken::new(),
            stage: Stage::Init,
        }
    }

    /// Uses `token` to stop the run between two commits
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    /// Stage reached by the last `run`
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn advance(&mut self, stage: Stage) {
        log::debug!("Comparison stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }
}

/// A declared range after enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub name: String,
    pub expression: String,
    pub commits: usize,
}

/// One commit of the display range and where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub commit: String,
    pub title: String,
    /// One entry per declared range, in declaration order
    pub matches: Vec<MatchResult>,
}

impl ComparisonRow {
    /// Found in every declared range
    pub fn is_common(&self) -> bool {
        self.matches.iter().all(MatchResult::is_match)
    }
}

/// Outcome of a comparison
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub ranges: Vec<RangeSummary>,
    pub rows: Vec<ComparisonRow>,
    pub ambiguities: Vec<Ambiguity>,
    pub stats: ComparisonStats,
}

impl ComparisonReport {
    /// Column of a range in `ComparisonRow::matches`
    pub fn range_index(&self, name: &str) -> Option<usize> {
        self.ranges.iter().position(|r| r.name == name)
    }

    /// Match of `row` in the named range
    pub fn match_in<'r>(&self, row: &'r ComparisonRow, name: &str) -> Option<&'r MatchResult> {
        self.range_index(name).and_then(|i| row.matches.get(i))
    }
}
