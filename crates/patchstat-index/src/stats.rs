//! Statistics collected during a comparison

use std::time::Duration;

use serde::Serialize;

use crate::formatting::{format_duration, format_number};

/// Counters for one comparison run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonStats {
    /// Distinct commits across all ranges
    pub universe: usize,
    /// Commits whose facts were already cached
    pub cache_hits: usize,
    /// Commits whose facts had to be computed
    pub cache_misses: usize,
    /// Commits resolved against the declared ranges
    pub resolved: usize,
    /// Rows in the report
    pub rows: usize,
    /// Rows left out because every range contained the commit
    pub dropped_common: usize,
    /// Matches picked among several candidates
    pub ambiguous: usize,
    pub elapsed: Duration,
}

/// Counters for cache warming
#[derive(Debug, Default)]
pub(crate) struct WarmStats {
    pub hits: usize,
    pub misses: usize,
}

impl std::fmt::Display for ComparisonStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Commits: {} total, {} cached, {} computed | Rows: {} shown, {} common dropped | Ambiguous: {} | Time: {}",
            format_number(self.universe),
            format_number(self.cache_hits),
            format_number(self.cache_misses),
            format_number(self.rows),
            format_number(self.dropped_common),
            self.ambiguous,
            format_duration(self.elapsed)
        )
    }
}
