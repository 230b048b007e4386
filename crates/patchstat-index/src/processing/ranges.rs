//! Range enumeration

use std::collections::HashSet;

use anyhow::{Context, Result};
use patchstat_core::{CancelToken, CommitSource, CoreError, Range, RangeSpec};

use crate::formatting::format_number;

/// Enumerates every declared range
///
/// Fails on the first range that cannot be enumerated; no partial set of
/// ranges is ever returned.
pub(crate) fn collect_ranges(
    source: &dyn CommitSource,
    specs: &[RangeSpec],
    cancel: &CancelToken,
) -> Result<Vec<Range>> {
    let mut names = HashSet::new();
    for spec in specs {
        if !names.insert(spec.name.as_str()) {
            return Err(CoreError::DuplicateRange(spec.name.clone()).into());
        }
    }

    let mut ranges = Vec::with_capacity(specs.len());
    for spec in specs {
        cancel.check()?;
        log::info!("Collecting commits {} ({})", spec.name, spec.expression);

        let ids = source
            .enumerate(&spec.expression)
            .and_then(|stream| stream.collect::<Result<Vec<_>, _>>())
            .with_context(|| {
                format!(
                    "Failed to collect commits of range '{}' ({})",
                    spec.name, spec.expression
                )
            })?;

        let range = Range::new(spec.name.clone(), spec.expression.clone(), ids);
        log::info!("  {} commits", format_number(range.len()));
        ranges.push(range);
    }

    Ok(ranges)
}

/// Union of all range members, keeping the first occurrence of each commit
pub(crate) fn flatten(ranges: &[Range]) -> Vec<String> {
    let mut seen = HashSet::new();
    ranges
        .iter()
        .flat_map(|r| r.members())
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
