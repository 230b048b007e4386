//! Upstreamed command implementation

use anyhow::Result;
use patchstat_core::RangeSpec;
use patchstat_index::GitSource;
use std::path::Path;

use super::topic::{list_topic, TOPIC, UPSTREAM};

/// Lists commits of `range` with their counterparts in `upstream`
///
/// Upstream is searched from the merge base of the range head and
/// `upstream`, up to `upstream`.
pub fn cmd_upstreamed(
    range: String,
    upstream: String,
    all: bool,
    repo: &Path,
    cache_path: &Path,
) -> Result<()> {
    let source = GitSource::open(repo)?;
    let head = source.range_head(&range)?;
    let merge_base = source.merge_base(&head, &upstream)?;
    log::info!("Merge base {}", merge_base);

    let specs = vec![
        RangeSpec::new(TOPIC, range),
        RangeSpec::new(UPSTREAM, format!("{}..{}", merge_base, upstream)),
    ];
    list_topic(&source, &specs, all, cache_path)
}
