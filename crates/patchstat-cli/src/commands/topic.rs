//! Topic command implementation

use anyhow::Result;
use patchstat_core::RangeSpec;
use patchstat_index::{Comparison, ComparisonOptions, DisplayRange, GitSource};
use std::path::Path;

use crate::helpers::open_cache;
use crate::output::print_diff_view;

pub(crate) const TOPIC: &str = "topic";
pub(crate) const UPSTREAM: &str = "upstream";

/// Lists topic commits with their upstream counterparts
///
/// Both sides are cut at the merge base of their heads.
pub fn cmd_topic(
    topic: String,
    upstream: String,
    all: bool,
    repo: &Path,
    cache_path: &Path,
) -> Result<()> {
    let source = GitSource::open(repo)?;
    let topic_head = source.range_head(&topic)?;
    let upstream_head = source.range_head(&upstream)?;
    let merge_base = source.merge_base(&topic_head, &upstream_head)?;
    log::info!("Merge base {}", merge_base);

    let specs = vec![
        RangeSpec::new(TOPIC, format!("{} ^{}", topic, merge_base)),
        RangeSpec::new(UPSTREAM, format!("{} ^{}", upstream, merge_base)),
    ];
    list_topic(&source, &specs, all, cache_path)
}

/// Shows the topic range in diff view, upstreamed commits only with `all`
pub(crate) fn list_topic(
    source: &GitSource,
    specs: &[RangeSpec],
    all: bool,
    cache_path: &Path,
) -> Result<()> {
    let mut cache = open_cache(cache_path)?;
    let options = ComparisonOptions {
        display: DisplayRange::Range(TOPIC.to_string()),
        match_by_title: true,
        drop_common: !all,
        ..ComparisonOptions::default()
    };
    let report = Comparison::new(source, options).run(specs, &mut cache)?;
    print_diff_view(&report, source, UPSTREAM)
}
