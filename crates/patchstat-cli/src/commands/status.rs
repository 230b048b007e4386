//! Status command implementation

use anyhow::Result;
use colored::Colorize;
use patchstat_core::{CancelToken, RangeSpec};
use patchstat_index::{format_number, GitSource, StatusReport};
use std::path::{Path, PathBuf};

use crate::config::{self, StatusConfig};
use crate::helpers::{check_range_name, open_cache};
use crate::output::{print_upstream_counts, write_status_csv, OldReport};

/// Writes the patch-status report described by `config_path`
pub fn cmd_status(
    config_path: PathBuf,
    output: Option<PathBuf>,
    repo: &Path,
    cache_path: &Path,
) -> Result<()> {
    let config: StatusConfig = config::load(&config_path)?;
    config.validate()?;

    let upstreams: Vec<RangeSpec> = config
        .upstreams
        .iter()
        .map(|u| RangeSpec::new(u.as_str(), u.as_str()))
        .collect();
    for name in &config.drop_upstreamed {
        check_range_name(name, &upstreams)?;
    }

    let old = match &config.old_file {
        Some(path) => OldReport::load(path)?,
        None => None,
    };

    let source = GitSource::open(repo)?;
    let mut cache = open_cache(cache_path)?;
    let report = StatusReport::run(&source, &config.options(), &mut cache, &CancelToken::new())?;

    let output = output.unwrap_or_else(|| config.output.clone());
    write_status_csv(&output, &report, old.as_ref())?;

    println!("{} {}", "Created".bright_green(), output.display());
    println!(
        "Total {} commits ({} duplicates dropped)",
        format_number(report.vendor_commits).bold(),
        format_number(report.duplicates)
    );
    if !report.ambiguities.is_empty() {
        println!(
            "{} {} ambiguous matches, see warnings",
            "⚠".yellow(),
            report.ambiguities.len()
        );
    }
    print_upstream_counts(&report);

    Ok(())
}
