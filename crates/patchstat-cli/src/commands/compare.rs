//! Compare command implementation

use anyhow::{bail, Result};
use colored::Colorize;
use patchstat_core::RangeSpec;
use patchstat_index::{format_number, Comparison, ComparisonOptions, DisplayRange, GitSource};
use std::path::{Path, PathBuf};

use crate::config::{self, CompareConfig};
use crate::helpers::{check_range_name, open_cache};
use crate::output::{print_comparison_table, write_comparison_csv};

/// Command-line arguments of `compare`
pub struct CompareArgs {
    pub ranges: Vec<RangeSpec>,
    pub config: Option<PathBuf>,
    pub only: Option<String>,
    pub no_title: bool,
    pub drop_common: bool,
    pub output: Option<PathBuf>,
    pub json: bool,
}

/// Compares named ranges; ranges from a config file come first
pub fn cmd_compare(args: CompareArgs, repo: &Path, cache_path: &Path) -> Result<()> {
    let mut specs = Vec::new();
    let mut only = args.only;
    let mut match_by_title = !args.no_title;
    let mut drop_common = args.drop_common;
    let mut output = args.output;

    if let Some(path) = &args.config {
        let config: CompareConfig = config::load(path)?;
        specs.extend(config.ranges);
        only = only.or(config.only);
        match_by_title &= config.match_by_title;
        drop_common |= config.drop_common;
        if !args.json {
            output = output.or(config.output);
        }
    }
    specs.extend(args.ranges);

    if specs.is_empty() {
        bail!("No ranges to compare, use --range NAME=EXPR or --config FILE");
    }
    if let Some(name) = &only {
        check_range_name(name, &specs)?;
    }

    let source = GitSource::open(repo)?;
    let mut cache = open_cache(cache_path)?;

    let options = ComparisonOptions {
        display: only.map(DisplayRange::Range).unwrap_or_default(),
        match_by_title,
        drop_common,
        ..ComparisonOptions::default()
    };
    let report = Comparison::new(&source, options).run(&specs, &mut cache)?;

    if let Some(path) = output {
        write_comparison_csv(&path, &report)?;
        println!("{} {}", "Created".bright_green(), path.display());
        println!("Total {} commits", format_number(report.rows.len()).bold());
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_comparison_table(&report, &source)?;
        println!(
            "\n  {} commits, {} dropped as common",
            format_number(report.rows.len()).bold(),
            format_number(report.stats.dropped_common)
        );
    }

    Ok(())
}
