//! patch-status CLI - Find out where the commits of a range ended up
//!
//! Provides:
//! - Comparison of named commit ranges (CSV, JSON or terminal table)
//! - "Is my branch upstream yet?" listings for topic branches
//! - Vendor-tree patch-status reports driven by a TOML config
//! - Commit cache statistics

mod commands;
mod config;
mod helpers;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use patchstat_core::RangeSpec;
use std::path::PathBuf;

use commands::{cmd_compare, cmd_stats, cmd_status, cmd_topic, cmd_upstreamed, CompareArgs};

#[derive(Parser)]
#[command(name = "patch-status")]
#[command(about = "Track commits across branches by commit id, patch id and title", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the git repository
    #[arg(short, long, default_value = ".", global = true)]
    repo: PathBuf,

    /// Path to the commit cache (default: <user cache dir>/patch-status.cache)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Show progress (shorthand for --log-level info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compares named commit ranges against each other
    Compare {
        /// Named range, e.g. "up=v6.9-rc7..b4/rp1-cfe" (repeatable)
        #[arg(short = 'R', long = "range", value_name = "NAME=EXPR")]
        ranges: Vec<RangeSpec>,

        /// TOML file declaring the ranges and options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// List only the commits of this range
        #[arg(long, value_name = "NAME")]
        only: Option<String>,

        /// Match by commit id and patch id only
        #[arg(long)]
        no_title: bool,

        /// Leave out commits found in every range
        #[arg(long)]
        drop_common: bool,

        /// Write the result as CSV
        #[arg(short, long, conflicts_with = "json")]
        output: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Lists which commits of a range are already upstream
    Upstreamed {
        /// Commit range of your commits (e.g. v6.8..mybranch)
        range: String,

        /// Upstream branch or tag (e.g. v6.10)
        upstream: String,

        /// Show also upstreamed commits
        #[arg(short, long)]
        all: bool,
    },

    /// Lists which commits of a topic branch are already upstream
    Topic {
        /// Topic branch, commit or range (e.g. mybranch or v6.8..mybranch)
        topic: String,

        /// Upstream commit or range (e.g. v6.10 or v6.9..v6.10)
        upstream: String,

        /// Show also upstreamed commits
        #[arg(short, long)]
        all: bool,
    },

    /// Writes the patch-status report of a vendor tree
    Status {
        /// TOML file describing the vendor tree and upstreams
        #[arg(short, long)]
        config: PathBuf,

        /// Output CSV file (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Shows commit cache statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logger
    let level = if cli.verbose { "info" } else { cli.log_level.as_str() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let cache = helpers::cache_path(cli.cache);

    match cli.command {
        Commands::Compare {
            ranges,
            config,
            only,
            no_title,
            drop_common,
            output,
            json,
        } => {
            let args = CompareArgs {
                ranges,
                config,
                only,
                no_title,
                drop_common,
                output,
                json,
            };
            cmd_compare(args, &cli.repo, &cache)?;
        }
        Commands::Upstreamed {
            range,
            upstream,
            all,
        } => {
            cmd_upstreamed(range, upstream, all, &cli.repo, &cache)?;
        }
        Commands::Topic {
            topic,
            upstream,
            all,
        } => {
            cmd_topic(topic, upstream, all, &cli.repo, &cache)?;
        }
        Commands::Status { config, output } => {
            cmd_status(config, output, &cli.repo, &cache)?;
        }
        Commands::Stats => {
            cmd_stats(&cache)?;
        }
    }

    Ok(())
}
