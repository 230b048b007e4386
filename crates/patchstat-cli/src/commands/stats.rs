//! Stats command implementation

use anyhow::Result;
use colored::Colorize;
use patchstat_index::format_number;
use std::path::Path;

use crate::helpers::open_cache;

/// Displays commit cache statistics
pub fn cmd_stats(cache_path: &Path) -> Result<()> {
    let cache = open_cache(cache_path)?;

    println!("{}", "Commit Cache Statistics:".bright_cyan().bold());
    println!("  {}: {}", "Location".bright_yellow(), cache_path.display());
    println!("  {}: {}", "Commits".bright_yellow(), format_number(cache.len()).bold());
    println!(
        "  {}: {}",
        "Distinct patch ids".bright_yellow(),
        format_number(cache.fingerprint_count()).bold()
    );
    println!(
        "  {}: {}",
        "Distinct titles".bright_yellow(),
        format_number(cache.title_count()).bold()
    );
    println!(
        "  {}: {}",
        "Commits with file lists".bright_yellow(),
        format_number(cache.files_count()).bold()
    );
    Ok(())
}
