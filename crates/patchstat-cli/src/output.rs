//! Output formatting for CLI display and result files

use anyhow::{Context, Result};
use colored::Colorize;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use patchstat_core::{CommitSource, MatchResult};
use patchstat_index::{ComparisonReport, StatusReport, StatusRow};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tabled::builder::Builder;
use tabled::settings::{object::Rows, Color, Modify, Style};
use tabled::Tabled;
use tempfile::NamedTempFile;

/// Columns produced by the status report; any other column of a previous
/// report is carried over
pub const STATUS_COLUMNS: [&str; 9] = [
    "Number",
    "Commit",
    "Title",
    "Author",
    "Committer",
    "Category",
    "Upstream Commit",
    "Upstream Found by",
    "Upstream Range",
];

/// Table row for per-upstream totals
#[derive(Tabled)]
pub struct UpstreamCountRow {
    #[tabled(rename = "Upstream")]
    pub range: String,
    #[tabled(rename = "Commits")]
    pub commits: usize,
}

/// Writes a CSV file through a temporary file in the same directory
///
/// The target only appears once every record has been written.
fn write_csv_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::NonNumeric)
            .from_writer(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush().context("Failed to flush CSV output")?;
    }

    tmp.persist(path)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

fn match_cells(m: &MatchResult) -> [String; 2] {
    match (m.matched_id(), m.method()) {
        (Some(id), Some(method)) => [id.to_string(), method.label().to_string()],
        _ => [String::new(), String::new()],
    }
}

/// Writes a comparison as CSV: `Title, r1, r1, r2, r2, ...` with a commit
/// and a method column per range
pub fn write_comparison_csv(path: &Path, report: &ComparisonReport) -> Result<()> {
    write_csv_atomic(path, |writer| {
        let mut header = vec!["Title".to_string()];
        for range in &report.ranges {
            header.push(range.name.clone());
            header.push(range.name.clone());
        }
        writer.write_record(&header)?;

        for row in &report.rows {
            let mut record = vec![row.title.clone()];
            record.extend(row.matches.iter().flat_map(match_cells));
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// Prints a comparison as a terminal table
pub fn print_comparison_table(report: &ComparisonReport, source: &dyn CommitSource) -> Result<()> {
    let mut builder = Builder::default();

    let mut header = vec!["Commit".to_string(), "Title".to_string()];
    header.extend(report.ranges.iter().map(|r| r.name.clone()));
    builder.push_record(header);

    for row in &report.rows {
        let mut record = vec![source.shorten(&row.commit)?, row.title.clone()];
        for m in &row.matches {
            let cell = match (m.matched_id(), m.method()) {
                (Some(id), Some(method)) => format!("{} ({})", source.shorten(id)?, method.label()),
                _ => "-".to_string(),
            };
            record.push(cell);
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_BRIGHT_CYAN));
    println!("{}", table);
    Ok(())
}

/// Prints topic commits, each followed by its upstream counterpart if any
///
/// Empty commits are skipped.
pub fn print_diff_view(
    report: &ComparisonReport,
    source: &dyn CommitSource,
    upstream: &str,
) -> Result<()> {
    for row in &report.rows {
        if source.is_empty_commit(&row.commit)? {
            continue;
        }

        println!("{} {}", source.shorten(&row.commit)?.yellow(), row.title);

        let found = report.match_in(row, upstream);
        if let Some((id, method)) = found.and_then(|m| m.matched_id().zip(m.method())) {
            println!(
                "  Upstream: {} ({})",
                source.shorten(id)?.green(),
                method.label()
            );
        }
    }
    Ok(())
}

/// Hand-maintained columns of a previous status report
#[derive(Debug, Default)]
pub struct OldReport {
    pub columns: Vec<String>,
    rows: HashMap<String, Vec<String>>,
}

impl OldReport {
    /// Reads a tab-separated report; a missing file yields `None`
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            log::warn!("Previous report {:?} not found, no columns carried over", path);
            return Ok(None);
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open previous report {:?}", path))?;

        let headers = reader.headers()?.clone();
        let commit_col = headers
            .iter()
            .position(|h| h == "Commit")
            .with_context(|| format!("Previous report {:?} has no 'Commit' column", path))?;
        let extra: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !STATUS_COLUMNS.contains(h))
            .map(|(i, _)| i)
            .collect();

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("Failed to read {:?}", path))?;
            let Some(commit) = record.get(commit_col) else {
                continue;
            };
            let values = extra
                .iter()
                .map(|&i| record.get(i).unwrap_or("").to_string())
                .collect();
            rows.insert(commit.to_string(), values);
        }

        log::info!("Loaded {} old entries from {:?}", rows.len(), path);
        Ok(Some(Self {
            columns: extra.iter().map(|&i| headers[i].to_string()).collect(),
            rows,
        }))
    }

    /// Carried-over values for `commit`, empty cells when unknown
    fn values(&self, commit: &str) -> Vec<String> {
        self.rows
            .get(commit)
            .cloned()
            .unwrap_or_else(|| vec![String::new(); self.columns.len()])
    }
}

fn status_record(row: &StatusRow) -> Vec<String> {
    let [upstream_commit, found_by] = match_cells(&row.upstream);
    vec![
        row.number.to_string(),
        row.commit.clone(),
        row.title.clone(),
        row.author.clone(),
        row.committer.clone(),
        row.category.clone().unwrap_or_default(),
        upstream_commit,
        found_by,
        row.upstream_range.clone().unwrap_or_default(),
    ]
}

/// Writes the patch-status report as CSV
pub fn write_status_csv(path: &Path, report: &StatusReport, old: Option<&OldReport>) -> Result<()> {
    write_csv_atomic(path, |writer| {
        let mut header: Vec<String> = STATUS_COLUMNS.iter().map(|c| c.to_string()).collect();
        if let Some(old) = old {
            header.extend(old.columns.iter().cloned());
        }
        writer.write_record(&header)?;

        for row in &report.rows {
            let mut record = status_record(row);
            if let Some(old) = old {
                record.extend(old.values(&row.commit));
            }
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// Prints per-upstream totals of a status report
pub fn print_upstream_counts(report: &StatusReport) {
    let rows: Vec<UpstreamCountRow> = report
        .upstream_counts
        .iter()
        .map(|(range, commits)| UpstreamCountRow {
            range: range.clone(),
            commits: *commits,
        })
        .collect();

    let mut table = tabled::Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_BRIGHT_CYAN));
    println!("{}", table);
}
