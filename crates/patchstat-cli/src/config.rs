//! TOML configuration for `compare` and `status`

use anyhow::{bail, Context, Result};
use patchstat_core::RangeSpec;
use patchstat_index::{Category, StatusOptions};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

/// Ranges and options of a comparison
///
/// ```toml
/// only = "rpi"
/// drop_common = false
///
/// [[ranges]]
/// name = "rpi"
/// expression = "v6.8-rc2..rpi/cfe-streams"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    #[serde(default)]
    pub ranges: Vec<RangeSpec>,
    pub only: Option<String>,
    #[serde(default = "default_true")]
    pub match_by_title: bool,
    #[serde(default)]
    pub drop_common: bool,
    pub output: Option<PathBuf>,
}

/// A vendor tree and the upstream trees its patches are looked up in
///
/// Upstream ranges are named by their expression.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusConfig {
    /// Range of the carried patches, e.g. "ti-linux/ti-linux-5.4.y ^v5.4.77"
    pub vendor: String,
    pub upstreams: Vec<String>,
    /// Author or committer emails
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Upstreams whose matched commits are left out of the report
    #[serde(default)]
    pub drop_upstreamed: Vec<String>,
    #[serde(default = "default_true")]
    pub match_by_title: bool,
    #[serde(default = "default_status_output")]
    pub output: PathBuf,
    /// Previous report whose extra columns are carried over
    pub old_file: Option<PathBuf>,
}

fn default_status_output() -> PathBuf {
    PathBuf::from("patch-status.csv")
}

impl StatusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.vendor.trim().is_empty() {
            bail!("'vendor' must not be empty");
        }
        if self.upstreams.is_empty() {
            bail!("at least one upstream range is required");
        }
        Ok(())
    }

    pub fn options(&self) -> StatusOptions {
        let upstreams = self
            .upstreams
            .iter()
            .map(|u| RangeSpec::new(u.as_str(), u.as_str()))
            .collect();
        let vendor = RangeSpec::new("vendor", self.vendor.as_str());
        let mut options = StatusOptions::new(vendor, upstreams);
        options.people = self.people.clone();
        options.paths = self.paths.clone();
        options.categories = self.categories.clone();
        options.drop_upstreamed = self.drop_upstreamed.clone();
        options.match_by_title = self.match_by_title;
        options
    }
}

/// Reads and parses a TOML config file
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))
}
