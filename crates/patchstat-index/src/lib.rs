//! Patchstat Index - Commit correspondence engine
//!
//! This crate is responsible for:
//! - Enumerating commit ranges from a Git repository (`GitSource`)
//! - Warming the commit cache for the union of all ranges
//! - Building the fingerprint/title cross-reference index
//! - Resolving, per commit and target range, whether a corresponding commit exists
//! - Driving whole comparisons (`Comparison`) and patch-status reports (`StatusReport`)

mod comparison;
mod formatting;
mod git;
mod processing;
mod progress;
mod resolver;
mod stats;
mod status;
mod xref;

pub use comparison::{
    Comparison, ComparisonOptions, ComparisonReport, ComparisonRow, DisplayRange, RangeSummary,
    Stage,
};
pub use formatting::{format_duration, format_number};
pub use git::GitSource;
pub use progress::{Progress, DEFAULT_PROGRESS_INTERVAL};
pub use resolver::{Ambiguity, Resolution, Resolver};
pub use stats::ComparisonStats;
pub use status::{Category, StatusOptions, StatusReport, StatusRow};
pub use xref::CrossReferenceIndex;
