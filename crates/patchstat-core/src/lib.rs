//! Patchstat Core - Shared data models for commit correspondence
//!
//! This crate defines the data structures used throughout the project:
//! `CommitRecord`, `Range`, `MatchResult`, and the `CommitSource` trait that
//! every commit provider (git, test fixtures) implements.

mod cancel;
mod error;
mod matching;
mod models;
mod range;
mod source;

pub use cancel::CancelToken;
pub use error::CoreError;
pub use matching::{MatchMethod, MatchResult};
pub use models::{CommitRecord, CommitSignature};
pub use range::{Range, RangeSpec};
pub use source::{CommitSource, CommitStream};
