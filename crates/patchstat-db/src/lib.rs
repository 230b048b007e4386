//! Patchstat DB - Persistent cache of derived commit facts
//!
//! Computing a patch-id means diffing a whole commit, which dominates the
//! run time on kernel-sized ranges. This crate keeps every fingerprint and
//! title ever computed in a single blob on disk, together with the
//! fingerprint → commits and title → commits side indexes the resolver
//! looks candidates up in.

mod cache;
mod error;

pub use cache::{CommitCache, LoadOutcome, CACHE_VERSION};
pub use error::CacheError;
