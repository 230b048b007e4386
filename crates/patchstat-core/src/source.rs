//! The commit provider contract

use crate::{CommitSignature, CoreError};

/// Lazy, finite, non-restartable sequence of commit ids in emission order
pub type CommitStream<'a> = Box<dyn Iterator<Item = Result<String, CoreError>> + 'a>;

/// Supplies commit ids and their derived facts
///
/// The comparison engine never talks to version control directly; every
/// query goes through this trait. `fingerprint_of` and `title_of` are
/// assumed expensive and are only ever called through the commit cache.
pub trait CommitSource {
    /// Enumerates a range expression, merges excluded, without duplicates
    fn enumerate<'a>(&'a self, expression: &str) -> Result<CommitStream<'a>, CoreError>;

    /// Content fingerprint of a commit
    fn fingerprint_of(&self, id: &str) -> Result<String, CoreError>;

    /// First line of the commit message
    fn title_of(&self, id: &str) -> Result<String, CoreError>;

    /// Paths touched by the commit
    fn files_of(&self, id: &str) -> Result<Vec<String>, CoreError>;

    /// Abbreviated id for display
    fn shorten(&self, id: &str) -> Result<String, CoreError> {
        Ok(id.get(..12).unwrap_or(id).to_string())
    }

    /// Whether the commit leaves the tree unchanged
    fn is_empty_commit(&self, _id: &str) -> Result<bool, CoreError> {
        Ok(false)
    }

    /// Author and committer of the commit
    fn signature_of(&self, _id: &str) -> Result<CommitSignature, CoreError> {
        Ok(CommitSignature::default())
    }
}
