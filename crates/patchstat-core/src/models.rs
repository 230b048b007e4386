//! Core data models for commit correspondence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived facts about a single commit
///
/// `id` is globally unique. `fingerprint` and `title` are not: cherry-picks
/// and rebases share a fingerprint, and unrelated commits may share a title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit id (hex SHA for git)
    pub id: String,

    /// Content fingerprint, stable across rebases (git patch-id)
    pub fingerprint: String,

    /// First line of the commit message
    pub title: String,

    /// Changed paths, only present once requested
    pub files: Option<Vec<String>>,
}

impl CommitRecord {
    /// Creates a record without a file list
    pub fn new(id: String, fingerprint: String, title: String) -> Self {
        Self {
            id,
            fingerprint,
            title,
            files: None,
        }
    }
}

impl fmt::Display for CommitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.id.get(..12).unwrap_or(&self.id);
        write!(f, "{} {}", short, self.title)
    }
}

/// Author and committer identity of a commit
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitSignature {
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
}
