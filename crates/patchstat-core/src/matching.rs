//! Correspondence results

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a corresponding commit was found, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMethod {
    /// The very same commit is reachable in the target range
    Identity,
    /// A commit with the same patch content exists in the target range
    Fingerprint,
    /// A commit with the same title exists in the target range
    Title,
}

impl MatchMethod {
    /// Label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            MatchMethod::Identity => "CommitID",
            MatchMethod::Fingerprint => "PatchID",
            MatchMethod::Title => "Title",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of resolving one commit against one target range
///
/// The matched commit id is carried only by the variants that found one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "commit")]
pub enum MatchResult {
    Identity(String),
    Fingerprint(String),
    Title(String),
    None,
}

impl MatchResult {
    pub fn new(method: MatchMethod, id: String) -> Self {
        match method {
            MatchMethod::Identity => MatchResult::Identity(id),
            MatchMethod::Fingerprint => MatchResult::Fingerprint(id),
            MatchMethod::Title => MatchResult::Title(id),
        }
    }

    pub fn matched_id(&self) -> Option<&str> {
        match self {
            MatchResult::Identity(id) | MatchResult::Fingerprint(id) | MatchResult::Title(id) => {
                Some(id)
            }
            MatchResult::None => None,
        }
    }

    pub fn method(&self) -> Option<MatchMethod> {
        match self {
            MatchResult::Identity(_) => Some(MatchMethod::Identity),
            MatchResult::Fingerprint(_) => Some(MatchMethod::Fingerprint),
            MatchResult::Title(_) => Some(MatchMethod::Title),
            MatchResult::None => None,
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, MatchResult::None)
    }
}
