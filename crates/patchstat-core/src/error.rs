//! Error types for patchstat-core

/// Errors raised by commit sources and the comparison engine
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The range expression could not be enumerated. Fatal for the run.
    #[error("Cannot enumerate range '{expression}': {message}")]
    Source { expression: String, message: String },

    /// Facts for a single commit could not be derived. Fatal for the run.
    #[error("Cannot read commit {commit}: {message}")]
    Commit { commit: String, message: String },

    #[error("Invalid range specification '{0}', expected NAME=EXPRESSION")]
    InvalidRangeSpec(String),

    #[error("Range name '{0}' declared more than once")]
    DuplicateRange(String),

    #[error("Unknown range '{0}'")]
    UnknownRange(String),

    /// A commit reached the index without being cached first
    #[error("Commit {0} is not in the commit cache")]
    NotCached(String),

    #[error("Comparison cancelled")]
    Cancelled,
}

impl CoreError {
    /// Builds a `Source` error for the given expression
    pub fn source(expression: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CoreError::Source {
            expression: expression.into(),
            message: message.to_string(),
        }
    }

    /// Builds a `Commit` error for the given commit id
    pub fn commit(commit: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CoreError::Commit {
            commit: commit.into(),
            message: message.to_string(),
        }
    }
}
