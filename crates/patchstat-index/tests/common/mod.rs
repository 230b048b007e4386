//! Shared fixtures for engine tests

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use patchstat_core::{CancelToken, CommitSignature, CommitSource, CommitStream, CoreError};

#[derive(Default)]
struct FakeCommit {
    fingerprint: String,
    title: String,
    files: Vec<String>,
    signature: CommitSignature,
}

/// In-memory commit source with fixed ranges and call counters
#[derive(Default)]
pub struct FakeSource {
    commits: HashMap<String, FakeCommit>,
    ranges: HashMap<String, Vec<String>>,
    pub fingerprint_calls: Cell<usize>,
    pub files_calls: Cell<usize>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(mut self, id: &str, fingerprint: &str, title: &str) -> Self {
        self.commits.insert(
            id.to_string(),
            FakeCommit {
                fingerprint: fingerprint.to_string(),
                title: title.to_string(),
                ..FakeCommit::default()
            },
        );
        self
    }

    pub fn files(mut self, id: &str, files: &[&str]) -> Self {
        if let Some(c) = self.commits.get_mut(id) {
            c.files = files.iter().map(|f| f.to_string()).collect();
        }
        self
    }

    pub fn author(mut self, id: &str, name: &str, email: &str) -> Self {
        if let Some(c) = self.commits.get_mut(id) {
            c.signature = CommitSignature {
                author_name: name.to_string(),
                author_email: email.to_string(),
                committer_name: name.to_string(),
                committer_email: email.to_string(),
            };
        }
        self
    }

    pub fn range(mut self, expression: &str, ids: &[&str]) -> Self {
        self.ranges.insert(
            expression.to_string(),
            ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Cancels `token` once `calls` fingerprints have been computed
    pub fn cancel_after(mut self, calls: usize, token: CancelToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    fn get(&self, id: &str) -> Result<&FakeCommit, CoreError> {
        self.commits
            .get(id)
            .ok_or_else(|| CoreError::commit(id, "unknown commit"))
    }
}

impl CommitSource for FakeSource {
    fn enumerate<'a>(&'a self, expression: &str) -> Result<CommitStream<'a>, CoreError> {
        let ids = self
            .ranges
            .get(expression)
            .ok_or_else(|| CoreError::source(expression, "unknown revision"))?;
        Ok(Box::new(ids.iter().cloned().map(Ok)))
    }

    fn fingerprint_of(&self, id: &str) -> Result<String, CoreError> {
        self.fingerprint_calls.set(self.fingerprint_calls.get() + 1);
        if let Some((calls, token)) = &self.cancel_after {
            if self.fingerprint_calls.get() >= *calls {
                token.cancel();
            }
        }
        Ok(self.get(id)?.fingerprint.clone())
    }

    fn title_of(&self, id: &str) -> Result<String, CoreError> {
        Ok(self.get(id)?.title.clone())
    }

    fn files_of(&self, id: &str) -> Result<Vec<String>, CoreError> {
        self.files_calls.set(self.files_calls.get() + 1);
        Ok(self.get(id)?.files.clone())
    }

    fn signature_of(&self, id: &str) -> Result<CommitSignature, CoreError> {
        Ok(self.get(id)?.signature.clone())
    }
}

pub fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
