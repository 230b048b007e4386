//! Correspondence resolution
//!
//! For a commit and a target range, the first method that finds a member of
//! the target wins:
//! 1. Identity: the commit itself is a member
//! 2. Fingerprint: a member shares its patch fingerprint
//! 3. Title: a member shares its title (only when title matching is on)
//!
//! When a method finds several members, the one emitted first by the commit
//! source for the target range is chosen, and the choice is reported as an
//! [`Ambiguity`].

use patchstat_core::{CommitRecord, MatchMethod, MatchResult, Range};
use serde::Serialize;

use crate::xref::CrossReferenceIndex;

/// A match that was picked among several candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    /// Commit being resolved
    pub commit: String,
    /// Target range name
    pub range: String,
    pub method: MatchMethod,
    /// The chosen candidate
    pub chosen: String,
    /// All candidates in target-range order, `chosen` first
    pub candidates: Vec<String>,
}

impl Ambiguity {
    /// Reports the pick at warn level
    pub fn log(&self) {
        log::warn!(
            "Multiple {} matches for {} in '{}' (picking {}): {}",
            self.method,
            self.commit,
            self.range,
            self.chosen,
            self.candidates.join(", ")
        );
    }
}

/// Result of one resolution, with the ambiguity it involved if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub result: MatchResult,
    pub ambiguity: Option<Ambiguity>,
}

impl Resolution {
    fn none() -> Self {
        Self {
            result: MatchResult::None,
            ambiguity: None,
        }
    }
}

/// Resolves commits against ranges using a cross-reference index
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a CrossReferenceIndex<'a>,
    match_by_title: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a CrossReferenceIndex<'a>, match_by_title: bool) -> Self {
        Self {
            index,
            match_by_title,
        }
    }

    /// Finds the commit corresponding to `commit` in `target`
    pub fn resolve(&self, commit: &CommitRecord, target: &Range) -> Resolution {
        self.methods()
            .find_map(|method| self.try_method(commit, method, target))
            .unwrap_or_else(Resolution::none)
    }

    /// Finds a corresponding commit in any of `targets`
    ///
    /// Precedence is by method first: an identity match in any target beats
    /// a fingerprint match in an earlier one. For a given method, targets
    /// are tried in order.
    pub fn resolve_any<'r>(
        &self,
        commit: &CommitRecord,
        targets: &'r [Range],
    ) -> (Resolution, Option<&'r Range>) {
        for method in self.methods() {
            for target in targets {
                if let Some(resolution) = self.try_method(commit, method, target) {
                    return (resolution, Some(target));
                }
            }
        }
        (Resolution::none(), None)
    }

    fn methods(&self) -> impl Iterator<Item = MatchMethod> {
        let title = self.match_by_title.then_some(MatchMethod::Title);
        [MatchMethod::Identity, MatchMethod::Fingerprint]
            .into_iter()
            .chain(title)
    }

    fn try_method(
        &self,
        commit: &CommitRecord,
        method: MatchMethod,
        target: &Range,
    ) -> Option<Resolution> {
        if method == MatchMethod::Identity {
            return target.contains(&commit.id).then(|| Resolution {
                result: MatchResult::Identity(commit.id.clone()),
                ambiguity: None,
            });
        }

        let mut candidates: Vec<(usize, &str)> = match method {
            MatchMethod::Fingerprint => self
                .index
                .by_fingerprint(&commit.fingerprint)
                .filter_map(|id| target.position(id).map(|pos| (pos, id)))
                .collect(),
            _ => self
                .index
                .by_title(&commit.title)
                .filter_map(|id| target.position(id).map(|pos| (pos, id)))
                .collect(),
        };
        candidates.sort_unstable();

        let (_, chosen) = *candidates.first()?;
        let chosen = chosen.to_string();

        let ambiguity = (candidates.len() > 1).then(|| Ambiguity {
            commit: commit.id.clone(),
            range: target.name().to_string(),
            method,
            chosen: chosen.clone(),
            candidates: candidates.iter().map(|(_, id)| id.to_string()).collect(),
        });

        Some(Resolution {
            result: MatchResult::new(method, chosen),
            ambiguity,
        })
    }
}
