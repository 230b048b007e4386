//! Git-backed commit source
//!
//! Uses git2 (libgit2) for enumeration and fact derivation, so no command
//! strings are ever built from user input.
//!
//! ## Range expressions
//!
//! An expression is a whitespace-separated list of terms, as accepted by
//! `git rev-list`:
//! - `A..B`: commits reachable from B but not from A (`..B` means `HEAD..B`)
//! - `A...B`: commits reachable from either side but not from their merge base
//! - `^X`: exclude commits reachable from X
//! - `X`: include commits reachable from X

use std::path::Path;

use anyhow::Context;
use git2::{Commit, Diff, ErrorCode, Oid, Repository, Sort};
use patchstat_core::{CommitSignature, CommitSource, CommitStream, CoreError};

/// Commit source reading a local Git repository
pub struct GitSource {
    repo: Repository,
}

impl GitSource {
    /// Opens the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let repo = Repository::discover(path.as_ref())
            .with_context(|| format!("Failed to open repository at {:?}", path.as_ref()))?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Full id of the commit a revision points at
    pub fn resolve(&self, rev: &str) -> Result<String, CoreError> {
        self.peel(rev)
            .map(|oid| oid.to_string())
            .map_err(|e| CoreError::source(rev, e))
    }

    /// Best common ancestor of two revisions
    pub fn merge_base(&self, a: &str, b: &str) -> Result<String, CoreError> {
        let expression = format!("{} {}", a, b);
        let a = self.peel(a).map_err(|e| CoreError::source(&expression, e))?;
        let b = self.peel(b).map_err(|e| CoreError::source(&expression, e))?;
        self.repo
            .merge_base(a, b)
            .map(|oid| oid.to_string())
            .map_err(|e| CoreError::source(&expression, e))
    }

    /// Newest commit of `expression`, merges included
    pub fn range_head(&self, expression: &str) -> Result<String, CoreError> {
        let mut revwalk = self
            .revwalk(expression)
            .map_err(|e| CoreError::source(expression, e))?;
        match revwalk.next() {
            Some(oid) => oid
                .map(|oid| oid.to_string())
                .map_err(|e| CoreError::source(expression, e)),
            None => Err(CoreError::source(expression, "range contains no commits")),
        }
    }

    fn peel(&self, rev: &str) -> Result<Oid, git2::Error> {
        Ok(self.repo.revparse_single(rev)?.peel_to_commit()?.id())
    }

    fn commit(&self, id: &str) -> Result<Commit<'_>, CoreError> {
        let oid = if id.len() == 40 {
            Oid::from_str(id)
        } else {
            self.peel(id)
        }
        .map_err(|e| CoreError::commit(id, e))?;
        self.repo.find_commit(oid).map_err(|e| CoreError::commit(id, e))
    }

    /// Diff of a commit against its first parent (or the empty tree)
    fn commit_diff(&self, commit: &Commit<'_>) -> Result<Diff<'_>, git2::Error> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };
        self.repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
    }

    /// Applies every term of `expression` to a fresh revwalk
    fn revwalk(&self, expression: &str) -> Result<git2::Revwalk<'_>, git2::Error> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;

        let mut included = false;
        for term in expression.split_whitespace() {
            if let Some(rev) = term.strip_prefix('^') {
                revwalk.hide(self.peel(rev)?)?;
            } else if let Some((a, b)) = term.split_once("...") {
                let a = self.peel(or_head(a))?;
                let b = self.peel(or_head(b))?;
                revwalk.push(a)?;
                revwalk.push(b)?;
                // Criss-cross histories have several merge bases; all are excluded
                match self.repo.merge_bases(a, b) {
                    Ok(bases) => {
                        for base in bases.iter() {
                            revwalk.hide(*base)?;
                        }
                    }
                    Err(e) if e.code() == ErrorCode::NotFound => {}
                    Err(e) => return Err(e),
                }
                included = true;
            } else if let Some((a, b)) = term.split_once("..") {
                revwalk.hide(self.peel(or_head(a))?)?;
                revwalk.push(self.peel(or_head(b))?)?;
                included = true;
            } else {
                revwalk.push(self.peel(term)?)?;
                included = true;
            }
        }

        if !included {
            return Err(git2::Error::from_str("no revision to start from"));
        }
        Ok(revwalk)
    }
}

fn or_head(rev: &str) -> &str {
    if rev.is_empty() {
        "HEAD"
    } else {
        rev
    }
}

impl CommitSource for GitSource {
    fn enumerate<'a>(&'a self, expression: &str) -> Result<CommitStream<'a>, CoreError> {
        let revwalk = self
            .revwalk(expression)
            .map_err(|e| CoreError::source(expression, e))?;
        let expression = expression.to_string();

        // Merge commits are skipped; revwalk never yields the same commit twice
        let stream = revwalk.filter_map(move |oid| {
            let oid = match oid {
                Ok(oid) => oid,
                Err(e) => return Some(Err(CoreError::source(&expression, e))),
            };
            match self.repo.find_commit(oid) {
                Ok(commit) if commit.parent_count() > 1 => None,
                Ok(_) => Some(Ok(oid.to_string())),
                Err(e) => Some(Err(CoreError::source(&expression, e))),
            }
        });
        Ok(Box::new(stream))
    }

    fn fingerprint_of(&self, id: &str) -> Result<String, CoreError> {
        let commit = self.commit(id)?;
        let diff = self
            .commit_diff(&commit)
            .map_err(|e| CoreError::commit(id, e))?;
        let patch_id = diff.patchid(None).map_err(|e| CoreError::commit(id, e))?;
        Ok(patch_id.to_string())
    }

    fn title_of(&self, id: &str) -> Result<String, CoreError> {
        let commit = self.commit(id)?;
        Ok(commit.summary().unwrap_or("").to_string())
    }

    fn files_of(&self, id: &str) -> Result<Vec<String>, CoreError> {
        let commit = self.commit(id)?;
        let diff = self
            .commit_diff(&commit)
            .map_err(|e| CoreError::commit(id, e))?;

        // Deleted files only carry a path on the old side
        let files = diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().into_owned())
            })
            .collect();
        Ok(files)
    }

    fn shorten(&self, id: &str) -> Result<String, CoreError> {
        let commit = self.commit(id)?;
        let short = commit
            .as_object()
            .short_id()
            .map_err(|e| CoreError::commit(id, e))?;
        Ok(short.as_str().unwrap_or(id).to_string())
    }

    fn is_empty_commit(&self, id: &str) -> Result<bool, CoreError> {
        let commit = self.commit(id)?;
        if commit.parent_count() == 0 {
            return Ok(false);
        }
        let parent = commit.parent(0).map_err(|e| CoreError::commit(id, e))?;
        Ok(commit.tree_id() == parent.tree_id())
    }

    fn signature_of(&self, id: &str) -> Result<CommitSignature, CoreError> {
        let commit = self.commit(id)?;
        let author = commit.author();
        let committer = commit.committer();
        Ok(CommitSignature {
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            committer_name: committer.name().unwrap_or("").to_string(),
            committer_email: committer.email().unwrap_or("").to_string(),
        })
    }
}
