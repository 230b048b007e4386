//! Tests for the git2-backed commit source

use anyhow::Result;
use git2::{Commit, Oid, Repository, Signature, Time};
use patchstat_core::{CommitSource, CoreError, MatchResult, RangeSpec};
use patchstat_db::CommitCache;
use patchstat_index::{Comparison, ComparisonOptions, DisplayRange, GitSource};
use std::time::Duration;
use tempfile::TempDir;

// ── fixtures ─────────────────────────────────────────────────────────────────

struct Fixture {
    source: GitSource,
    base: Oid,
    m1: Oid,
    m2: Oid,
    t1: Oid,
    t2: Oid,
    t3: Oid,
    t4: Oid,
    merged: Oid,
    _dir: TempDir,
}

fn write_tree(repo: &Repository, files: &[(&str, &str)]) -> Result<Oid> {
    let mut builder = repo.treebuilder(None)?;
    for (name, content) in files {
        let blob = repo.blob(content.as_bytes())?;
        builder.insert(name, blob, 0o100644)?;
    }
    Ok(builder.write()?)
}

fn commit(
    repo: &Repository,
    files: &[(&str, &str)],
    parents: &[Oid],
    message: &str,
    n: i64,
) -> Result<Oid> {
    let tree = repo.find_tree(write_tree(repo, files)?)?;
    let sig = Signature::new("Alice", "alice@example.com", &Time::new(1_700_000_000 + n, 0))?;
    let parents = parents
        .iter()
        .map(|p| repo.find_commit(*p))
        .collect::<Result<Vec<Commit>, _>>()?;
    let parents: Vec<&Commit> = parents.iter().collect();
    Ok(repo.commit(None, &sig, &sig, message, &tree, &parents)?)
}

/// base ── m1 ── m2            (main)
///    └── t1 ── t2 ── t3 ── t4 (topic)
///
/// t1 carries the same change as m2, t3 reuses the title of m1 with a
/// different change, t4 is empty. `merged` joins m2 and t2.
fn fixture() -> Result<Fixture> {
    let dir = tempfile::tempdir()?;
    let repo = Repository::init(dir.path())?;

    let base = commit(&repo, &[("a.txt", "one\n")], &[], "Initial commit", 0)?;
    let m1 = commit(&repo, &[("a.txt", "one\n"), ("b.txt", "b\n")], &[base], "Add b", 1)?;
    let m2 = commit(
        &repo,
        &[("a.txt", "one\ntwo\n"), ("b.txt", "b\n")],
        &[m1],
        "Add two",
        2,
    )?;

    let t1 = commit(
        &repo,
        &[("a.txt", "one\ntwo\n")],
        &[base],
        "Add two\n\n(cherry picked from main)",
        3,
    )?;
    let t2 = commit(
        &repo,
        &[("a.txt", "one\ntwo\n"), ("c.txt", "c\n")],
        &[t1],
        "Add c",
        4,
    )?;
    let t3_files = [("a.txt", "one\ntwo\n"), ("b.txt", "bee\n"), ("c.txt", "c\n")];
    let t3 = commit(&repo, &t3_files, &[t2], "Add b", 5)?;
    let t4 = commit(&repo, &t3_files, &[t3], "Empty", 6)?;

    let merged = commit(
        &repo,
        &[("a.txt", "one\ntwo\n"), ("b.txt", "b\n"), ("c.txt", "c\n")],
        &[m2, t2],
        "Merge topic",
        7,
    )?;

    repo.reference("refs/heads/base", base, true, "test")?;
    repo.reference("refs/heads/main", m2, true, "test")?;
    repo.reference("refs/heads/topic", t4, true, "test")?;
    repo.reference("refs/heads/merged", merged, true, "test")?;
    repo.set_head("refs/heads/main")?;

    Ok(Fixture {
        source: GitSource::from_repository(repo),
        base,
        m1,
        m2,
        t1,
        t2,
        t3,
        t4,
        merged,
        _dir: dir,
    })
}

fn enumerate(source: &GitSource, expression: &str) -> Result<Vec<String>> {
    Ok(source.enumerate(expression)?.collect::<Result<Vec<_>, _>>()?)
}

fn strings(oids: &[Oid]) -> Vec<String> {
    oids.iter().map(Oid::to_string).collect()
}

// ── enumeration ──────────────────────────────────────────────────────────────

#[test]
fn test_enumerate_newest_first() -> Result<()> {
    let f = fixture()?;
    assert_eq!(
        enumerate(&f.source, "base..topic")?,
        strings(&[f.t4, f.t3, f.t2, f.t1])
    );
    assert_eq!(enumerate(&f.source, "^base topic")?, enumerate(&f.source, "base..topic")?);
    Ok(())
}

#[test]
fn test_enumerate_skips_merges() -> Result<()> {
    let f = fixture()?;
    assert_eq!(
        enumerate(&f.source, "base..merged")?,
        strings(&[f.t2, f.t1, f.m2, f.m1])
    );
    Ok(())
}

#[test]
fn test_enumerate_symmetric_and_head_relative() -> Result<()> {
    let f = fixture()?;
    assert_eq!(
        enumerate(&f.source, "main...topic")?,
        strings(&[f.t4, f.t3, f.t2, f.t1, f.m2, f.m1])
    );
    // An empty side stands for HEAD, which is main
    assert_eq!(enumerate(&f.source, "topic..")?, strings(&[f.m2, f.m1]));
    Ok(())
}

/// root ── a1 ── x ── a2   (ta)
///     └─ b1 ── y ── b2   (tb)
///
/// x merges b1 into a1 and y merges a1 into b1, so ta and tb share two
/// merge bases.
#[test]
fn test_symmetric_difference_hides_every_merge_base() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = Repository::init(dir.path())?;

    let root = commit(&repo, &[("r.txt", "r\n")], &[], "Root", 0)?;
    let a1 = commit(&repo, &[("r.txt", "r\n"), ("a.txt", "a1\n")], &[root], "A1", 1)?;
    let b1 = commit(&repo, &[("r.txt", "r\n"), ("b.txt", "b1\n")], &[root], "B1", 2)?;
    let both = [("r.txt", "r\n"), ("a.txt", "a1\n"), ("b.txt", "b1\n")];
    let x = commit(&repo, &both, &[a1, b1], "Merge b1 into a1", 3)?;
    let y = commit(&repo, &both, &[b1, a1], "Merge a1 into b1", 4)?;
    let a2 = commit(
        &repo,
        &[("r.txt", "r\n"), ("a.txt", "a2\n"), ("b.txt", "b1\n")],
        &[x],
        "A2",
        5,
    )?;
    let b2 = commit(
        &repo,
        &[("r.txt", "r\n"), ("a.txt", "a1\n"), ("b.txt", "b2\n")],
        &[y],
        "B2",
        6,
    )?;
    repo.reference("refs/heads/ta", a2, true, "test")?;
    repo.reference("refs/heads/tb", b2, true, "test")?;

    let source = GitSource::from_repository(repo);
    assert_eq!(enumerate(&source, "ta...tb")?, strings(&[b2, a2]));
    assert_eq!(enumerate(&source, "tb...ta")?, strings(&[b2, a2]));
    drop(source);
    drop(dir);
    Ok(())
}

#[test]
fn test_enumerate_unknown_revision() -> Result<()> {
    let f = fixture()?;
    let err = f.source.enumerate("nope..main").err().expect("should fail");
    assert!(matches!(err, CoreError::Source { ref expression, .. } if expression == "nope..main"));

    let err = f.source.enumerate("^main").err().expect("should fail");
    assert!(matches!(err, CoreError::Source { .. }));
    Ok(())
}

// ── facts ────────────────────────────────────────────────────────────────────

#[test]
fn test_fingerprint_survives_cherry_pick() -> Result<()> {
    let f = fixture()?;
    let m2 = f.source.fingerprint_of(&f.m2.to_string())?;
    assert_eq!(f.source.fingerprint_of(&f.t1.to_string())?, m2);
    assert_ne!(f.source.fingerprint_of(&f.t2.to_string())?, m2);
    // Same title, different change
    assert_ne!(
        f.source.fingerprint_of(&f.t3.to_string())?,
        f.source.fingerprint_of(&f.m1.to_string())?
    );
    Ok(())
}

#[test]
fn test_title_files_and_signature() -> Result<()> {
    let f = fixture()?;
    let t1 = f.t1.to_string();
    assert_eq!(f.source.title_of(&t1)?, "Add two");
    assert_eq!(f.source.files_of(&t1)?, vec!["a.txt".to_string()]);
    assert_eq!(f.source.files_of(&f.t2.to_string())?, vec!["c.txt".to_string()]);

    let signature = f.source.signature_of(&t1)?;
    assert_eq!(signature.author_name, "Alice");
    assert_eq!(signature.committer_email, "alice@example.com");
    Ok(())
}

#[test]
fn test_empty_commit_detection() -> Result<()> {
    let f = fixture()?;
    assert!(f.source.is_empty_commit(&f.t4.to_string())?);
    assert!(!f.source.is_empty_commit(&f.t3.to_string())?);
    assert!(!f.source.is_empty_commit(&f.base.to_string())?);
    Ok(())
}

#[test]
fn test_resolve_helpers() -> Result<()> {
    let f = fixture()?;
    assert_eq!(f.source.resolve("main")?, f.m2.to_string());
    assert_eq!(f.source.merge_base("main", "topic")?, f.base.to_string());
    assert_eq!(f.source.range_head("base..topic")?, f.t4.to_string());
    assert!(f.source.range_head("topic..topic").is_err());
    // Unlike enumeration, the head of a range may be a merge
    assert_eq!(f.source.range_head("base..merged")?, f.merged.to_string());

    let short = f.source.shorten(&f.m2.to_string())?;
    assert!(f.m2.to_string().starts_with(&short));
    Ok(())
}

// ── end to end ───────────────────────────────────────────────────────────────

#[test]
fn test_topic_compared_with_main() -> Result<()> {
    let f = fixture()?;
    let specs = vec![
        RangeSpec::new("topic", "base..topic"),
        RangeSpec::new("main", "base..main"),
    ];
    let options = ComparisonOptions {
        display: DisplayRange::Range("topic".to_string()),
        progress_interval: Duration::ZERO,
        ..ComparisonOptions::default()
    };
    let mut cache = CommitCache::in_memory();
    let report = Comparison::new(&f.source, options).run(&specs, &mut cache)?;

    let upstream: Vec<_> = report
        .rows
        .iter()
        .map(|row| report.match_in(row, "main").cloned())
        .collect();
    assert_eq!(
        upstream,
        vec![
            Some(MatchResult::None),
            Some(MatchResult::Title(f.m1.to_string())),
            Some(MatchResult::None),
            Some(MatchResult::Fingerprint(f.m2.to_string())),
        ]
    );
    Ok(())
}
