use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::model::CommitRecord;

// Field and record separators for the log pretty-format; subjects can contain
// anything printable, so stick to control characters git will never emit.
const FIELD_SEP: char = '\u{0}';
const RECORD_SEP: char = '\u{1e}';

const LOG_FORMAT: &str = "%H%x00%h%x00%an%x00%ad%x00%D%x00%s%x1e";

/// Failure modes of the git boundary. `NotARepository` and `EmptyHistory` are
/// distinct on purpose: reading history of a non-repository is a different,
/// more confusing situation than a repository with no commits yet.
#[derive(Debug, Error)]
pub enum GitError {
  #[error("not a Git repository")]
  NotARepository,
  #[error("no commits found")]
  EmptyHistory,
  #[error("git executable not found on PATH")]
  GitNotFound,
  #[error("unknown revision: {rev}")]
  UnknownRevision { rev: String },
  #[error("git {args:?} failed: {stderr}")]
  CommandFailed { args: Vec<String>, stderr: String },
  #[error("failed to run git: {0}")]
  Io(std::io::Error),
}

pub fn run_git(repo: &Path, args: &[&str]) -> Result<String, GitError> {
  let out = Command::new("git")
    .args(args)
    .current_dir(repo)
    .output()
    .map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        GitError::GitNotFound
      } else {
        GitError::Io(e)
      }
    })?;

  if out.status.success() {
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
  } else {
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
    Err(GitError::CommandFailed {
      args: args.iter().map(|s| s.to_string()).collect(),
      stderr,
    })
  }
}

/// Explicit repository check, run before any history query.
pub fn is_repository(repo: &Path) -> Result<bool, GitError> {
  if !repo.is_dir() {
    return Ok(false);
  }
  match run_git(repo, &["rev-parse", "--is-inside-work-tree"]) {
    Ok(out) => Ok(out.trim() == "true"),
    Err(GitError::CommandFailed { .. }) => Ok(false),
    Err(err) => Err(err),
  }
}

/// Full decorated commit log of the current branch, newest first.
///
/// The repository check runs first: asking for history outside a repository
/// fails with `NotARepository`, never with a log error.
pub fn read_log(repo: &Path) -> Result<Vec<CommitRecord>, GitError> {
  if !is_repository(repo)? {
    return Err(GitError::NotARepository);
  }

  let pretty = format!("--pretty=format:{LOG_FORMAT}");
  let args = [
    "-c",
    "log.showSignature=false",
    "log",
    "--date=iso-strict",
    pretty.as_str(),
  ];
  let out = match run_git(repo, &args) {
    Ok(out) => out,
    // A valid repository with an unborn branch makes `git log` fail; that is
    // EmptyHistory, not a read error.
    Err(GitError::CommandFailed { stderr, .. }) if stderr.contains("does not have any commits") => {
      return Err(GitError::EmptyHistory);
    }
    Err(err) => return Err(err),
  };

  let records = parse_log(&out);
  if records.is_empty() {
    return Err(GitError::EmptyHistory);
  }
  Ok(records)
}

/// Resolve a user-supplied revision to a full commit hash.
pub fn verify_commit(repo: &Path, rev: &str) -> Result<String, GitError> {
  let spec = format!("{rev}^{{commit}}");
  match run_git(repo, &["rev-parse", "--verify", "--quiet", spec.as_str()]) {
    Ok(out) => Ok(out.trim().to_string()),
    Err(GitError::CommandFailed { .. }) => Err(GitError::UnknownRevision { rev: rev.to_string() }),
    Err(err) => Err(err),
  }
}

fn parse_log(out: &str) -> Vec<CommitRecord> {
  out
    .split(RECORD_SEP)
    .filter_map(|chunk| {
      let chunk = chunk.trim_matches(|c| c == '\n' || c == '\r');
      if chunk.is_empty() {
        return None;
      }
      let parts: Vec<&str> = chunk.split(FIELD_SEP).collect();
      let get = |i: usize| -> String { parts.get(i).unwrap_or(&"").to_string() };
      let hash = get(0);
      if hash.is_empty() {
        return None;
      }
      Some(CommitRecord {
        hash,
        short_hash: get(1),
        author_name: get(2),
        author_date: get(3),
        refs: parse_refs(&get(4)),
        subject: get(5),
      })
    })
    .collect()
}

fn parse_refs(decorations: &str) -> Vec<String> {
  decorations
    .split(", ")
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| s.to_string())
    .collect()
}
