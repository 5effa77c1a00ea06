// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the data model shared by history reading, range selection, and engine invocation
// role: model/types
// outputs: CommitRecord (one per log entry, newest first), AnalysisRequest, RunOutcome
// invariants: AnalysisRequest never carries to_commit without from_commit; records are read-only after parse
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

/// One entry of the decorated commit log, newest first.
///
/// `author_date` keeps the raw ISO-strict string from git; display formatting
/// happens at the presentation edge (`util::display_date`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
  pub hash: String,
  pub short_hash: String,
  pub subject: String,
  pub author_name: String,
  pub author_date: String,
  /// Decoration labels (branch/tag names) pointing at this commit; may be empty.
  pub refs: Vec<String>,
}

/// Everything the engine needs for one analysis run.
///
/// Built once per invocation after range selection completes; never persisted.
/// Selection order is fixed (FROM before TO), so `to_commit` is only ever set
/// when `from_commit` is.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
  pub repo_path: String,
  pub output_name: String,
  pub from_commit: Option<String>,
  pub to_commit: Option<String>,
}

/// Terminal result of a single engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
  /// Zero exit status. `stderr` may still be non-empty; that is surfaced as a
  /// warning, not a failure.
  Success { stdout: String, stderr: String },
  /// Non-zero exit status or failure to launch; `message` includes the
  /// underlying error text.
  Failure { message: String },
  /// Cancellation was requested while the engine ran. The child process may
  /// still finish in the background (kill is best-effort).
  Cancelled,
}
