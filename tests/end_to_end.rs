#![cfg(unix)]

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
  let mut cmd = Command::cargo_bin("git-test-impact").unwrap();
  // Keep runs hermetic on machines that have an engine configured.
  cmd.env_remove("GIT_TEST_IMPACT_ENGINE");
  cmd
}

#[test]
fn full_range_run_invokes_engine_and_reports() {
  let repo = common::fixture_repo();
  let hashes = common::hashes(repo.path());
  let engines = tempfile::TempDir::new().unwrap();
  let engine = common::write_stub_engine(engines.path(), "echo '# report' > report.md; exit 0");
  let repo_abs = std::fs::canonicalize(repo.path()).unwrap();

  bin()
    .args([
      "--repo",
      repo.path().to_str().unwrap(),
      "--engine",
      engine.to_str().unwrap(),
      "--from",
      hashes[0].as_str(),
      "--to",
      hashes[2].as_str(),
      "--no-open",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Report written to"));

  let args = std::fs::read_to_string(repo.path().join("engine-args.txt")).unwrap();
  let expected = format!(
    "--repo-path\n{}\n--output\nreport\n--from\n{}\n--to\n{}\n",
    repo_abs.display(),
    hashes[0],
    hashes[2],
  );
  assert_eq!(args, expected);
  assert!(repo.path().join("report.md").exists());
}

#[test]
fn from_only_omits_the_to_argument() {
  let repo = common::fixture_repo();
  let hashes = common::hashes(repo.path());
  let engines = tempfile::TempDir::new().unwrap();
  let engine = common::write_stub_engine(engines.path(), "echo '# report' > report.md; exit 0");

  bin()
    .args([
      "--repo",
      repo.path().to_str().unwrap(),
      "--engine",
      engine.to_str().unwrap(),
      "--from",
      hashes[0].as_str(),
      "--no-open",
    ])
    .assert()
    .success();

  let args = std::fs::read_to_string(repo.path().join("engine-args.txt")).unwrap();
  assert!(args.contains("--from"));
  assert!(!args.contains("--to"));
}

#[test]
fn nonzero_engine_exit_is_an_error() {
  let repo = common::fixture_repo();
  let hashes = common::hashes(repo.path());
  let engines = tempfile::TempDir::new().unwrap();
  let engine = common::write_stub_engine(engines.path(), "echo 'no api key' >&2; exit 3");

  bin()
    .args([
      "--repo",
      repo.path().to_str().unwrap(),
      "--engine",
      engine.to_str().unwrap(),
      "--from",
      hashes[0].as_str(),
      "--no-open",
    ])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Analysis failed"))
    .stderr(predicate::str::contains("status 3"))
    .stderr(predicate::str::contains("no api key"));
}

#[test]
fn stderr_with_zero_exit_warns_but_still_succeeds() {
  let repo = common::fixture_repo();
  let hashes = common::hashes(repo.path());
  let engines = tempfile::TempDir::new().unwrap();
  let engine = common::write_stub_engine(
    engines.path(),
    "echo 'deprecated flag' >&2; echo '# report' > report.md; exit 0",
  );

  bin()
    .args([
      "--repo",
      repo.path().to_str().unwrap(),
      "--engine",
      engine.to_str().unwrap(),
      "--from",
      hashes[0].as_str(),
      "--no-open",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Report written to"))
    .stderr(predicate::str::contains("warning:"))
    .stderr(predicate::str::contains("deprecated flag"));
}

#[test]
fn missing_report_after_success_only_warns() {
  let repo = common::fixture_repo();
  let hashes = common::hashes(repo.path());
  let engines = tempfile::TempDir::new().unwrap();
  let engine = common::write_stub_engine(engines.path(), "exit 0");

  bin()
    .args([
      "--repo",
      repo.path().to_str().unwrap(),
      "--engine",
      engine.to_str().unwrap(),
      "--from",
      hashes[0].as_str(),
      "--no-open",
    ])
    .assert()
    .success()
    .stderr(predicate::str::contains("expected report not found"));
}

#[test]
fn empty_repository_never_launches_the_engine() {
  let repo = tempfile::TempDir::new().unwrap();
  common::run_git(repo.path(), &["init", "-q", "-b", "main"]);
  let engines = tempfile::TempDir::new().unwrap();
  let engine = common::write_stub_engine(engines.path(), "exit 0");

  bin()
    .args([
      "--repo",
      repo.path().to_str().unwrap(),
      "--engine",
      engine.to_str().unwrap(),
      "--from",
      "HEAD",
    ])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("No commits found in this repository."));

  assert!(!repo.path().join("engine-args.txt").exists());
}

#[test]
fn non_repository_is_reported_before_anything_else() {
  let dir = tempfile::TempDir::new().unwrap();

  bin()
    .args(["--repo", dir.path().to_str().unwrap(), "--engine", "/opt/engine"])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("not a Git repository"));
}

#[test]
fn unconfigured_engine_fails_fast() {
  let repo = common::fixture_repo();

  bin()
    .args(["--repo", repo.path().to_str().unwrap()])
    .assert()
    .code(2)
    .stderr(predicate::str::contains("not configured"));
}

#[test]
fn missing_engine_binary_is_a_launch_failure() {
  let repo = common::fixture_repo();
  let hashes = common::hashes(repo.path());

  bin()
    .args([
      "--repo",
      repo.path().to_str().unwrap(),
      "--engine",
      "/definitely/not/an/engine",
      "--from",
      hashes[0].as_str(),
    ])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("failed to launch"));
}

#[test]
fn to_without_from_is_rejected_up_front() {
  let repo = common::fixture_repo();

  bin()
    .args(["--repo", repo.path().to_str().unwrap(), "--engine", "/opt/engine", "--to", "HEAD"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--to requires --from"));
}

#[test]
fn prompting_without_a_terminal_explains_the_flags() {
  let repo = common::fixture_repo();

  bin()
    .args(["--repo", repo.path().to_str().unwrap(), "--engine", "/opt/engine"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("interactive selection needs a terminal"));
}

#[test]
fn gen_man_emits_troff() {
  bin()
    .arg("--gen-man")
    .assert()
    .success()
    .stdout(predicate::str::contains(".TH"))
    .stdout(predicate::str::contains("git-test-impact"));
}
