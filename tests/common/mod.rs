use std::path::{Path, PathBuf};
use std::process::Command;

#[allow(dead_code)]
pub fn run_git(repo: &Path, args: &[&str]) {
  let status = Command::new("git").args(args).current_dir(repo).status().unwrap();
  assert!(status.success(), "git {args:?} failed");
}

#[allow(dead_code)]
fn commit(repo: &Path, message: &str, date: &str) {
  std::fs::write(repo.join("file.txt"), message).unwrap();
  run_git(repo, &["add", "."]);

  let env = [
    ("GIT_AUTHOR_DATE", date),
    ("GIT_COMMITTER_DATE", date),
    ("GIT_AUTHOR_NAME", "Fixture Bot"),
    ("GIT_AUTHOR_EMAIL", "fixture@example.com"),
    ("GIT_COMMITTER_NAME", "Fixture Bot"),
    ("GIT_COMMITTER_EMAIL", "fixture@example.com"),
  ];

  let status = Command::new("git")
    .args(["commit", "-q", "-m", message])
    .current_dir(repo)
    .envs(env.iter().cloned())
    .status()
    .unwrap();

  assert!(status.success());
}

/// Fixture repo with commits c1, c2, c3 (oldest to newest) and a tag on c2.
#[allow(dead_code)]
pub fn fixture_repo() -> tempfile::TempDir {
  let dir = tempfile::TempDir::new().unwrap();

  run_git(dir.path(), &["init", "-q", "-b", "main"]);
  run_git(dir.path(), &["config", "user.name", "Fixture Bot"]);
  run_git(dir.path(), &["config", "user.email", "fixture@example.com"]);
  run_git(dir.path(), &["config", "commit.gpgsign", "false"]);

  commit(dir.path(), "feat: first", "2025-08-12T14:03:00");
  commit(dir.path(), "fix: second", "2025-08-13T09:12:00");
  run_git(dir.path(), &["tag", "v0.1.0"]);
  commit(dir.path(), "feat: third", "2025-08-14T10:00:00");

  dir
}

/// Full commit hashes, oldest first: [c1, c2, c3].
#[allow(dead_code)]
pub fn hashes(repo: &Path) -> Vec<String> {
  let out = Command::new("git")
    .args(["log", "--reverse", "--pretty=format:%H"])
    .current_dir(repo)
    .output()
    .unwrap();
  String::from_utf8_lossy(&out.stdout)
    .lines()
    .map(|l| l.trim().to_string())
    .filter(|l| !l.is_empty())
    .collect()
}

/// Write an executable stub engine into `dir` and return its path. The stub
/// records its argv (one per line) to engine-args.txt in its working
/// directory, then runs `script_body`.
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_stub_engine(dir: &Path, script_body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join("stub-engine.sh");
  let script = format!("#!/bin/sh\nprintf '%s\\n' \"$@\" > engine-args.txt\n{script_body}\n");
  std::fs::write(&path, script).unwrap();

  let mut perms = std::fs::metadata(&path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(&path, perms).unwrap();

  path
}
