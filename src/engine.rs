// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build the engine invocation from an AnalysisRequest and run it as a supervised child process
// role: invocation/runner
// inputs: AnalysisRequest + engine executable path; CancelToken
// outputs: EngineInvocation (argv, never a shell string); exactly one RunOutcome per run
// side_effects: Spawns the engine child process rooted at the repository path
// invariants:
// - --repo-path and --output are always passed; --from/--to appear iff present on the request
// - cancellation stops the wait loop immediately; killing the child is best-effort and never blocks
// errors: Launch/wait failures become RunOutcome::Failure with the underlying error text
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::model::{AnalysisRequest, RunOutcome};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared cancellation flag handed to the runner; flipped by Ctrl-C (or a test).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
  flag: Arc<AtomicBool>,
}

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.flag.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.flag.load(Ordering::SeqCst)
  }

  /// The underlying flag, for wiring up signal handlers.
  pub fn shared_flag(&self) -> Arc<AtomicBool> {
    self.flag.clone()
  }
}

/// The concrete command line for one analysis run. Ephemeral; printed as JSON
/// by `--dry-run`, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInvocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: String,
}

impl EngineInvocation {
  /// Pure construction; the caller guarantees `engine_path` is configured and
  /// the request honors the to-implies-from invariant.
  pub fn build(request: &AnalysisRequest, engine_path: &str) -> Self {
    let mut args: Vec<String> = vec![
      "--repo-path".into(),
      request.repo_path.clone(),
      "--output".into(),
      request.output_name.clone(),
    ];
    if let Some(from) = &request.from_commit {
      args.push("--from".into());
      args.push(from.clone());
    }
    if let Some(to) = &request.to_commit {
      args.push("--to".into());
      args.push(to.clone());
    }
    Self {
      program: engine_path.to_string(),
      args,
      cwd: request.repo_path.clone(),
    }
  }

  /// Shell-quoted rendition for logs. Arguments are always passed as an argv
  /// vector; this string is display-only.
  pub fn command_line(&self) -> String {
    let mut parts: Vec<&str> = vec![self.program.as_str()];
    parts.extend(self.args.iter().map(String::as_str));
    shell_words::join(parts)
  }
}

pub trait EngineRunner {
  fn run(&self, invocation: &EngineInvocation, cancel: &CancelToken) -> RunOutcome;
}

/// Runs the engine as a real child process, polling for exit so cancellation
/// can interrupt the wait.
pub struct SubprocessRunner;

impl EngineRunner for SubprocessRunner {
  fn run(&self, invocation: &EngineInvocation, cancel: &CancelToken) -> RunOutcome {
    let mut child = match Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
    {
      Ok(child) => child,
      Err(err) => {
        return RunOutcome::Failure {
          message: format!("failed to launch analysis engine `{}`: {err}", invocation.program),
        };
      }
    };

    // Drain both pipes off-thread so a chatty engine cannot fill a pipe and
    // deadlock against the wait loop.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = loop {
      if cancel.is_cancelled() {
        // Stop waiting and report cancellation; the kill is fire-and-forget,
        // so the engine may still run to completion in the background.
        let _ = child.kill();
        return RunOutcome::Cancelled;
      }
      match child.try_wait() {
        Ok(Some(status)) => break status,
        Ok(None) => thread::sleep(POLL_INTERVAL),
        Err(err) => {
          return RunOutcome::Failure {
            message: format!("failed waiting for analysis engine: {err}"),
          };
        }
      }
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();

    if status.success() {
      RunOutcome::Success { stdout, stderr }
    } else {
      let code = status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
      let mut message = format!("analysis engine exited with status {code}");
      if !stderr.trim().is_empty() {
        message.push_str(": ");
        message.push_str(stderr.trim());
      }
      RunOutcome::Failure { message }
    }
  }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
  thread::spawn(move || {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
      let _ = pipe.read_to_string(&mut buf);
    }
    buf
  })
}
