//! User interaction boundary.
//!
//! The workflow talks to the host surface only through `UserInteraction`, so
//! the whole state machine runs against a recording mock in tests.

use std::io::IsTerminal;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::engine::CancelToken;
use crate::model::RunOutcome;
use crate::picker;

/// One selectable row: label is the commit subject, description the short hash
/// plus decorations, detail the author and date of the highlighted row.
#[derive(Debug, Clone)]
pub struct PickItem {
  pub label: String,
  pub description: String,
  pub detail: String,
}

pub trait UserInteraction {
  fn info(&self, message: &str);
  fn warning(&self, message: &str);
  fn error(&self, message: &str);

  /// Single-select prompt over `items`; `Ok(None)` means the user dismissed it.
  fn pick_one(&self, title: &str, placeholder: &str, items: &[PickItem]) -> Result<Option<usize>>;

  /// Run `body` under a cancellable, indeterminate progress indication. The
  /// token passed to `body` flips when the user requests cancellation.
  fn with_progress(
    &self,
    title: &str,
    body: &mut dyn FnMut(&CancelToken) -> Result<RunOutcome>,
  ) -> Result<RunOutcome>;

  /// Surface the produced report document.
  fn open_document(&self, path: &Path) -> Result<()>;
}

pub struct TerminalUi {
  auto_open: bool,
}

impl TerminalUi {
  pub fn new(auto_open: bool) -> Self {
    Self { auto_open }
  }
}

impl UserInteraction for TerminalUi {
  fn info(&self, message: &str) {
    println!("{message}");
  }

  fn warning(&self, message: &str) {
    eprintln!("warning: {message}");
  }

  fn error(&self, message: &str) {
    eprintln!("error: {message}");
  }

  fn pick_one(&self, title: &str, placeholder: &str, items: &[PickItem]) -> Result<Option<usize>> {
    if !std::io::stdout().is_terminal() {
      bail!("interactive selection needs a terminal; pass --from/--to to pick the range up front");
    }
    picker::select(title, placeholder, items)
  }

  fn with_progress(
    &self,
    title: &str,
    body: &mut dyn FnMut(&CancelToken) -> Result<RunOutcome>,
  ) -> Result<RunOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(title.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let cancel = CancelToken::new();
    #[cfg(unix)]
    let sig = signal_hook::flag::register(signal_hook::consts::SIGINT, cancel.shared_flag())
      .context("registering Ctrl-C handler")?;

    let result = body(&cancel);

    #[cfg(unix)]
    signal_hook::low_level::unregister(sig);
    spinner.finish_and_clear();
    result
  }

  fn open_document(&self, path: &Path) -> Result<()> {
    if !path.exists() {
      self.warning(&format!("expected report not found at {}", path.display()));
      return Ok(());
    }
    self.info(&format!("Report written to {}", path.display()));
    if self.auto_open {
      open_with_system_viewer(path);
    }
    Ok(())
  }
}

/// Best-effort hand-off to the platform opener; a missing opener only logs.
fn open_with_system_viewer(path: &Path) {
  #[cfg(target_os = "macos")]
  let opener = "open";
  #[cfg(all(unix, not(target_os = "macos")))]
  let opener = "xdg-open";
  #[cfg(windows)]
  let opener = "explorer";

  if let Err(err) = Command::new(opener)
    .arg(path)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
  {
    tracing::debug!(%err, "could not launch a viewer for the report");
  }
}
