use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::settings;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "git-test-impact",
    version,
    about = "Pick a commit range and run a test-impact analysis engine over it",
    long_about = None
)]
pub struct Cli {
  /// Path to a Git repository (default: current dir)
  #[arg(long, default_value = ".")]
  pub repo: PathBuf,

  /// Analysis engine executable (overrides GIT_TEST_IMPACT_ENGINE and the settings file)
  #[arg(long)]
  pub engine: Option<String>,

  /// Report name, without extension
  #[arg(long)]
  pub output: Option<String>,

  /// Older bound of the range; skips the FROM prompt
  #[arg(long)]
  pub from: Option<String>,

  /// Newer bound of the range; requires --from and skips the TO prompt
  #[arg(long)]
  pub to: Option<String>,

  /// Print the engine invocation as JSON and exit without launching it
  #[arg(long)]
  pub dry_run: bool,

  /// Print the report path instead of opening the report
  #[arg(long)]
  pub no_open: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub repo: PathBuf, // absolute path for stability
  pub engine: Option<String>,
  pub output: String,
  pub from: Option<String>,
  pub to: Option<String>,
  pub dry_run: bool,
  pub auto_open: bool,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Selection happens FROM-first, so an upper bound can never exist alone.
  if cli.to.is_some() && cli.from.is_none() {
    bail!("--to requires --from");
  }

  let repo = PathBuf::from(util::canonicalize_lossy(&cli.repo));
  let file = settings::load(&repo)?;

  let engine = non_empty(cli.engine)
    .or_else(|| non_empty(std::env::var(settings::ENGINE_ENV).ok()))
    .or_else(|| non_empty(file.engine_path));
  let output = non_empty(cli.output)
    .or_else(|| non_empty(file.output))
    .unwrap_or_else(|| "report".to_string());
  let auto_open = !cli.no_open && file.open.unwrap_or(true);

  Ok(EffectiveConfig {
    repo,
    engine,
    output,
    from: cli.from,
    to: cli.to,
    dry_run: cli.dry_run,
    auto_open,
  })
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base_cli() -> Cli {
    Cli {
      repo: PathBuf::from("."),
      engine: None,
      output: None,
      from: None,
      to: None,
      dry_run: false,
      no_open: false,
      gen_man: false,
    }
  }

  #[test]
  fn to_without_from_is_rejected() {
    let mut cli = base_cli();
    cli.to = Some("HEAD".into());
    let err = normalize(cli).unwrap_err();
    assert!(err.to_string().contains("--to requires --from"));
  }

  #[test]
  fn repo_is_canonicalized() {
    let cfg = normalize(base_cli()).unwrap();
    assert!(cfg.repo.is_absolute());
  }

  #[test]
  fn output_defaults_to_report() {
    let cfg = normalize(base_cli()).unwrap();
    assert_eq!(cfg.output, "report");
  }

  #[test]
  fn engine_flag_beats_settings_file() {
    let td = tempfile::TempDir::new().unwrap();
    std::fs::write(
      td.path().join(settings::SETTINGS_FILE),
      "engine-path = \"/from/file\"\n",
    )
    .unwrap();
    let mut cli = base_cli();
    cli.repo = td.path().to_path_buf();
    cli.engine = Some("/from/flag".into());
    let cfg = normalize(cli).unwrap();
    assert_eq!(cfg.engine.as_deref(), Some("/from/flag"));
  }

  #[test]
  fn settings_file_fills_in_engine_and_output() {
    let td = tempfile::TempDir::new().unwrap();
    std::fs::write(
      td.path().join(settings::SETTINGS_FILE),
      "engine-path = \"/from/file\"\noutput = \"impact\"\nopen = false\n",
    )
    .unwrap();
    let mut cli = base_cli();
    cli.repo = td.path().to_path_buf();
    let cfg = normalize(cli).unwrap();
    assert_eq!(cfg.engine.as_deref(), Some("/from/file"));
    assert_eq!(cfg.output, "impact");
    assert!(!cfg.auto_open);
  }

  #[test]
  fn blank_engine_counts_as_unconfigured() {
    let mut cli = base_cli();
    cli.engine = Some("   ".into());
    let cfg = normalize(cli).unwrap();
    // May still be filled from the environment on a configured machine.
    if std::env::var(settings::ENGINE_ENV).is_err() {
      assert!(cfg.engine.is_none());
    }
  }
}
