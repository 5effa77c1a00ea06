//! Read-only repo-local settings (`.git-test-impact.toml`).
//!
//! The file is optional; a missing file means "nothing configured". Lookup
//! layering (flag > env > file) happens in `cli::normalize`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = ".git-test-impact.toml";
pub const ENGINE_ENV: &str = "GIT_TEST_IMPACT_ENGINE";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
  /// Path to the analysis engine executable.
  pub engine_path: Option<String>,
  /// Report name, without extension.
  pub output: Option<String>,
  /// Open the report with the system viewer after a successful run.
  pub open: Option<bool>,
}

pub fn load(repo: &Path) -> Result<Settings> {
  let path = repo.join(SETTINGS_FILE);
  if !path.exists() {
    return Ok(Settings::default());
  }
  let text =
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
  toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
