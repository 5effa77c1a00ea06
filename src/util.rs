// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, author-date formatting, and man page rendering
// role: utilities/helpers
// inputs: Paths; ISO-strict date strings; clap CommandFactory
// outputs: Canonicalized paths, display-formatted dates, man page text
// invariants: canonicalize_lossy always returns something usable as a path, even for missing files
// errors: render_man_page bubbles IO errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use clap::CommandFactory;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

/// Formats an ISO-strict author date for the selection list, e.g. "2025-08-12 14:03".
/// Falls back to the raw string when git hands us something unparseable.
pub fn display_date(iso: &str) -> String {
  match chrono::DateTime::parse_from_rfc3339(iso) {
    Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
    Err(_) => iso.to_string(),
  }
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
