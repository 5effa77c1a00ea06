use anyhow::Result;
use clap::Parser;

mod cli;
mod engine;
mod gitio;
mod model;
mod picker;
mod settings;
mod ui;
mod util;
mod workflow;

use crate::cli::Cli;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI and settings file into one effective config
  let cfg = cli::normalize(cli)?;

  // Phase 2: run the selection-and-analysis workflow
  let ui = ui::TerminalUi::new(cfg.auto_open);
  let outcome = workflow::run(&cfg, &ui, &engine::SubprocessRunner)?;

  // Messages were already surfaced stage by stage; only the code remains.
  match outcome.exit_code() {
    0 => Ok(()),
    code => std::process::exit(code),
  }
}
