// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one analysis pass: history read, range selection, engine invocation, outcome presentation
// role: processing/orchestrator
// inputs: EffectiveConfig; UserInteraction and EngineRunner implementations
// outputs: Exactly one WorkflowOutcome; one user-facing notification per failure/cancellation
// side_effects: Launches the engine child process (unless --dry-run); opens the report on success
// invariants:
// - stages run strictly in order: repo check, log, FROM, TO, build, run; each can short-circuit
// - cancellation at either prompt launches nothing and reports exactly one informational message
// - to_commit is only ever set when from_commit is (fixed selection order)
// - a zero-exit run with stderr warns but still opens the report
// errors: Converted at origin into one notification of the right severity; nothing propagates uncaught
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;

use crate::cli::EffectiveConfig;
use crate::engine::{EngineInvocation, EngineRunner};
use crate::gitio::{self, GitError};
use crate::model::{AnalysisRequest, CommitRecord, RunOutcome};
use crate::settings;
use crate::ui::{PickItem, UserInteraction};
use crate::util;

/// Terminal state of one workflow pass; decides the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
  Completed,
  Cancelled,
  EngineFailed,
  SetupFailed,
}

impl WorkflowOutcome {
  pub fn exit_code(self) -> i32 {
    match self {
      WorkflowOutcome::Completed | WorkflowOutcome::Cancelled => 0,
      WorkflowOutcome::EngineFailed => 1,
      WorkflowOutcome::SetupFailed => 2,
    }
  }
}

enum RangeSelection {
  Chosen { from: String, to: Option<String> },
  Cancelled,
}

pub fn run(
  cfg: &EffectiveConfig,
  ui: &dyn UserInteraction,
  runner: &dyn EngineRunner,
) -> Result<WorkflowOutcome> {
  // Fail fast on configuration before touching the repository.
  let Some(engine_path) = cfg.engine.as_deref() else {
    ui.error(&format!(
      "Analysis engine path is not configured. Pass --engine, set {}, or put engine-path in {}.",
      settings::ENGINE_ENV,
      settings::SETTINGS_FILE,
    ));
    return Ok(WorkflowOutcome::SetupFailed);
  };

  // A non-repository and a repository with no commits read differently to the
  // user; keep the two messages apart.
  let records = match gitio::read_log(&cfg.repo) {
    Ok(records) => records,
    Err(GitError::NotARepository) => {
      ui.error("The target folder is not a Git repository.");
      return Ok(WorkflowOutcome::SetupFailed);
    }
    Err(GitError::EmptyHistory) => {
      ui.error("No commits found in this repository.");
      return Ok(WorkflowOutcome::SetupFailed);
    }
    Err(err) => {
      ui.error(&format!("Failed to read Git history: {err}"));
      return Ok(WorkflowOutcome::SetupFailed);
    }
  };

  let (from, to) = if let Some(from_flag) = &cfg.from {
    // Range given up front; verify against the repository instead of prompting.
    let from = match gitio::verify_commit(&cfg.repo, from_flag) {
      Ok(hash) => hash,
      Err(err) => {
        ui.error(&format!("Invalid --from revision: {err}"));
        return Ok(WorkflowOutcome::SetupFailed);
      }
    };
    let to = match &cfg.to {
      Some(to_flag) => match gitio::verify_commit(&cfg.repo, to_flag) {
        Ok(hash) => Some(hash),
        Err(err) => {
          ui.error(&format!("Invalid --to revision: {err}"));
          return Ok(WorkflowOutcome::SetupFailed);
        }
      },
      None => None,
    };
    (from, to)
  } else {
    match prompt_range(ui, &records)? {
      RangeSelection::Chosen { from, to } => (from, to),
      RangeSelection::Cancelled => {
        // User-initiated, so informational rather than an error.
        ui.info("Analysis cancelled.");
        return Ok(WorkflowOutcome::Cancelled);
      }
    }
  };

  let request = AnalysisRequest {
    repo_path: cfg.repo.to_string_lossy().to_string(),
    output_name: cfg.output.clone(),
    from_commit: Some(from),
    to_commit: to,
  };
  let invocation = EngineInvocation::build(&request, engine_path);
  tracing::info!(command = %invocation.command_line(), "analysis engine invocation");

  if cfg.dry_run {
    println!("{}", serde_json::to_string_pretty(&invocation)?);
    return Ok(WorkflowOutcome::Completed);
  }

  let outcome =
    ui.with_progress("Analyzing unit tests...", &mut |cancel| Ok(runner.run(&invocation, cancel)))?;
  present_outcome(cfg, ui, &request, outcome)
}

/// Two sequential single-select prompts, FROM then TO; no back-navigation.
fn prompt_range(ui: &dyn UserInteraction, records: &[CommitRecord]) -> Result<RangeSelection> {
  let items: Vec<PickItem> = records.iter().map(choice_item).collect();

  let Some(ix) =
    ui.pick_one("Select Start Commit", "Select the FROM commit (the older one)", &items)?
  else {
    return Ok(RangeSelection::Cancelled);
  };
  let from = records[ix].hash.clone();

  // Same list again with an explicit "no upper bound" row on top: choosing it
  // resolves to HEAD, while dismissing the prompt still cancels the whole run.
  let mut to_items = Vec::with_capacity(items.len() + 1);
  to_items.push(PickItem {
    label: "HEAD".to_string(),
    description: "no upper bound".to_string(),
    detail: "Analyze up to the latest revision".to_string(),
  });
  to_items.extend(items);

  let Some(ix) =
    ui.pick_one("Select End Commit", "Select the TO commit (the newer one, or HEAD)", &to_items)?
  else {
    return Ok(RangeSelection::Cancelled);
  };
  let to = if ix == 0 { None } else { Some(records[ix - 1].hash.clone()) };
  Ok(RangeSelection::Chosen { from, to })
}

fn choice_item(record: &CommitRecord) -> PickItem {
  let description = if record.refs.is_empty() {
    record.short_hash.clone()
  } else {
    format!("{}  [{}]", record.short_hash, record.refs.join(", "))
  };
  PickItem {
    label: record.subject.clone(),
    description,
    detail: format!("{} on {}", record.author_name, util::display_date(&record.author_date)),
  }
}

fn present_outcome(
  cfg: &EffectiveConfig,
  ui: &dyn UserInteraction,
  request: &AnalysisRequest,
  outcome: RunOutcome,
) -> Result<WorkflowOutcome> {
  match outcome {
    RunOutcome::Success { stdout, stderr } => {
      // Engine stdout is diagnostic-only.
      if !stdout.trim().is_empty() {
        tracing::debug!(stdout = %stdout.trim(), "engine stdout");
      }
      if !stderr.trim().is_empty() {
        ui.warning(&format!("Analysis engine reported: {}", stderr.trim()));
      }
      let report = cfg.repo.join(format!("{}.md", request.output_name));
      ui.open_document(&report)?;
      Ok(WorkflowOutcome::Completed)
    }
    RunOutcome::Failure { message } => {
      ui.error(&format!("Analysis failed: {message}"));
      Ok(WorkflowOutcome::EngineFailed)
    }
    RunOutcome::Cancelled => {
      ui.warning("Analysis cancelled.");
      Ok(WorkflowOutcome::Cancelled)
    }
  }
}
