//! CLI run entrypoint: wire flags into a workflow run and persist the log.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use agentflow_engine::{RunLogWriter, WorkflowOptions, run_workflow};
use agentflow_llm::{OpenAiBackend, SamplingParams};
use agentflow_utils::logging::init_tracing;

use super::args::Cli;

/// Execute one pipeline run from parsed arguments.
///
/// Backend misconfiguration (a missing API key) surfaces here, before any
/// model call is made.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    // A second init in the same process is harmless.
    let _ = init_tracing(cli.verbose);

    let defaults = WorkflowOptions::default();
    let options = WorkflowOptions {
        model: cli.model.unwrap_or(defaults.model),
        temperature: cli.temperature.unwrap_or(defaults.temperature),
        seed: cli.seed,
        max_tokens_per_call: cli.max_tokens,
        stage_timeout: cli
            .stage_timeout
            .map_or(defaults.stage_timeout, Duration::from_secs),
    };

    let backend = OpenAiBackend::from_env(SamplingParams {
        temperature: options.temperature,
        seed: options.seed,
        max_tokens: options.max_tokens_per_call,
    })
    .context("failed to configure the LLM backend")?;

    let runlog = run_workflow(Arc::new(backend), &cli.prompt, &options)
        .await
        .context("pipeline run failed")?;

    let path = RunLogWriter::new(&cli.out_dir)
        .write(&runlog)
        .context("failed to persist the run log")?;

    info!(
        run_id = %runlog.config.run_id,
        winner = %runlog.final_decision.winner_draft_id,
        "run complete"
    );
    println!("winner: {}", runlog.final_decision.winner_draft_id);
    println!("run log: {path}");
    Ok(())
}
