//! CLI argument definitions.

use camino::Utf8PathBuf;
use clap::Parser;

/// agentflow - multi-persona drafting pipeline over a chat-completion endpoint
#[derive(Parser, Debug)]
#[command(name = "agentflow")]
#[command(about = "Run a prompt through a fixed draft/evaluate/revise/judge pipeline")]
#[command(long_about = r#"
agentflow takes one prompt through a fixed eight-stage pipeline: the task is
normalized, four worker personas draft independent solutions, the drafts are
fact-checked and rubric-scored, a synthesizer produces a shared edit plan,
every worker revises its own draft against the plan, and a final judge picks
the winning revision. The full audit trail of the run is written to
runs/run_<run_id>.json.

EXAMPLES:
  # Run a prompt with the defaults
  agentflow "Design a rate limiter for a public API"

  # Pin the model and sampling parameters
  agentflow "Design a rate limiter" --model gpt-5.1 --temperature 0.2 --seed 42

  # Write run logs somewhere else
  agentflow "Design a rate limiter" --out-dir /tmp/agentflow-runs

CONFIGURATION:
  OPENAI_API_KEY   required; bearer token for the chat-completion endpoint
  OPENAI_BASE_URL  optional; overrides the default https://api.openai.com/v1
"#)]
#[command(version)]
pub struct Cli {
    /// The task prompt to run through the pipeline
    pub prompt: String,

    /// Model identifier sent with every call
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Sampling seed, for providers that support it
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cap on completion tokens per call
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Directory for run logs
    #[arg(long, default_value = "runs")]
    pub out_dir: Utf8PathBuf,

    /// Per-stage timeout in seconds
    #[arg(long)]
    pub stage_timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
