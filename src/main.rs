//! agentflow CLI binary.
//!
//! The entrypoint is deliberately thin; all logic lives in the library and
//! `cli::run()` handles output. main only maps the result to the process
//! exit status.

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = agentflow::cli::Cli::parse();
    agentflow::cli::run(cli).await
}
