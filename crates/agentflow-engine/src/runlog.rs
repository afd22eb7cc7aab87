//! Run-log persistence.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use agentflow_model::RunLog;
use agentflow_utils::atomic_write::write_file_atomic;
use agentflow_utils::error::AgentFlowError;

/// Writes run logs under a fixed output directory.
pub struct RunLogWriter {
    out_dir: Utf8PathBuf,
}

impl RunLogWriter {
    #[must_use]
    pub fn new(out_dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_owned(),
        }
    }

    /// Serialize the run log as pretty JSON and write it atomically to
    /// `{out_dir}/run_{run_id}.json`, returning the path.
    ///
    /// The content is fully built in memory and renamed into place in one
    /// step, so a failed write never leaves a truncated file.
    ///
    /// # Errors
    ///
    /// Returns [`AgentFlowError::RunLogWrite`] if serialization or the
    /// filesystem write fails.
    pub fn write(&self, runlog: &RunLog) -> Result<Utf8PathBuf, AgentFlowError> {
        let path = self
            .out_dir
            .join(format!("run_{}.json", runlog.config.run_id));

        let json = serde_json::to_string_pretty(runlog).map_err(|e| {
            AgentFlowError::RunLogWrite {
                path: path.to_string(),
                reason: e.to_string(),
            }
        })?;

        write_file_atomic(&path, &json).map_err(|e| AgentFlowError::RunLogWrite {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        info!(path = %path, "run log written");
        Ok(path)
    }
}
