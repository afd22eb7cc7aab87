//! Run configuration defaults: workers, evaluators, run ids, options.

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use agentflow_model::{EvaluatorConfig, RunId, WorkerConfig};
use agentflow_prompts::worker_persona;

/// Default stage timeout in seconds.
const DEFAULT_STAGE_TIMEOUT_SECS: u64 = 600;

/// Generate a run id: UTC timestamp plus a short random suffix.
#[must_use]
pub fn now_run_id() -> RunId {
    let ts = Utc::now().format("%Y%m%dT%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{ts}_{}", &suffix[..6])
}

/// The four default worker personas.
#[must_use]
pub fn default_workers() -> Vec<WorkerConfig> {
    [
        ("WorkerA", "Architect"),
        ("WorkerB", "Pragmatist"),
        ("WorkerC", "Skeptic"),
        ("WorkerD", "Communicator"),
    ]
    .into_iter()
    .map(|(id, display_name)| WorkerConfig {
        id: id.to_string(),
        display_name: display_name.to_string(),
        persona: worker_persona(id).to_string(),
    })
    .collect()
}

pub(crate) fn fact_checker() -> EvaluatorConfig {
    EvaluatorConfig {
        id: "Eval1".to_string(),
        role: "FactChecker".to_string(),
    }
}

pub(crate) fn rubric_scorer() -> EvaluatorConfig {
    EvaluatorConfig {
        id: "Eval2".to_string(),
        role: "RubricScorer".to_string(),
    }
}

pub(crate) fn synthesizer() -> EvaluatorConfig {
    EvaluatorConfig {
        id: "Eval3".to_string(),
        role: "Synthesizer".to_string(),
    }
}

pub(crate) fn final_judge() -> EvaluatorConfig {
    EvaluatorConfig {
        id: "FinalJudge".to_string(),
        role: "Final selection judge".to_string(),
    }
}

/// The four default evaluator roles.
#[must_use]
pub fn default_evaluators() -> Vec<EvaluatorConfig> {
    vec![fact_checker(), rubric_scorer(), synthesizer(), final_judge()]
}

/// Knobs for one workflow run.
///
/// Sampling parameters mirror [`agentflow_model::RunConfig`]; the stage
/// timeout bounds every model exchange so a hung upstream call cannot block
/// the run indefinitely.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub model: String,
    pub temperature: f64,
    pub seed: Option<u64>,
    pub max_tokens_per_call: Option<u32>,
    pub stage_timeout: Duration,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            model: "gpt-5.1".to_string(),
            temperature: 0.7,
            seed: None,
            max_tokens_per_call: None,
            stage_timeout: Duration::from_secs(DEFAULT_STAGE_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_have_timestamp_and_suffix() {
        let id = now_run_id();
        let (ts, suffix) = id.split_once('_').expect("run id has one underscore");
        assert_eq!(ts.len(), 15); // YYYYMMDDTHHMMSS
        assert_eq!(suffix.len(), 6);
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(now_run_id(), now_run_id());
    }

    #[test]
    fn default_workers_have_distinct_personas() {
        let workers = default_workers();
        assert_eq!(workers.len(), 4);
        for w in &workers {
            assert!(!w.persona.is_empty());
        }
        assert_ne!(workers[0].persona, workers[1].persona);
    }

    #[test]
    fn default_evaluators_cover_all_roles() {
        let ids: Vec<String> = default_evaluators().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["Eval1", "Eval2", "Eval3", "FinalJudge"]);
    }
}
