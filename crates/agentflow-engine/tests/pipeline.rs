//! End-to-end pipeline tests against a scripted backend.
//!
//! The backend returns fixed canned JSON per stage and records every
//! invocation, so the tests can assert the exact call count and stage
//! order without any network access.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use agentflow_engine::{AgentFlowError, WorkflowOptions, run_workflow};
use agentflow_llm::{LlmBackend, LlmInvocation, LlmResult};
use agentflow_utils::error::{DecodeError, LlmError};

/// What the scripted backend should do for a given run.
#[derive(Clone, Copy)]
enum Script {
    Happy,
    NonNumericConfidence,
    MalformedNormalize,
    HangForever,
}

struct ScriptedBackend {
    script: Script,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn canned_response(&self, stage: &str) -> String {
        if let Some(worker) = stage.strip_prefix("draft:") {
            return json!({
                "draft": format!("draft by {worker}"),
                "uncertainties": [{"description": format!("unsure about {worker}")}],
            })
            .to_string();
        }
        if let Some(worker) = stage.strip_prefix("revise:") {
            return json!({
                "revised_draft": format!("revision by {worker}"),
                "change_summary": "single change",
                "updated_uncertainties": [{"description": "still open"}],
            })
            .to_string();
        }
        match stage {
            "normalize" => json!({
                "brief": "  Build the thing  ",
                "constraints": ["c1"],
                "success_criteria": ["s1"],
            })
            .to_string(),
            "fact_check" => {
                let confidence = match self.script {
                    Script::NonNumericConfidence => json!("high"),
                    _ => json!("7"),
                };
                json!({
                    "results": [
                        {"draft_id": "WorkerA_v1", "issues": [], "overall_confidence": confidence, "summary": "ok"},
                        {"draft_id": "WorkerB_v1", "issues": [], "overall_confidence": 6, "summary": "ok"},
                        {"draft_id": "WorkerC_v1", "issues": [], "overall_confidence": 5, "summary": "ok"},
                        {"draft_id": "WorkerD_v1", "issues": [], "overall_confidence": 8, "summary": "ok"},
                    ]
                })
                .to_string()
            }
            "rubric:initial" => json!({
                "dimensions": ["correctness", "coverage", "clarity", "practicality", "risk_handling"],
                "per_draft": [{
                    "draft_id": "WorkerA_v1",
                    "dimension_scores": [{"name": "correctness", "score": 8, "justification": "solid"}],
                    "overall_score": 80,
                    "summary": "strong",
                }],
                "ranking": ["WorkerA_v1", "WorkerB_v1", "WorkerC_v1", "WorkerD_v1"],
                "rationale_for_ranking": "A leads",
            })
            .to_string(),
            "synthesize" => json!({
                "chosen_base_draft": "WorkerA_v1",
                "global_strategy": "merge strengths",
                "section_instructions": [{
                    "section_label": "Risks",
                    "base_from_draft": "WorkerC_v1",
                    "actions": ["fold in the risk analysis"],
                    "notes": "keep it short",
                }],
                "reuse_suggestions": [{"from_draft": "WorkerD_v1", "what_to_reuse": "plain naming"}],
                "open_questions": ["is the budget fixed?"],
            })
            .to_string(),
            "final_judge" => json!({
                "dimensions": ["correctness", "coverage", "clarity", "practicality", "risk_handling"],
                "per_draft": [{
                    "draft_id": "WorkerA_v2",
                    "dimension_scores": [{"name": "correctness", "score": 9, "justification": "fixed"}],
                    "overall_score": 90,
                    "summary": "winner",
                }],
                "ranking": ["WorkerA_v2", "WorkerB_v2", "WorkerC_v2", "WorkerD_v2"],
                "winner_draft_id": "WorkerA_v2",
                "reasoning": "most complete after revision",
            })
            .to_string(),
            other => panic!("unexpected stage: {other}"),
        }
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        self.calls.lock().unwrap().push(inv.stage.clone());
        match self.script {
            Script::HangForever => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::Transport("unreachable".to_string()))
            }
            Script::MalformedNormalize if inv.stage == "normalize" => {
                Ok(LlmResult::new("this is not json", "stub", inv.model))
            }
            _ => Ok(LlmResult::new(
                self.canned_response(&inv.stage),
                "stub",
                inv.model,
            )),
        }
    }
}

fn options() -> WorkflowOptions {
    WorkflowOptions {
        model: "stub-model".to_string(),
        ..WorkflowOptions::default()
    }
}

#[tokio::test]
async fn happy_path_produces_complete_runlog() {
    let backend = ScriptedBackend::new(Script::Happy);
    let runlog = run_workflow(backend.clone(), "build the thing", &options())
        .await
        .expect("workflow should complete");

    // Four default workers: 2N + 5 = 13 invocations.
    let calls = backend.recorded_calls();
    assert_eq!(calls.len(), 13);

    // Strict stage order; worker calls are unordered within their block.
    assert_eq!(calls[0], "normalize");
    let mut draft_block: Vec<&str> = calls[1..5].iter().map(String::as_str).collect();
    draft_block.sort_unstable();
    assert_eq!(
        draft_block,
        vec!["draft:WorkerA", "draft:WorkerB", "draft:WorkerC", "draft:WorkerD"]
    );
    assert_eq!(calls[5], "fact_check");
    assert_eq!(calls[6], "rubric:initial");
    assert_eq!(calls[7], "synthesize");
    let mut revise_block: Vec<&str> = calls[8..12].iter().map(String::as_str).collect();
    revise_block.sort_unstable();
    assert_eq!(
        revise_block,
        vec!["revise:WorkerA", "revise:WorkerB", "revise:WorkerC", "revise:WorkerD"]
    );
    assert_eq!(calls[12], "final_judge");

    // Task normalization trims the brief.
    assert_eq!(runlog.task.user_prompt, "build the thing");
    assert_eq!(runlog.task.normalized_brief, "Build the thing");

    // Drafts arrive in worker-list order with fixed ids and versions.
    assert_eq!(runlog.initial_drafts.len(), 4);
    for (draft, worker) in runlog.initial_drafts.iter().zip(&runlog.config.workers) {
        assert_eq!(draft.draft_id, format!("{}_v1", worker.id));
        assert_eq!(draft.version, 1);
        assert_eq!(draft.content, format!("draft by {}", worker.id));
        for u in &draft.uncertainties {
            assert!(!u.id.is_empty());
        }
    }

    // Numeric-string confidence parses.
    assert_eq!(runlog.fact_checks[0].overall_confidence, 7.0);
    assert_eq!(runlog.fact_checks[0].evaluator_id, "Eval1");

    assert_eq!(runlog.rubric_evaluation_initial.evaluator_id, "Eval2");
    assert_eq!(runlog.edit_plan.evaluator_id, "Eval3");
    assert_eq!(runlog.edit_plan.chosen_base_draft, "WorkerA_v1");

    // Revisions in worker order; scalar change_summary wrapped as one item.
    assert_eq!(runlog.revisions.len(), 4);
    for (revision, worker) in runlog.revisions.iter().zip(&runlog.config.workers) {
        assert_eq!(revision.draft_id, format!("{}_v2", worker.id));
        assert_eq!(revision.from_draft_id, format!("{}_v1", worker.id));
        assert_eq!(revision.version, 2);
        assert_eq!(revision.change_summary, vec!["single change"]);
    }

    assert_eq!(runlog.final_decision.winner_draft_id, "WorkerA_v2");
    assert_eq!(runlog.final_decision.evaluator_id, "FinalJudge");
    assert_eq!(runlog.final_decision.ranking[0], "WorkerA_v2");
}

#[tokio::test]
async fn non_numeric_confidence_aborts_run() {
    let backend = ScriptedBackend::new(Script::NonNumericConfidence);
    let err = run_workflow(backend.clone(), "p", &options())
        .await
        .expect_err("workflow should abort");

    match err {
        AgentFlowError::Decode(DecodeError::NonNumeric { field, .. }) => {
            assert_eq!(field, "overall_confidence");
        }
        other => panic!("expected decode error, got {other:?}"),
    }

    // The run stopped at fact-check: normalize + 4 drafts + fact_check.
    assert_eq!(backend.recorded_calls().len(), 6);
}

#[tokio::test]
async fn malformed_json_aborts_run_at_first_stage() {
    let backend = ScriptedBackend::new(Script::MalformedNormalize);
    let err = run_workflow(backend.clone(), "p", &options())
        .await
        .expect_err("workflow should abort");

    match err {
        AgentFlowError::MalformedResponse { stage, .. } => assert_eq!(stage, "normalize"),
        other => panic!("expected malformed response error, got {other:?}"),
    }
    assert_eq!(backend.recorded_calls().len(), 1);
}

#[tokio::test]
async fn hung_backend_hits_stage_timeout() {
    let backend = ScriptedBackend::new(Script::HangForever);
    let opts = WorkflowOptions {
        stage_timeout: Duration::from_millis(50),
        ..options()
    };
    let err = run_workflow(backend, "p", &opts)
        .await
        .expect_err("workflow should time out");

    match err {
        AgentFlowError::StageTimeout { stage, .. } => assert_eq!(stage, "normalize"),
        other => panic!("expected stage timeout, got {other:?}"),
    }
}
