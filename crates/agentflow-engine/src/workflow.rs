//! The eight-stage pipeline sequencer.
//!
//! Stages run in strict order; stage *i+1* never begins until stage *i*'s
//! full result set is available. Within the two worker stages (draft,
//! revise) the per-worker calls are independent, so they are dispatched
//! concurrently and collected in worker-list order to keep output
//! deterministic. Any failure aborts the whole run; there is no retry,
//! checkpointing, or partial run log.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::info;

use agentflow_llm::{LlmBackend, LlmInvocation, Message};
use agentflow_model::decode::{
    decode_draft, decode_edit_plan, decode_fact_check_results, decode_final_decision,
    decode_rubric_evaluation, decode_revision, decode_task,
};
use agentflow_model::{
    Draft, EditPlan, EvaluatorConfig, FactCheckResult, FinalDecision, Revision, RubricEvaluation,
    RunConfig, RunLog, Task, WorkerConfig,
};
use agentflow_prompts::{
    factchecker_prompts, final_judge_prompts, revision_worker_prompts, rubric_prompts,
    synthesizer_prompts, task_normalizer_prompts, worker_prompts,
};
use agentflow_utils::error::AgentFlowError;

use crate::config::{
    WorkflowOptions, default_evaluators, default_workers, fact_checker, final_judge, now_run_id,
    rubric_scorer, synthesizer,
};

/// Per-run context threaded through every stage call.
///
/// Explicit rather than ambient so multiple runs can execute in one process.
#[derive(Clone)]
struct StageCtx {
    backend: Arc<dyn LlmBackend>,
    run_id: String,
    model: String,
    stage_timeout: Duration,
}

impl StageCtx {
    /// One model exchange: invoke, then parse the reply as a JSON object.
    ///
    /// The whole exchange is bounded by the stage timeout.
    async fn chat_json(
        &self,
        stage: &str,
        system: String,
        user: String,
    ) -> Result<Value, AgentFlowError> {
        let inv = LlmInvocation::new(
            self.run_id.clone(),
            stage,
            self.model.clone(),
            self.stage_timeout,
            vec![Message::system(system), Message::user(user)],
        );
        let result = tokio::time::timeout(self.stage_timeout, self.backend.invoke(inv))
            .await
            .map_err(|_| AgentFlowError::StageTimeout {
                stage: stage.to_string(),
                seconds: self.stage_timeout.as_secs(),
            })??;
        serde_json::from_str(&result.raw_response).map_err(|source| {
            AgentFlowError::MalformedResponse {
                stage: stage.to_string(),
                source,
            }
        })
    }
}

async fn normalize_task(ctx: &StageCtx, user_prompt: &str) -> Result<Task, AgentFlowError> {
    let (system, user) = task_normalizer_prompts(user_prompt);
    let resp = ctx.chat_json("normalize", system, user).await?;
    Ok(decode_task(user_prompt, &resp))
}

/// Draft stage: one independent call per worker, fanned out concurrently,
/// collected in worker-list order.
async fn draft_stage(
    ctx: &StageCtx,
    workers: &[WorkerConfig],
    task: &Task,
) -> Result<Vec<Draft>, AgentFlowError> {
    let mut handles = Vec::with_capacity(workers.len());
    for worker in workers {
        let ctx = ctx.clone();
        let worker = worker.clone();
        let task = task.clone();
        let worker_id = worker.id.clone();
        let handle = tokio::spawn(async move {
            let (system, user) = worker_prompts(&worker, &task);
            let stage = format!("draft:{}", worker.id);
            let resp = ctx.chat_json(&stage, system, user).await?;
            Ok::<_, AgentFlowError>(decode_draft(&worker.id, &resp))
        });
        handles.push((worker_id, handle));
    }

    let mut drafts = Vec::with_capacity(handles.len());
    for (worker_id, handle) in handles {
        let draft = handle.await.map_err(|e| AgentFlowError::WorkerTask {
            worker_id,
            reason: e.to_string(),
        })??;
        drafts.push(draft);
    }
    Ok(drafts)
}

async fn fact_check_stage(
    ctx: &StageCtx,
    evaluator: &EvaluatorConfig,
    task: &Task,
    drafts: &[Draft],
) -> Result<Vec<FactCheckResult>, AgentFlowError> {
    let (system, user) = factchecker_prompts(task, drafts);
    let resp = ctx.chat_json("fact_check", system, user).await?;
    Ok(decode_fact_check_results(&evaluator.id, &resp)?)
}

async fn rubric_stage(
    ctx: &StageCtx,
    evaluator: &EvaluatorConfig,
    task: &Task,
    drafts: &[Draft],
    fact_checks: &[FactCheckResult],
    phase: &str,
) -> Result<RubricEvaluation, AgentFlowError> {
    let (system, user) = rubric_prompts(task, drafts, fact_checks, phase);
    let stage = format!("rubric:{phase}");
    let resp = ctx.chat_json(&stage, system, user).await?;
    Ok(decode_rubric_evaluation(&evaluator.id, &resp)?)
}

async fn synthesize_stage(
    ctx: &StageCtx,
    evaluator: &EvaluatorConfig,
    task: &Task,
    drafts: &[Draft],
    fact_checks: &[FactCheckResult],
    rubric: &RubricEvaluation,
) -> Result<EditPlan, AgentFlowError> {
    let (system, user) = synthesizer_prompts(task, drafts, fact_checks, rubric);
    let resp = ctx.chat_json("synthesize", system, user).await?;
    Ok(decode_edit_plan(&evaluator.id, &resp))
}

/// Revision stage: each worker revises its own prior draft against the
/// shared edit plan. Other workers' draft content never enters the prompt;
/// only the plan's textual description of them does.
async fn revise_stage(
    ctx: &StageCtx,
    workers: &[WorkerConfig],
    task: &Task,
    initial_drafts: &[Draft],
    edit_plan: &EditPlan,
) -> Result<Vec<Revision>, AgentFlowError> {
    let mut handles = Vec::with_capacity(workers.len());
    for worker in workers {
        let own_draft = initial_drafts
            .iter()
            .find(|d| d.worker_id == worker.id)
            .ok_or_else(|| AgentFlowError::WorkerTask {
                worker_id: worker.id.clone(),
                reason: "no initial draft for worker".to_string(),
            })?
            .clone();
        let ctx = ctx.clone();
        let worker = worker.clone();
        let task = task.clone();
        let edit_plan = edit_plan.clone();
        let worker_id = worker.id.clone();
        let handle = tokio::spawn(async move {
            let (system, user) = revision_worker_prompts(&worker, &task, &own_draft, &edit_plan);
            let stage = format!("revise:{}", worker.id);
            let resp = ctx.chat_json(&stage, system, user).await?;
            Ok::<_, AgentFlowError>(decode_revision(&worker.id, &own_draft.draft_id, &resp))
        });
        handles.push((worker_id, handle));
    }

    let mut revisions = Vec::with_capacity(handles.len());
    for (worker_id, handle) in handles {
        let revision = handle.await.map_err(|e| AgentFlowError::WorkerTask {
            worker_id,
            reason: e.to_string(),
        })??;
        revisions.push(revision);
    }
    Ok(revisions)
}

async fn final_judge_stage(
    ctx: &StageCtx,
    evaluator: &EvaluatorConfig,
    task: &Task,
    revisions: &[Revision],
) -> Result<FinalDecision, AgentFlowError> {
    let (system, user) = final_judge_prompts(task, revisions);
    let resp = ctx.chat_json("final_judge", system, user).await?;
    Ok(decode_final_decision(&evaluator.id, &resp)?)
}

/// Run the complete eight-stage pipeline and return the assembled
/// [`RunLog`]. Persistence is the caller's step (see
/// [`crate::RunLogWriter`]), so a failed run leaves no log at all.
///
/// For N configured workers the backend is invoked exactly `2N + 5` times:
/// normalize, N drafts, fact-check, rubric, synthesize, N revisions, final
/// judge.
///
/// # Errors
///
/// Any transport failure, malformed JSON reply, numeric coercion failure,
/// or stage timeout aborts the run.
pub async fn run_workflow(
    backend: Arc<dyn LlmBackend>,
    user_prompt: &str,
    options: &WorkflowOptions,
) -> Result<RunLog, AgentFlowError> {
    let run_id = now_run_id();
    let workers = default_workers();
    let evaluators = default_evaluators();

    let config = RunConfig {
        run_id: run_id.clone(),
        model: options.model.clone(),
        temperature: options.temperature,
        seed: options.seed,
        max_tokens_per_call: options.max_tokens_per_call,
        workers: workers.clone(),
        evaluators,
    };

    let ctx = StageCtx {
        backend,
        run_id: run_id.clone(),
        model: options.model.clone(),
        stage_timeout: options.stage_timeout,
    };

    info!(run_id = %run_id, model = %options.model, workers = workers.len(), "starting run");

    let task = normalize_task(&ctx, user_prompt).await?;
    info!(run_id = %run_id, "task normalized");

    let initial_drafts = draft_stage(&ctx, &workers, &task).await?;
    info!(run_id = %run_id, drafts = initial_drafts.len(), "drafting complete");

    let fact_checks = fact_check_stage(&ctx, &fact_checker(), &task, &initial_drafts).await?;
    let rubric_initial = rubric_stage(
        &ctx,
        &rubric_scorer(),
        &task,
        &initial_drafts,
        &fact_checks,
        "initial",
    )
    .await?;
    let edit_plan = synthesize_stage(
        &ctx,
        &synthesizer(),
        &task,
        &initial_drafts,
        &fact_checks,
        &rubric_initial,
    )
    .await?;
    info!(run_id = %run_id, base = %edit_plan.chosen_base_draft, "edit plan ready");

    let revisions = revise_stage(&ctx, &workers, &task, &initial_drafts, &edit_plan).await?;
    info!(run_id = %run_id, revisions = revisions.len(), "revision complete");

    let final_decision = final_judge_stage(&ctx, &final_judge(), &task, &revisions).await?;
    info!(run_id = %run_id, winner = %final_decision.winner_draft_id, "final decision made");

    Ok(RunLog {
        config,
        task,
        initial_drafts,
        fact_checks,
        rubric_evaluation_initial: rubric_initial,
        edit_plan,
        revisions,
        final_decision,
    })
}
