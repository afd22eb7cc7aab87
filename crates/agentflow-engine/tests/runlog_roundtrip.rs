//! Persistence tests: a written run log must read back field-for-field.

use camino::Utf8PathBuf;
use serde_json::Value;

use agentflow_engine::{RunLogWriter, default_evaluators, default_workers};
use agentflow_model::{
    Draft, EditPlan, FactCheckResult, FinalDecision, ReuseSuggestion, Revision, RubricDimensionScore,
    RubricEvaluation, RubricScoresForDraft, RunConfig, RunLog, SectionInstruction, Task, Uncertainty,
};

fn sample_runlog() -> RunLog {
    RunLog {
        config: RunConfig {
            run_id: "test_run".to_string(),
            model: "stub-model".to_string(),
            temperature: 0.7,
            seed: Some(42),
            max_tokens_per_call: None,
            workers: default_workers(),
            evaluators: default_evaluators(),
        },
        task: Task {
            user_prompt: "raw prompt".to_string(),
            normalized_brief: "normalized brief".to_string(),
            constraints: vec!["one constraint".to_string()],
            success_criteria: vec!["one criterion".to_string()],
        },
        initial_drafts: vec![Draft {
            draft_id: "WorkerA_v1".to_string(),
            worker_id: "WorkerA".to_string(),
            version: 1,
            content: "first draft".to_string(),
            uncertainties: vec![Uncertainty {
                id: "WorkerA_u0".to_string(),
                description: "open point".to_string(),
                kind: "assumption".to_string(),
                impact: "medium".to_string(),
            }],
        }],
        fact_checks: vec![FactCheckResult {
            evaluator_id: "Eval1".to_string(),
            draft_id: "WorkerA_v1".to_string(),
            issues: vec![],
            overall_confidence: 7.5,
            summary: "clean".to_string(),
        }],
        rubric_evaluation_initial: rubric_over("Eval2", "WorkerA_v1"),
        edit_plan: EditPlan {
            evaluator_id: "Eval3".to_string(),
            chosen_base_draft: "WorkerA_v1".to_string(),
            global_strategy: "keep the base".to_string(),
            section_instructions: vec![SectionInstruction {
                section_label: "Intro".to_string(),
                base_from_draft: Some("WorkerA_v1".to_string()),
                actions: vec!["tighten".to_string()],
                notes: String::new(),
            }],
            reuse_suggestions: vec![ReuseSuggestion {
                from_draft: "WorkerA_v1".to_string(),
                what_to_reuse: "structure".to_string(),
            }],
            open_questions: vec!["scope?".to_string()],
        },
        revisions: vec![Revision {
            draft_id: "WorkerA_v2".to_string(),
            from_draft_id: "WorkerA_v1".to_string(),
            worker_id: "WorkerA".to_string(),
            version: 2,
            content: "revised draft".to_string(),
            change_summary: vec!["tightened intro".to_string()],
            updated_uncertainties: vec![],
        }],
        final_decision: FinalDecision {
            evaluator_id: "FinalJudge".to_string(),
            winner_draft_id: "WorkerA_v2".to_string(),
            ranking: vec!["WorkerA_v2".to_string()],
            reasoning: "only candidate".to_string(),
            rubric_evaluation: rubric_over("FinalJudge", "WorkerA_v2"),
        },
    }
}

fn rubric_over(evaluator_id: &str, draft_id: &str) -> RubricEvaluation {
    RubricEvaluation {
        evaluator_id: evaluator_id.to_string(),
        dimensions: vec!["correctness".to_string()],
        per_draft: vec![RubricScoresForDraft {
            draft_id: draft_id.to_string(),
            dimension_scores: vec![RubricDimensionScore {
                name: "correctness".to_string(),
                score: 8.0,
                justification: "accurate".to_string(),
            }],
            overall_score: 80.0,
            summary: "solid".to_string(),
        }],
        ranking: vec![draft_id.to_string()],
        rationale_for_ranking: "only entrant".to_string(),
    }
}

fn temp_out_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path")
}

#[test]
fn written_runlog_reads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let writer = RunLogWriter::new(temp_out_dir(&dir));
    let runlog = sample_runlog();

    let path = writer.write(&runlog).expect("write should succeed");
    assert_eq!(path.file_name(), Some("run_test_run.json"));

    let raw = std::fs::read_to_string(&path).unwrap();
    let reread: RunLog = serde_json::from_str(&raw).expect("file is a valid run log");
    assert_eq!(reread, runlog);
}

#[test]
fn written_runlog_uses_expected_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let writer = RunLogWriter::new(temp_out_dir(&dir));

    let path = writer.write(&sample_runlog()).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();

    // Pretty-printed, with the documented field names at each level.
    assert!(raw.contains("\n  \"config\""));
    let v: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["config"]["run_id"], "test_run");
    assert_eq!(v["task"]["normalized_brief"], "normalized brief");
    assert_eq!(v["initial_drafts"][0]["uncertainties"][0]["type"], "assumption");
    assert_eq!(v["fact_checks"][0]["overall_confidence"], 7.5);
    assert_eq!(v["edit_plan"]["chosen_base_draft"], "WorkerA_v1");
    assert_eq!(v["revisions"][0]["from_draft_id"], "WorkerA_v1");
    assert_eq!(v["final_decision"]["winner_draft_id"], "WorkerA_v2");
}

#[test]
fn writer_creates_missing_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = temp_out_dir(&dir).join("runs").join("2026");
    let writer = RunLogWriter::new(&nested);

    let path = writer.write(&sample_runlog()).unwrap();
    assert!(path.as_std_path().exists());
    assert_eq!(path.parent(), Some(nested.as_path()));
}
