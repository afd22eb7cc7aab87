//! Pipeline artifact records.
//!
//! Every record is an immutable value produced once by its stage and never
//! mutated afterwards; the pipeline is append-only. Field names here are the
//! wire names used in prompts and in the persisted run log.

use serde::{Deserialize, Serialize};

pub type WorkerId = String;
pub type EvaluatorId = String;
pub type DraftId = String;
pub type RunId = String;

/// One independently-prompted worker persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub id: WorkerId,
    pub display_name: String,
    pub persona: String,
}

/// One evaluator role (fact-checker, rubric scorer, synthesizer, judge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    pub id: EvaluatorId,
    pub role: String,
}

/// Immutable parameters of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub run_id: RunId,
    pub model: String,
    pub temperature: f64,
    pub seed: Option<u64>,
    pub max_tokens_per_call: Option<u32>,
    pub workers: Vec<WorkerConfig>,
    pub evaluators: Vec<EvaluatorConfig>,
}

/// Normalized version of the raw user request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub user_prompt: String,
    pub normalized_brief: String,
    pub constraints: Vec<String>,
    pub success_criteria: Vec<String>,
}

/// A flagged risk or assumption attached to a draft or revision.
///
/// `type` and `impact` are descriptive for the model
/// (assumption/missing_info/ambiguity/risk/other, low/medium/high) and are
/// accepted unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uncertainty {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub impact: String,
}

/// One worker's version-1 solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub draft_id: DraftId,
    pub worker_id: WorkerId,
    pub version: u32,
    pub content: String,
    pub uncertainties: Vec<Uncertainty>,
}

/// One flaw the fact-checker found in a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckIssue {
    pub severity: String,
    pub location_hint: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Aggregate fact-check verdict for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub evaluator_id: EvaluatorId,
    pub draft_id: DraftId,
    pub issues: Vec<FactCheckIssue>,
    /// Trustworthiness score in [0, 10].
    pub overall_confidence: f64,
    pub summary: String,
}

/// One scored rubric dimension for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDimensionScore {
    pub name: String,
    pub score: f64,
    pub justification: String,
}

/// Full rubric result for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricScoresForDraft {
    pub draft_id: DraftId,
    pub dimension_scores: Vec<RubricDimensionScore>,
    /// Aggregate score in [0, 100].
    pub overall_score: f64,
    pub summary: String,
}

/// Aggregate rubric verdict across drafts.
///
/// Produced twice per run: once over the initial drafts, and once embedded
/// in the final decision over the revisions. The ranking is whatever the
/// model returned, best first; it is not validated against the known draft
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricEvaluation {
    pub evaluator_id: EvaluatorId,
    pub dimensions: Vec<String>,
    pub per_draft: Vec<RubricScoresForDraft>,
    pub ranking: Vec<DraftId>,
    pub rationale_for_ranking: String,
}

/// One directive in an edit plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionInstruction {
    pub section_label: String,
    pub base_from_draft: Option<DraftId>,
    pub actions: Vec<String>,
    pub notes: String,
}

/// Pointer to reusable content in another draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReuseSuggestion {
    pub from_draft: DraftId,
    pub what_to_reuse: String,
}

/// The synthesizer's shared instructions guiding all workers' revisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    pub evaluator_id: EvaluatorId,
    pub chosen_base_draft: DraftId,
    pub global_strategy: String,
    pub section_instructions: Vec<SectionInstruction>,
    pub reuse_suggestions: Vec<ReuseSuggestion>,
    pub open_questions: Vec<String>,
}

/// A worker's version-2 draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub draft_id: DraftId,
    pub from_draft_id: DraftId,
    pub worker_id: WorkerId,
    pub version: u32,
    pub content: String,
    pub change_summary: Vec<String>,
    pub updated_uncertainties: Vec<Uncertainty>,
}

/// Outcome of final judging, terminal for the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub evaluator_id: EvaluatorId,
    pub winner_draft_id: DraftId,
    pub ranking: Vec<DraftId>,
    pub reasoning: String,
    pub rubric_evaluation: RubricEvaluation,
}

/// The complete, immutable audit trail of one pipeline execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    pub config: RunConfig,
    pub task: Task,
    pub initial_drafts: Vec<Draft>,
    pub fact_checks: Vec<FactCheckResult>,
    pub rubric_evaluation_initial: RubricEvaluation,
    pub edit_plan: EditPlan,
    pub revisions: Vec<Revision>,
    pub final_decision: FinalDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncertainty_serializes_type_field_name() {
        let u = Uncertainty {
            id: "u1".to_string(),
            description: "desc".to_string(),
            kind: "assumption".to_string(),
            impact: "low".to_string(),
        };
        let json = serde_json::to_value(&u).unwrap();
        assert_eq!(json["type"], "assumption");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn fact_check_issue_round_trips_through_json() {
        let issue = FactCheckIssue {
            severity: "major".to_string(),
            location_hint: "section 2".to_string(),
            description: "unsupported".to_string(),
            kind: "unsupported_claim".to_string(),
        };
        let text = serde_json::to_string(&issue).unwrap();
        let back: FactCheckIssue = serde_json::from_str(&text).unwrap();
        assert_eq!(back, issue);
    }
}
