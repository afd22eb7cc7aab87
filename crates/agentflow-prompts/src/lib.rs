//! Prompt builders for workers and evaluators.
//!
//! Each builder returns a `(system, user)` pair for one model exchange.
//! Structured context (drafts, fact checks, rubric, edit plan) is embedded
//! as pretty-printed JSON so the model sees exactly the records the
//! pipeline holds. The JSON keys in the instructions are the contract the
//! decode layer reads back.

use serde_json::{Value, json};

use agentflow_model::{
    Draft, EditPlan, FactCheckResult, Revision, RubricEvaluation, Task, WorkerConfig,
};

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn draft_payload(draft: &Draft) -> Value {
    json!({
        "draft_id": draft.draft_id,
        "content": draft.content,
        "uncertainties": draft.uncertainties,
    })
}

fn fact_check_payload(fc: &FactCheckResult) -> Value {
    json!({
        "draft_id": fc.draft_id,
        "issues": fc.issues,
        "overall_confidence": fc.overall_confidence,
        "summary": fc.summary,
    })
}

fn brief_payload(task: &Task) -> Value {
    json!({
        "brief": task.normalized_brief,
        "constraints": task.constraints,
        "success_criteria": task.success_criteria,
    })
}

/// Prompts for the task-normalization stage.
pub fn task_normalizer_prompts(user_prompt: &str) -> (String, String) {
    let system = r#"You are a task normalizer. Given a raw user prompt, you must produce:
- A concise, neutral brief (what is being asked).
- A list of explicit constraints.
- A list of success criteria (what "good" looks like).

Always answer as strict JSON with keys:
  "brief": string
  "constraints": string[]
  "success_criteria": string[]

Do not include any other keys."#
        .to_string();
    let user = format!("Here is the raw prompt from the user:\n\n{user_prompt}\n\nNormalize it now.");
    (system, user)
}

/// Persona text for a worker id. Unknown ids get a generic persona.
#[must_use]
pub fn worker_persona(worker_id: &str) -> &'static str {
    match worker_id {
        "WorkerA" => {
            "You prioritize structure, decomposition, and clear interfaces/abstractions. \
             You propose step-by-step plans and clean designs. You care about internal consistency."
        }
        "WorkerB" => {
            "You optimize for concrete, usable output: examples, commands, code, specific steps. \
             You care more about getting something that works than about perfect theory."
        }
        "WorkerC" => {
            "You relentlessly look for edge cases, missing assumptions, and things that could go wrong. \
             You still produce a full draft, but you actively highlight weak spots and risks."
        }
        "WorkerD" => {
            "You optimize for clarity, pedagogy, and naming. Your draft should be easy to read \
             for someone smart but not deeply familiar with the context."
        }
        _ => "You are a capable assistant.",
    }
}

/// Prompts for one worker's independent drafting call.
///
/// Workers never see each other's drafts; the prompt contains only the
/// normalized task and this worker's persona.
pub fn worker_prompts(worker: &WorkerConfig, task: &Task) -> (String, String) {
    let system = format!(
        r#"You are {id}, one of several independent workers. You DO NOT see other workers' drafts.

Persona:
{persona}

You are given:
- BRIEF: {brief}
- CONSTRAINTS (must obey all):
{constraints}
- SUCCESS CRITERIA (optimize for these):
{success}

Your goals:
1. Produce your best draft solution.
2. Explicitly list your uncertainties, assumptions, and potential failure modes.

Output format (MUST be valid JSON with these exact keys):
{{
  "draft": "full draft here as markdown or plain text",
  "uncertainties": [
    {{
      "id": "short_machine_friendly_id",
      "description": "what you are unsure about",
      "type": "assumption | missing_info | ambiguity | risk | other",
      "impact": "low | medium | high"
    }}
  ]
}}"#,
        id = worker.id,
        persona = worker.persona,
        brief = task.normalized_brief,
        constraints = bullets(&task.constraints),
        success = bullets(&task.success_criteria),
    );
    let user = "Create your draft and uncertainty list now.".to_string();
    (system, user)
}

/// Prompts for the fact-check stage over all initial drafts.
pub fn factchecker_prompts(task: &Task, drafts: &[Draft]) -> (String, String) {
    let system = format!(
        r#"You are Eval1, the FactChecker.

You are given:
- BRIEF: {brief}
- CONSTRAINTS:
{constraints}
- SUCCESS CRITERIA:
{success}

You will see multiple drafts, each with:
- "draft_id"
- "content" (the full draft)
- "uncertainties" reported by the worker.

Your tasks:
1. For each draft, identify factual issues, unsupported claims, and constraint violations.
2. Summarize how trustworthy the draft is overall.

For each draft, produce:
- "issues": list of objects with keys:
    - "severity": "minor" | "moderate" | "major"
    - "location_hint": short quote or section reference
    - "description": what is wrong or risky
    - "type": "factual_error" | "unsupported_claim" | "constraint_violation" | "inconsistency" | "other"
- "overall_confidence": number from 0 to 10
- "summary": 1-3 sentences summarizing trustworthiness.

Output strict JSON of the form:
{{
  "results": [
    {{
      "draft_id": "string",
      "issues": [ ... ],
      "overall_confidence": 0,
      "summary": "..."
    }}
  ]
}}

Do not include any other keys."#,
        brief = task.normalized_brief,
        constraints = bullets(&task.constraints),
        success = bullets(&task.success_criteria),
    );
    let payload = json!({
        "drafts": drafts.iter().map(draft_payload).collect::<Vec<_>>(),
    });
    let user = format!(
        "Here are the drafts (as JSON under key 'drafts'):\n\n{}",
        pretty(&payload)
    );
    (system, user)
}

/// Prompts for the rubric-scoring stage.
///
/// `phase` labels the payload ("initial" for v1 drafts); the output shape
/// is the rubric evaluation contract.
pub fn rubric_prompts(
    task: &Task,
    drafts: &[Draft],
    fact_checks: &[FactCheckResult],
    phase: &str,
) -> (String, String) {
    let system = format!(
        r#"You are Eval2, the RubricScorer.

You are given:
- BRIEF: {brief}
- CONSTRAINTS:
{constraints}
- SUCCESS CRITERIA:
{success}

Rubric dimensions (0-10 each):
1. "correctness"
2. "coverage"
3. "clarity"
4. "practicality"
5. "risk_handling"

Definitions:
- correctness: factual / logical soundness; alignment with constraints.
- coverage: how fully it addresses the brief and success criteria.
- clarity: organization, naming, readability.
- practicality: how implementable or actionable it is.
- risk_handling: how well it handles uncertainties, risks, and edge cases.

You also receive:
- "drafts": list of drafts.
- "fact_checks": fact-check results per draft (may be empty).

Your tasks:
1. Score each draft on the 5 dimensions (0-10).
2. Provide a 1-3 sentence summary for each draft.
3. Compute an "overall_score" for each draft (0-100; you may weight dimensions equally).
4. Produce a ranking of draft_ids from best to worst, with rationale.

Output strict JSON:
{{
  "dimensions": ["correctness", "coverage", "clarity", "practicality", "risk_handling"],
  "per_draft": [
    {{
      "draft_id": "...",
      "dimension_scores": [
        {{"name": "correctness", "score": 0, "justification": "..."}},
        ...
      ],
      "overall_score": 0,
      "summary": "..."
    }}
  ],
  "ranking": ["best_draft_id", "..."],
  "rationale_for_ranking": "..."
}}"#,
        brief = task.normalized_brief,
        constraints = bullets(&task.constraints),
        success = bullets(&task.success_criteria),
    );
    let payload = json!({
        "drafts": drafts.iter().map(draft_payload).collect::<Vec<_>>(),
        "fact_checks": fact_checks.iter().map(fact_check_payload).collect::<Vec<_>>(),
        "phase": phase,
    });
    let user = format!(
        "Here are the drafts and fact-check results:\n\n{}",
        pretty(&payload)
    );
    (system, user)
}

/// Prompts for the synthesis stage producing the shared edit plan.
pub fn synthesizer_prompts(
    task: &Task,
    drafts: &[Draft],
    fact_checks: &[FactCheckResult],
    rubric: &RubricEvaluation,
) -> (String, String) {
    let system = r#"You are Eval3, the Synthesizer/Editor.

You are given:
- BRIEF, CONSTRAINTS, SUCCESS CRITERIA
- Drafts (id + content + uncertainties)
- Fact-check results per draft
- Rubric scores and ranking

Your job:
1. Choose one draft as the "base" to start from.
2. Design an edit plan that:
   - Keeps the strengths of the base draft.
   - Incorporates the best ideas from other drafts.
   - Fixes major fact-check issues and weaknesses identified by the rubric.
3. Identify remaining open questions or uncertainties that should be addressed.

Structure your plan as JSON:
{
  "chosen_base_draft": "draft_id",
  "global_strategy": "overall narrative of what to do",
  "section_instructions": [
    {
      "section_label": "e.g. Introduction, Design, Risks, etc.",
      "base_from_draft": "draft_id or null",
      "actions": [
        "e.g. Keep base; adopt risk analysis from WorkerC_v1; simplify explanation like WorkerD_v1"
      ],
      "notes": "concrete instructions for workers"
    }
  ],
  "reuse_suggestions": [
    {
      "from_draft": "draft_id",
      "what_to_reuse": "specific idea / phrase / structure to pull in"
    }
  ],
  "open_questions": [
    "list of unresolved uncertainties workers should clarify or address"
  ]
}"#
    .to_string();
    let rubric_payload = json!({
        "dimensions": rubric.dimensions,
        "per_draft": rubric.per_draft,
        "ranking": rubric.ranking,
        "rationale_for_ranking": rubric.rationale_for_ranking,
    });
    let payload = json!({
        "drafts": drafts.iter().map(draft_payload).collect::<Vec<_>>(),
        "fact_checks": fact_checks.iter().map(fact_check_payload).collect::<Vec<_>>(),
        "rubric_evaluation": rubric_payload,
        "brief": brief_payload(task),
    });
    let user = format!("Here is the context:\n\n{}", pretty(&payload));
    (system, user)
}

/// Prompts for one worker's revision call.
///
/// The payload holds only this worker's own prior draft and the shared
/// edit plan. Other workers' draft content is never included; the plan's
/// textual description is all the worker sees of them.
pub fn revision_worker_prompts(
    worker: &WorkerConfig,
    task: &Task,
    own_draft: &Draft,
    edit_plan: &EditPlan,
) -> (String, String) {
    let system = format!(
        r#"You are {id} revising your own earlier draft.

You are given:
- Your previous draft (DRAFT_V1) and its uncertainties.
- A global edit plan created by an editor.
- The original BRIEF, CONSTRAINTS, and SUCCESS CRITERIA.

Your tasks:
1. Produce a revised draft (DRAFT_V2) that follows the edit plan.
2. Keep what is good in your previous draft if it still fits the plan.
3. Incorporate ideas from other drafts only as described in the plan (you do NOT see their actual texts; only the plan's description).
4. Update your list of uncertainties: which are resolved, which remain, and any new ones.

Output strict JSON:
{{
  "revised_draft": "full revised draft",
  "change_summary": [
    "short bullet points describing main changes"
  ],
  "updated_uncertainties": [
    {{
      "id": "short_id",
      "description": "updated description",
      "type": "assumption | missing_info | ambiguity | risk | other",
      "impact": "low | medium | high"
    }}
  ]
}}"#,
        id = worker.id,
    );
    let edit_plan_payload = json!({
        "chosen_base_draft": edit_plan.chosen_base_draft,
        "global_strategy": edit_plan.global_strategy,
        "section_instructions": edit_plan.section_instructions,
        "reuse_suggestions": edit_plan.reuse_suggestions,
        "open_questions": edit_plan.open_questions,
    });
    let payload = json!({
        "brief": brief_payload(task),
        "edit_plan": edit_plan_payload,
        "your_previous_draft": draft_payload(own_draft),
    });
    let user = format!("Context:\n\n{}\n\nRevise your draft now.", pretty(&payload));
    (system, user)
}

/// Prompts for the final judging stage over all revisions.
pub fn final_judge_prompts(task: &Task, revisions: &[Revision]) -> (String, String) {
    let system = r#"You are FinalJudge.

You are given:
- BRIEF, CONSTRAINTS, SUCCESS CRITERIA.
- Revised drafts only (v2).

Your tasks:
1. Score each revised draft on the rubric:
   - correctness, coverage, clarity, practicality, risk_handling (0-10 each).
2. Provide an overall score and short summary per draft.
3. Produce a clear ranking from best to worst.
4. Select a single winner and justify your choice.

Output strict JSON:
{
  "dimensions": ["correctness", "coverage", "clarity", "practicality", "risk_handling"],
  "per_draft": [
    {
      "draft_id": "...",
      "dimension_scores": [
        {"name": "correctness", "score": 0, "justification": "..."},
        ...
      ],
      "overall_score": 0,
      "summary": "..."
    }
  ],
  "ranking": ["best_draft_id", "..."],
  "winner_draft_id": "best_draft_id",
  "reasoning": "why this winner"
}"#
    .to_string();
    let revision_payloads: Vec<Value> = revisions
        .iter()
        .map(|r| {
            json!({
                "draft_id": r.draft_id,
                "content": r.content,
                "worker_id": r.worker_id,
                "change_summary": r.change_summary,
                "updated_uncertainties": r.updated_uncertainties,
            })
        })
        .collect();
    let payload = json!({
        "brief": brief_payload(task),
        "drafts": revision_payloads,
    });
    let user = format!("Here is the context:\n\n{}", pretty(&payload));
    (system, user)
}
