//! Response coercion: untrusted model JSON into typed records.
//!
//! Every decoder is a pure, total function over a `serde_json::Value`
//! tolerating missing keys, wrong types, and extra keys. String and list
//! fields never fail: missing or odd-shaped values fall back to documented
//! defaults. Only numeric fields can fail, with
//! [`DecodeError::NonNumeric`], and that failure aborts the stage.
//!
//! Enum-like fields (`severity`, `type`, `impact`) are passed through
//! unvalidated; their documented value sets are descriptive for the model,
//! not enforced here. Ranking lists and draft-id references are likewise
//! accepted without checking them against the known draft set.

use serde_json::Value;

use crate::records::{
    Draft, EditPlan, EvaluatorId, FactCheckIssue, FactCheckResult, FinalDecision, ReuseSuggestion,
    Revision, RubricDimensionScore, RubricEvaluation, RubricScoresForDraft, SectionInstruction,
    Task, Uncertainty,
};
use agentflow_utils::error::DecodeError;

/// Stringify a JSON scalar.
///
/// Strings pass through, numbers and bools render as their JSON text, null
/// becomes the empty string. Non-scalars render as compact JSON so no
/// information is silently dropped.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Fetch `key` as a string, defaulting to empty when missing.
fn string_field(obj: &Value, key: &str) -> String {
    obj.get(key).map(coerce_string).unwrap_or_default()
}

/// Fetch `key` as an optional string: absent or null is `None`.
fn opt_string_field(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_string(v)),
    }
}

/// Fetch `key` as a list of strings; missing or not-a-list is empty.
fn string_list_field(obj: &Value, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.iter().map(coerce_string).collect(),
        _ => Vec::new(),
    }
}

/// Fetch `key` as a list of strings, wrapping a present scalar as a
/// one-element list. Used only for `change_summary`; the other list fields
/// use the empty-list policy. The asymmetry is intentional and per-field.
fn wrapped_string_list_field(obj: &Value, key: &str) -> Vec<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(coerce_string).collect(),
        Some(other) => vec![coerce_string(other)],
    }
}

/// Fetch `key` as a list of objects; missing or not-a-list is empty.
fn object_list_field<'a>(obj: &'a Value, key: &str) -> &'a [Value] {
    match obj.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

/// Fetch `key` as a number, defaulting to 0.0 when missing.
///
/// JSON numbers, numeric strings (`"7"` parses to 7.0), and bools (1/0) are
/// accepted; anything else fails with the field name attached.
fn numeric_field(obj: &Value, key: &str) -> Result<f64, DecodeError> {
    let non_numeric = |value: &Value| DecodeError::NonNumeric {
        field: key.to_string(),
        value: value.to_string(),
    };
    match obj.get(key) {
        None => Ok(0.0),
        Some(v @ Value::Number(_)) => v.as_f64().ok_or_else(|| non_numeric(v)),
        Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
        Some(v @ Value::String(s)) => s.trim().parse::<f64>().map_err(|_| non_numeric(v)),
        Some(v) => Err(non_numeric(v)),
    }
}

/// Decode uncertainties, synthesizing `{id_prefix}_u{index}` ids for
/// entries the model returned without one. Synthesized ids are unique
/// within the response because the index runs over the list.
fn decode_uncertainties(value: Option<&Value>, id_prefix: &str) -> Vec<Uncertainty> {
    let items = match value {
        Some(Value::Array(items)) => items.as_slice(),
        _ => return Vec::new(),
    };
    items
        .iter()
        .enumerate()
        .map(|(i, u)| Uncertainty {
            id: opt_string_field(u, "id").unwrap_or_else(|| format!("{id_prefix}_u{i}")),
            description: string_field(u, "description"),
            kind: opt_string_field(u, "type").unwrap_or_else(|| "other".to_string()),
            impact: opt_string_field(u, "impact").unwrap_or_else(|| "medium".to_string()),
        })
        .collect()
}

/// Decode the task-normalizer response into a [`Task`].
///
/// Total: missing keys become the empty string / empty list.
pub fn decode_task(user_prompt: &str, resp: &Value) -> Task {
    Task {
        user_prompt: user_prompt.to_string(),
        normalized_brief: string_field(resp, "brief").trim().to_string(),
        constraints: string_list_field(resp, "constraints"),
        success_criteria: string_list_field(resp, "success_criteria"),
    }
}

/// Decode one worker's drafting response into a version-1 [`Draft`].
///
/// The draft id is always `{worker_id}_v1` regardless of what the model
/// returned. Total.
pub fn decode_draft(worker_id: &str, resp: &Value) -> Draft {
    Draft {
        draft_id: format!("{worker_id}_v1"),
        worker_id: worker_id.to_string(),
        version: 1,
        content: string_field(resp, "draft"),
        uncertainties: decode_uncertainties(resp.get("uncertainties"), worker_id),
    }
}

/// Decode the fact-checker response into one [`FactCheckResult`] per entry
/// under `results`.
///
/// Fails only when an `overall_confidence` value cannot be coerced to a
/// number.
pub fn decode_fact_check_results(
    evaluator_id: &EvaluatorId,
    resp: &Value,
) -> Result<Vec<FactCheckResult>, DecodeError> {
    let mut results = Vec::new();
    for r in object_list_field(resp, "results") {
        let issues = object_list_field(r, "issues")
            .iter()
            .map(|i| FactCheckIssue {
                severity: opt_string_field(i, "severity").unwrap_or_else(|| "minor".to_string()),
                location_hint: string_field(i, "location_hint"),
                description: string_field(i, "description"),
                kind: opt_string_field(i, "type").unwrap_or_else(|| "other".to_string()),
            })
            .collect();
        results.push(FactCheckResult {
            evaluator_id: evaluator_id.clone(),
            draft_id: string_field(r, "draft_id"),
            issues,
            overall_confidence: numeric_field(r, "overall_confidence")?,
            summary: string_field(r, "summary"),
        });
    }
    Ok(results)
}

/// Decode a rubric-shaped response into a [`RubricEvaluation`].
///
/// Used for both the initial scoring stage and the rubric embedded in the
/// final judge's response. Fails only on non-numeric `score` /
/// `overall_score` values.
pub fn decode_rubric_evaluation(
    evaluator_id: &EvaluatorId,
    resp: &Value,
) -> Result<RubricEvaluation, DecodeError> {
    let mut per_draft = Vec::new();
    for rd in object_list_field(resp, "per_draft") {
        let mut dimension_scores = Vec::new();
        for d in object_list_field(rd, "dimension_scores") {
            dimension_scores.push(RubricDimensionScore {
                name: string_field(d, "name"),
                score: numeric_field(d, "score")?,
                justification: string_field(d, "justification"),
            });
        }
        per_draft.push(RubricScoresForDraft {
            draft_id: string_field(rd, "draft_id"),
            dimension_scores,
            overall_score: numeric_field(rd, "overall_score")?,
            summary: string_field(rd, "summary"),
        });
    }
    Ok(RubricEvaluation {
        evaluator_id: evaluator_id.clone(),
        dimensions: string_list_field(resp, "dimensions"),
        per_draft,
        ranking: string_list_field(resp, "ranking"),
        rationale_for_ranking: string_field(resp, "rationale_for_ranking"),
    })
}

/// Decode the synthesizer response into an [`EditPlan`]. Total.
pub fn decode_edit_plan(evaluator_id: &EvaluatorId, resp: &Value) -> EditPlan {
    let section_instructions = object_list_field(resp, "section_instructions")
        .iter()
        .map(|si| SectionInstruction {
            section_label: string_field(si, "section_label"),
            base_from_draft: opt_string_field(si, "base_from_draft"),
            actions: string_list_field(si, "actions"),
            notes: string_field(si, "notes"),
        })
        .collect();
    let reuse_suggestions = object_list_field(resp, "reuse_suggestions")
        .iter()
        .map(|rs| ReuseSuggestion {
            from_draft: string_field(rs, "from_draft"),
            what_to_reuse: string_field(rs, "what_to_reuse"),
        })
        .collect();
    EditPlan {
        evaluator_id: evaluator_id.clone(),
        chosen_base_draft: string_field(resp, "chosen_base_draft"),
        global_strategy: string_field(resp, "global_strategy"),
        section_instructions,
        reuse_suggestions,
        open_questions: string_list_field(resp, "open_questions"),
    }
}

/// Decode one worker's revision response into a version-2 [`Revision`].
///
/// The new draft id is always `{worker_id}_v2`; synthesized uncertainty ids
/// use the `{worker_id}_v2_u{index}` pattern. Total.
pub fn decode_revision(worker_id: &str, from_draft_id: &str, resp: &Value) -> Revision {
    let new_draft_id = format!("{worker_id}_v2");
    Revision {
        from_draft_id: from_draft_id.to_string(),
        worker_id: worker_id.to_string(),
        version: 2,
        content: string_field(resp, "revised_draft"),
        change_summary: wrapped_string_list_field(resp, "change_summary"),
        updated_uncertainties: decode_uncertainties(
            resp.get("updated_uncertainties"),
            &new_draft_id,
        ),
        draft_id: new_draft_id,
    }
}

/// Decode the final judge's response into a [`FinalDecision`].
///
/// The response carries a full rubric evaluation over the revisions plus
/// `winner_draft_id` and `reasoning`; the decision's ranking is lifted from
/// the embedded rubric. Fails only on non-numeric score values.
pub fn decode_final_decision(
    evaluator_id: &EvaluatorId,
    resp: &Value,
) -> Result<FinalDecision, DecodeError> {
    let rubric_evaluation = decode_rubric_evaluation(evaluator_id, resp)?;
    Ok(FinalDecision {
        evaluator_id: evaluator_id.clone(),
        winner_draft_id: string_field(resp, "winner_draft_id"),
        ranking: rubric_evaluation.ranking.clone(),
        reasoning: string_field(resp, "reasoning"),
        rubric_evaluation,
    })
}
