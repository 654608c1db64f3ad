//! Candidate ranking: builds the ranking prompt, calls the model, and
//! normalizes whatever comes back into `Candidate` records.
//!
//! `AppState` holds an `Arc<dyn CandidateRanker>`; `LlmRanker` is the production
//! backend and tests swap in fixed rankers.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ARRAY_ONLY, RECRUITER_PERSONA};
use crate::llm_client::{strip_json_fences, LlmClient};
use crate::models::candidate::{Candidate, Recommendation};
use crate::screening::prompts::{RANKING_PROMPT_TEMPLATE, SPECIAL_INSTRUCTIONS_TEMPLATE};

const JD_PROMPT_CHARS: usize = 4000;
const RESUME_PROMPT_CHARS: usize = 3000;
const DEFAULT_SCORE: u32 = 50;
const DEFAULT_ASSESSMENT: &str = "No assessment provided.";
const FALLBACK_ASSESSMENT: &str = "AI analysis failed to format as JSON. Please try again.";
/// Keys under which models sometimes nest the ranked list when forced into JSON-object mode.
const WRAPPER_KEYS: [&str; 3] = ["candidates", "rankings", "ranked_list"];

/// A résumé whose text has been extracted and is ready for ranking.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub name: String,
    pub filename: String,
    pub text: String,
}

#[async_trait]
pub trait CandidateRanker: Send + Sync {
    async fn rank(
        &self,
        jd_text: &str,
        resumes: &[ResumeDocument],
        special_instructions: &str,
    ) -> Result<Vec<Candidate>, AppError>;
}

/// Ranks candidates with a single LLM call.
pub struct LlmRanker(pub LlmClient);

#[async_trait]
impl CandidateRanker for LlmRanker {
    async fn rank(
        &self,
        jd_text: &str,
        resumes: &[ResumeDocument],
        special_instructions: &str,
    ) -> Result<Vec<Candidate>, AppError> {
        let prompt = build_ranking_prompt(jd_text, resumes, special_instructions);
        info!(
            model = self.0.model(),
            candidates = resumes.len(),
            "Requesting candidate ranking"
        );

        let reply = self
            .0
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        Ok(parse_ranking(&reply, resumes))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt construction
// ────────────────────────────────────────────────────────────────────────────

pub fn build_ranking_prompt(
    jd_text: &str,
    resumes: &[ResumeDocument],
    special_instructions: &str,
) -> String {
    let resumes_text = resumes
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "--- CANDIDATE {}: {} ---\n{}",
                i + 1,
                r.name,
                truncate_chars(&r.text, RESUME_PROMPT_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let special_section = if special_instructions.is_empty() {
        String::new()
    } else {
        fill_template(
            SPECIAL_INSTRUCTIONS_TEMPLATE,
            &[("special_instructions", special_instructions)],
        )
    };

    fill_template(
        RANKING_PROMPT_TEMPLATE,
        &[
            ("persona", RECRUITER_PERSONA),
            ("jd_text", truncate_chars(jd_text, JD_PROMPT_CHARS)),
            ("special_section", &special_section),
            ("resumes_text", &resumes_text),
            ("json_only", JSON_ARRAY_ONLY),
        ],
    )
}

/// Substitutes `{key}` placeholders in one left-to-right pass, so text pulled
/// from uploads is never re-scanned for placeholders.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find(|(key, _)| {
            tail.strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response normalization
// ────────────────────────────────────────────────────────────────────────────

/// Turns raw model output into ranked candidates.
///
/// Unparseable output does not fail the request: every résumé is returned
/// with a zero score and an assessment asking the recruiter to retry.
pub fn parse_ranking(reply: &str, resumes: &[ResumeDocument]) -> Vec<Candidate> {
    let value: Value = match serde_json::from_str(strip_json_fences(reply)) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to parse AI response as JSON: {e}");
            error!("Response was: {}", truncate_chars(reply, 500));
            return fallback_ranking(resumes);
        }
    };

    unwrap_candidate_list(value)
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .enumerate()
        .map(|(i, map)| normalize_candidate(i, map))
        .collect()
}

fn unwrap_candidate_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in WRAPPER_KEYS {
                if let Some(Value::Array(_)) = map.get(key) {
                    if let Some(Value::Array(items)) = map.remove(key) {
                        return items;
                    }
                }
            }
            vec![Value::Object(map)]
        }
        other => vec![other],
    }
}

fn normalize_candidate(index: usize, map: Map<String, Value>) -> Candidate {
    let rank = index as u32 + 1;
    Candidate {
        rank,
        name: map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Candidate {rank}")),
        score: map.get("score").map(coerce_score).unwrap_or(DEFAULT_SCORE),
        recommendation: map
            .get("recommendation")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Recommendation::Consider.label().to_string()),
        assessment: Some(
            map.get("assessment")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_ASSESSMENT.to_string()),
        ),
        strengths: string_list(map.get("strengths")),
        gaps: string_list(map.get("gaps")),
    }
}

/// Integer-coerces a score the way a loose JSON producer might send it,
/// then clamps to 0–100. Anything uncoercible scores 50.
fn coerce_score(value: &Value) -> u32 {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    raw.map(|n| n.clamp(0, 100) as u32).unwrap_or(DEFAULT_SCORE)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn fallback_ranking(resumes: &[ResumeDocument]) -> Vec<Candidate> {
    resumes
        .iter()
        .enumerate()
        .map(|(i, r)| Candidate {
            rank: i as u32 + 1,
            name: r.name.clone(),
            score: 0,
            recommendation: Recommendation::Consider.label().to_string(),
            assessment: Some(FALLBACK_ASSESSMENT.to_string()),
            strengths: vec![],
            gaps: vec![],
        })
        .collect()
}
