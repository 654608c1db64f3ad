// Screening service: multipart intake, text extraction, LLM ranking.
// All LLM calls go through llm_client; ranking is pluggable via CandidateRanker.

pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod ranking;
pub mod uploads;
