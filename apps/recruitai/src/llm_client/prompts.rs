// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Closing instruction for prompts whose answer is parsed as a JSON array.
pub const JSON_ARRAY_ONLY: &str = "Only return the JSON array, nothing else.";

/// Persona line used by the screening prompts.
pub const RECRUITER_PERSONA: &str =
    "You are an expert technical recruiter and talent acquisition specialist.";
