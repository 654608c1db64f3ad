/// LLM client: the single point of entry for all model calls in RecruitAI.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through this module.
///
/// The provider is chosen from the configured model name, `provider/model`
/// (e.g. `gemini/gemini-2.0-flash`, `anthropic/claude-sonnet-4-5`,
/// `openai/gpt-4o-mini`). A bare model name is treated as Gemini.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.3;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("AI_API_KEY is not configured. Please add it to your .env file.")]
    MissingApiKey,

    #[error("Unsupported model provider '{0}' (expected gemini, anthropic or openai)")]
    UnsupportedProvider(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Anthropic,
    OpenAi,
}

impl Provider {
    /// Splits `provider/model` into its parts.
    pub fn parse_model(model_name: &str) -> Result<(Provider, String), LlmError> {
        let Some((prefix, model)) = model_name.split_once('/') else {
            return Ok((Provider::Gemini, model_name.to_string()));
        };
        let provider = match prefix.to_ascii_lowercase().as_str() {
            "gemini" => Provider::Gemini,
            "anthropic" => Provider::Anthropic,
            "openai" => Provider::OpenAi,
            other => return Err(LlmError::UnsupportedProvider(other.to_string())),
        };
        Ok((provider, model.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types, one set per provider
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat>,
}

#[derive(Debug, Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// Error envelope shared closely enough by all three providers:
/// `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by the screening service.
/// Wraps the provider APIs with retry logic and returns the raw completion text.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    provider: Provider,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, model_name: &str) -> Result<Self, LlmError> {
        let (provider, model) = Provider::parse_model(model_name)?;
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            api_key,
            provider,
            model,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// JSON mode is only requested from model families that honour it.
    fn wants_json_mode(&self) -> bool {
        self.model.contains("gpt") || self.model.contains("gemini")
    }

    /// Sends a single user prompt and returns the completion text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.build_request(api_key, prompt).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let text = self.extract_text(&body)?;
            debug!(
                provider = ?self.provider,
                model = %self.model,
                chars = text.len(),
                "LLM call succeeded"
            );
            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    fn build_request(&self, api_key: &str, prompt: &str) -> reqwest::RequestBuilder {
        let messages = vec![ChatMessage {
            role: "user",
            content: prompt,
        }];

        match self.provider {
            Provider::Anthropic => self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&AnthropicRequest {
                    model: &self.model,
                    max_tokens: MAX_TOKENS,
                    temperature: TEMPERATURE,
                    messages,
                }),
            Provider::OpenAi => self.client.post(OPENAI_API_URL).bearer_auth(api_key).json(
                &OpenAiRequest {
                    model: &self.model,
                    messages,
                    temperature: TEMPERATURE,
                    max_tokens: MAX_TOKENS,
                    response_format: self.wants_json_mode().then_some(OpenAiResponseFormat {
                        format_type: "json_object",
                    }),
                },
            ),
            Provider::Gemini => self
                .client
                .post(format!("{GEMINI_API_BASE}/{}:generateContent", self.model))
                .header("x-goog-api-key", api_key)
                .json(&GeminiRequest {
                    contents: vec![GeminiContent {
                        role: "user",
                        parts: vec![GeminiPart { text: prompt }],
                    }],
                    generation_config: GeminiGenerationConfig {
                        temperature: TEMPERATURE,
                        max_output_tokens: MAX_TOKENS,
                        response_mime_type: self
                            .wants_json_mode()
                            .then_some("application/json"),
                    },
                }),
        }
    }

    /// Pulls the completion text out of a provider's success body.
    fn extract_text(&self, body: &str) -> Result<String, LlmError> {
        let text = match self.provider {
            Provider::Anthropic => {
                let parsed: AnthropicResponse = serde_json::from_str(body)?;
                debug!(
                    "Anthropic usage: input_tokens={}, output_tokens={}",
                    parsed.usage.input_tokens, parsed.usage.output_tokens
                );
                parsed
                    .content
                    .into_iter()
                    .find(|b| b.block_type == "text")
                    .and_then(|b| b.text)
            }
            Provider::OpenAi => {
                let parsed: OpenAiResponse = serde_json::from_str(body)?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
            }
            Provider::Gemini => {
                let parsed: GeminiResponse = serde_json::from_str(body)?;
                parsed
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content)
                    .map(|c| {
                        c.parts
                            .into_iter()
                            .filter_map(|p| p.text)
                            .collect::<String>()
                    })
            }
        };

        text.map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // The info string (`json`, `JSON`, `javascript`, ...) runs to the end of the opening line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[{\"rank\": 1}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"rank\": 1}]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_with_any_info_string() {
        for tag in ["JSON", "javascript", "json5", ""] {
            let input = format!("```{tag}\n[{{\"rank\": 1}}]\n```");
            assert_eq!(strip_json_fences(&input), "[{\"rank\": 1}]", "tag {tag:?}");
        }
        assert_eq!(strip_json_fences("```JSON [1]```"), "[1]");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_model_with_provider_prefix() {
        let (provider, model) = Provider::parse_model("anthropic/claude-sonnet-4-5").unwrap();
        assert_eq!(provider, Provider::Anthropic);
        assert_eq!(model, "claude-sonnet-4-5");

        let (provider, model) = Provider::parse_model("OpenAI/gpt-4o-mini").unwrap();
        assert_eq!(provider, Provider::OpenAi);
        assert_eq!(model, "gpt-4o-mini");
    }

    #[test]
    fn test_parse_model_bare_name_defaults_to_gemini() {
        let (provider, model) = Provider::parse_model("gemini-2.0-flash").unwrap();
        assert_eq!(provider, Provider::Gemini);
        assert_eq!(model, "gemini-2.0-flash");
    }

    #[test]
    fn test_parse_model_unknown_provider_is_error() {
        let err = Provider::parse_model("cohere/command-r").unwrap_err();
        assert!(matches!(err, LlmError::UnsupportedProvider(p) if p == "cohere"));
    }

    #[test]
    fn test_json_mode_only_for_gpt_and_gemini() {
        assert!(LlmClient::new(None, "openai/gpt-4o").unwrap().wants_json_mode());
        assert!(LlmClient::new(None, "gemini/gemini-2.0-flash")
            .unwrap()
            .wants_json_mode());
        assert!(!LlmClient::new(None, "anthropic/claude-sonnet-4-5")
            .unwrap()
            .wants_json_mode());
    }

    #[tokio::test]
    async fn test_complete_without_api_key_fails_fast() {
        let client = LlmClient::new(None, "gemini/gemini-2.0-flash").unwrap();
        let err = client.complete("rank these").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn test_extract_text_per_provider() {
        let gemini = LlmClient::new(None, "gemini/gemini-2.0-flash").unwrap();
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"[1,"},{"text":"2]"}]}}]}"#;
        assert_eq!(gemini.extract_text(body).unwrap(), "[1,2]");

        let anthropic = LlmClient::new(None, "anthropic/claude-sonnet-4-5").unwrap();
        let body = r#"{"content":[{"type":"text","text":" []\n"}],"usage":{"input_tokens":3,"output_tokens":1}}"#;
        assert_eq!(anthropic.extract_text(body).unwrap(), "[]");

        let openai = LlmClient::new(None, "openai/gpt-4o").unwrap();
        let body = r#"{"choices":[{"message":{"content":"{\"candidates\":[]}"}}]}"#;
        assert_eq!(openai.extract_text(body).unwrap(), "{\"candidates\":[]}");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let gemini = LlmClient::new(None, "gemini/gemini-2.0-flash").unwrap();
        let err = gemini.extract_text(r#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }
}
