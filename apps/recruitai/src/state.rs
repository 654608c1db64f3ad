use std::sync::Arc;

use crate::config::Config;
use crate::screening::ranking::CandidateRanker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable ranker. Default: `LlmRanker` over the configured model.
    pub ranker: Arc<dyn CandidateRanker>,
}

#[cfg(test)]
pub fn test_state(ranker: Arc<dyn CandidateRanker>, upload_dir: &std::path::Path) -> AppState {
    AppState {
        config: Config {
            ai_api_key: None,
            ai_model_name: crate::config::DEFAULT_MODEL.to_string(),
            upload_dir: upload_dir.to_path_buf(),
            max_content_length: crate::config::DEFAULT_MAX_CONTENT_LENGTH,
            port: 0,
            rust_log: "debug".to_string(),
        },
        ranker,
    }
}
