pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_content_length;
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/screen",
            post(handlers::handle_screen).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::LlmClient;
    use crate::screening::ranking::LlmRanker;
    use crate::state::test_state;

    #[tokio::test]
    async fn test_health_reports_service_name() {
        let ranker = Arc::new(LlmRanker(LlmClient::new(None, "gemini/gemini-2.0-flash").unwrap()));
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(ranker, dir.path()));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "recruitai");
    }
}
