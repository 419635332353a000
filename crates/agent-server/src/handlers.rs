//! HTTP Handlers

use axum::{extract::State, Json};
use serde::Serialize;

use agent_core::{
    chat::{ChatReply, ChatRequest},
    Catalog,
};
use agent_runtime::ProviderStatus;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub providers: Vec<ProviderStatus>,
    pub search_configured: bool,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        providers: state.providers.as_ref().clone(),
        search_configured: state.search_configured,
    })
}

/// Chat endpoint: answer string or error envelope, always 200
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatReply> {
    tracing::info!(
        model = %payload.model_name,
        provider = %payload.model_provider,
        messages = payload.messages.len(),
        "Chat request"
    );
    Json(state.chat.handle_chat(payload).await)
}

/// Providers, models and prompt templates
pub async fn catalog_handler(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::{chat_request, CountingInvoker};
    use agent_core::{chat::INVALID_MODEL_MESSAGE, InvokeError};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(invoker: Arc<CountingInvoker>) -> Router {
        let providers = vec![ProviderStatus { name: "OpenAI".into(), configured: true }];
        let state = AppState::new(invoker, Catalog::builtin(), providers, false);
        crate::router(state, "does-not-exist")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn post_chat(body: String) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_bare_string() {
        let invoker = CountingInvoker::answering(|| Ok("Hello!".into()));
        let body = serde_json::to_string(&chat_request("gpt-4o", &["Hi"])).unwrap();

        let (status, json) = send(app(invoker.clone()), post_chat(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!("Hello!"));
        assert_eq!(invoker.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_model_envelope() {
        let invoker = CountingInvoker::answering(|| Ok("unused".into()));
        let body = serde_json::to_string(&chat_request("not-a-real-model", &["Hi"])).unwrap();

        let (status, json) = send(app(invoker.clone()), post_chat(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["error"], INVALID_MODEL_MESSAGE);
        assert_eq!(json["code"], "INVALID_MODEL");
        assert_eq!(invoker.call_count(), 0);
    }

    #[tokio::test]
    async fn test_agent_failure_is_in_band() {
        let invoker = CountingInvoker::answering(|| Err(InvokeError::UnknownProvider("Nope".into())));
        let body = serde_json::to_string(&chat_request("gpt-4o", &["Hi"])).unwrap();

        let (status, json) = send(app(invoker), post_chat(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["error"], "❌ Invalid provider selected.");
        assert_eq!(json["code"], "INVALID_PROVIDER");
    }

    #[tokio::test]
    async fn test_malformed_payload_rejected_before_service() {
        let invoker = CountingInvoker::answering(|| Ok("unused".into()));
        let missing_field = r#"{"model_name": "gpt-4o", "messages": ["Hi"]}"#.to_string();

        let (status, _) = send(app(invoker.clone()), post_chat(missing_field)).await;
        assert!(status.is_client_error());

        let (status, _) = send(app(invoker.clone()), post_chat("not json".into())).await;
        assert!(status.is_client_error());
        assert_eq!(invoker.call_count(), 0);
    }

    #[tokio::test]
    async fn test_health_and_catalog() {
        let invoker = CountingInvoker::answering(|| Ok("unused".into()));

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, json) = send(app(invoker.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["providers"][0]["name"], "OpenAI");
        assert_eq!(json["search_configured"], false);

        let request = Request::builder().uri("/api/catalog").body(Body::empty()).unwrap();
        let (status, json) = send(app(invoker), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["providers"][1]["provider"], "OpenAI");
        assert_eq!(json["templates"][0]["name"], "Research Analyst");
    }
}
