use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::AppState;
use super::error::AppResult;
use crate::types::{FeedbackRequest, FeedbackResponse};

/// `POST /feedback`
///
/// Runs the schema gate first; only a conforming document reaches the model.
/// Everything past the gate answers 200, degraded or not.
#[instrument(name = "feedback_route", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> AppResult<Json<FeedbackResponse>> {
    let Json(request) = payload?;

    let validation = state.gate.validate(&request.document);
    if let Err(e) = validation.into_result() {
        warn!("Rejected document: {}", e);
        return Err(e.into());
    }

    let response = state.service.get_feedback(&request.document).await;
    info!(issues = response.issues.len(), "Feedback ready");

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{
        CompletionProvider, CompletionRequest, CompletionResponse, ContentItem, OutputItem,
    };
    use crate::feedback::{FeedbackService, FeedbackSettings};
    use crate::schema::SchemaGate;
    use crate::types::Result;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionProvider for FixedProvider {
        async fn create(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let payload = FeedbackResponse::fallback("Looks fine.", r#"{"extends":["config:recommended"]}"#);
            Ok(CompletionResponse::completed(vec![OutputItem::message(vec![
                ContentItem::Structured(payload),
            ])]))
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-model"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn state() -> (Arc<AppState>, Arc<FixedProvider>) {
        let provider = Arc::new(FixedProvider {
            calls: AtomicUsize::new(0),
        });
        let service = FeedbackService::new(provider.clone(), FeedbackSettings::default());
        let state = AppState {
            service: Arc::new(service),
            gate: Arc::new(SchemaGate::bundled().unwrap()),
        };
        (Arc::new(state), provider)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_document_returns_feedback() {
        let (state, provider) = state();
        let request = FeedbackRequest::new(r#"{"extends":["config:base"]}"#);

        let Json(response) = feedback(State(state), Ok(Json(request))).await.unwrap();

        assert_eq!(response.summary, "Looks fine.");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_document_short_circuits() {
        let (state, provider) = state();
        let request = FeedbackRequest::new("{not json");

        let err = feedback(State(state), Ok(Json(request))).await.unwrap_err();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "BAD_REQUEST");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Invalid Renovate configuration: Invalid JSON: "));
    }

    #[tokio::test]
    async fn test_schema_violation_short_circuits() {
        let (state, provider) = state();
        let request = FeedbackRequest::new(r#"{"automerge": "sometimes"}"#);

        let err = feedback(State(state), Ok(Json(request))).await.unwrap_err();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        let body = body_json(err.into_response()).await;
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid Renovate configuration: JSON validation failed:")
        );
    }

    /// Serve the full router on a loopback port
    async fn spawn_router(state: Arc<AppState>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, crate::server::router(state)).await.unwrap();
        });
        format!("http://{}", address)
    }

    #[tokio::test]
    async fn test_router_feedback_round_trip() {
        let (state, provider) = state();
        let base = spawn_router(state).await;

        let response = reqwest::Client::new()
            .post(format!("{}/feedback", base))
            .json(&serde_json::json!({ "renovateJson": r#"{"extends":["config:base"]}"# }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["summary"], "Looks fine.");
        assert!(body["issues"].as_array().unwrap().is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_router_malformed_body_is_bad_request() {
        let (state, provider) = state();
        let base = spawn_router(state).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/feedback", base))
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "BAD_REQUEST");

        let response = client
            .post(format!("{}/feedback", base))
            .header("Content-Type", "text/plain")
            .body(r#"{"renovateJson":"{}"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_router_schema_violation_is_bad_request() {
        let (state, provider) = state();
        let base = spawn_router(state).await;

        let response = reqwest::Client::new()
            .post(format!("{}/feedback", base))
            .json(&serde_json::json!({ "renovateJson": r#"{"automerge":1}"# }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "BAD_REQUEST");
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Invalid Renovate configuration: JSON validation failed:\n- "));
        assert!(message.contains("automerge"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_router_health() {
        let (state, _) = state();
        let base = spawn_router(state).await;

        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_router_allows_any_origin() {
        let (state, _) = state();
        let base = spawn_router(state).await;
        let client = reqwest::Client::new();

        let preflight = client
            .request(reqwest::Method::OPTIONS, format!("{}/feedback", base))
            .header("Origin", "https://example.github.io")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await
            .unwrap();
        assert!(preflight.status().is_success());
        assert_eq!(
            preflight.headers()["access-control-allow-origin"],
            "*"
        );

        let response = client
            .post(format!("{}/feedback", base))
            .header("Origin", "https://example.github.io")
            .json(&serde_json::json!({ "renovateJson": "{oops" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_health() {
        let Json(status) = health().await;
        assert_eq!(serde_json::to_value(status).unwrap()["status"], "ok");
    }
}
