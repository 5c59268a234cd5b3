//! OpenAI Responses API Provider
//!
//! Posts structured-output requests to `{base_url}/responses` and decodes the
//! reply into [`CompletionResponse`]. A 400 that names the `reasoning` field
//! is classified as an unsupported parameter so the caller can re-issue the
//! request without it.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{CompletionProvider, CompletionRequest, CompletionResponse};
use crate::ai::timeout::TimeoutConfig;
use crate::config::OpenAiConfig;
use crate::constants::completion;
use crate::types::{ErrorCategory, ErrorClassifier, FeedbackError, LlmError, Result};

const PROVIDER_NAME: &str = "openai";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let timeouts = TimeoutConfig::from_openai(&config);

        let api_key_str = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                FeedbackError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(timeouts.completion_call)
            .connect_timeout(timeouts.connection)
            .build()
            .map_err(|e| FeedbackError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn create(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        info!(
            "Requesting structured feedback (model: {}, max_output_tokens: {}, reasoning: {})",
            request.model,
            request.max_output_tokens,
            request.reasoning.is_some()
        );

        let start_time = Instant::now();

        let response = self
            .client
            .post(self.endpoint("responses"))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI API error ({}): {}", status, body);
            return Err(classify_api_error(status.as_u16(), &body).into());
        }

        let body: CompletionResponse = response.json().await.map_err(|e| {
            LlmError::with_provider(
                ErrorCategory::ParseError,
                format!("Failed to parse OpenAI response: {}", e),
                PROVIDER_NAME,
            )
        })?;

        debug!(
            "OpenAI response received in {}ms (id: {:?}, status: {})",
            start_time.elapsed().as_millis(),
            body.id,
            body.status_label()
        );

        Ok(body)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("OpenAI API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("OpenAI API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("OpenAI API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    param: Option<String>,
}

/// Map a non-2xx reply onto a categorized error
fn classify_api_error(status: u16, body: &str) -> LlmError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => ErrorClassifier::classify_rejection(
            status,
            &envelope.error.message,
            envelope.error.param.as_deref(),
            completion::REASONING_PARAM,
            PROVIDER_NAME,
        ),
        Err(_) => ErrorClassifier::classify_http_status(
            status,
            &format!("OpenAI API error ({}): {}", status, body),
            PROVIDER_NAME,
        ),
    }
}

fn classify_send_error(err: reqwest::Error) -> FeedbackError {
    if err.is_timeout() || err.is_connect() {
        LlmError::with_provider(
            ErrorCategory::Network,
            format!("OpenAI request failed: {}", err),
            PROVIDER_NAME,
        )
        .into()
    } else {
        FeedbackError::LlmApi(format!("OpenAI request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{CompletionAttempt, ContentItem, ReasoningEffort};
    use crate::feedback::FeedbackService;
    use crate::types::FeedbackResponse;
    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Loopback stand-in for the Responses API: replays scripted replies and
    /// records the authorization header and body of every request
    #[derive(Default)]
    struct FakeApi {
        replies: Mutex<VecDeque<(StatusCode, Value)>>,
        seen: Mutex<Vec<(Option<String>, Value)>>,
    }

    impl FakeApi {
        fn bodies(&self) -> Vec<Value> {
            self.seen.lock().unwrap().iter().map(|(_, body)| body.clone()).collect()
        }
    }

    async fn fake_responses(
        State(api): State<Arc<FakeApi>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        api.seen.lock().unwrap().push((auth, body));

        let (status, reply) = api.replies.lock().unwrap().pop_front().unwrap_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": { "message": "script exhausted" } }),
        ));
        (status, Json(reply))
    }

    async fn spawn_fake_api(replies: Vec<(StatusCode, Value)>) -> (Arc<FakeApi>, OpenAiConfig) {
        let api = Arc::new(FakeApi {
            replies: Mutex::new(replies.into()),
            ..FakeApi::default()
        });
        let app = Router::new()
            .route("/v1/responses", post(fake_responses))
            .with_state(api.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = OpenAiConfig {
            base_url: format!("http://{}/v1/", address),
            ..config_with_key()
        };
        (api, config)
    }

    fn completed_reply(summary: &str) -> (StatusCode, Value) {
        let payload = FeedbackResponse::fallback(summary, r#"{"extends":["config:recommended"]}"#);
        (
            StatusCode::OK,
            json!({
                "id": "resp_1",
                "model": "gpt-5-mini",
                "status": "completed",
                "output": [
                    { "type": "reasoning", "id": "rs_1", "summary": [] },
                    { "type": "message", "role": "assistant", "content": [
                        { "type": "output_text", "text": serde_json::to_string(&payload).unwrap() }
                    ]}
                ]
            }),
        )
    }

    fn truncated_reply() -> (StatusCode, Value) {
        (
            StatusCode::OK,
            json!({
                "id": "resp_2",
                "status": "incomplete",
                "incomplete_details": { "reason": "max_output_tokens" },
                "output": []
            }),
        )
    }

    fn reasoning_rejected_reply() -> (StatusCode, Value) {
        (
            StatusCode::BAD_REQUEST,
            json!({ "error": {
                "message": "Unsupported parameter: 'reasoning.effort' is not supported with this model.",
                "type": "invalid_request_error",
                "param": "reasoning.effort",
                "code": "unsupported_parameter"
            }}),
        )
    }

    fn structured_request(provider: &OpenAiProvider) -> CompletionRequest {
        let attempt = CompletionAttempt::new("Renovate JSON:\n{}", 1200);
        CompletionRequest::structured(provider.model(), &attempt, "be brief", json!({}))
            .with_reasoning(ReasoningEffort::Minimal)
    }

    fn config_with_key() -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test-key".to_string()),
            base_url: "https://example.test/v1/".to_string(),
            ..OpenAiConfig::default()
        }
    }

    #[test]
    fn test_new_trims_base_url() {
        let provider = OpenAiProvider::new(config_with_key()).unwrap();
        assert_eq!(
            provider.endpoint("responses"),
            "https://example.test/v1/responses"
        );
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-5-mini");
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = OpenAiProvider::new(config_with_key()).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-test-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_reasoning_rejection_is_unsupported_parameter() {
        let body = r#"{"error":{"message":"Unsupported parameter: 'reasoning.effort' is not supported with this model.","type":"invalid_request_error","param":"reasoning.effort","code":"unsupported_parameter"}}"#;
        let err = classify_api_error(400, body);
        assert_eq!(err.category, ErrorCategory::UnsupportedParameter);
        assert_eq!(err.provider.as_deref(), Some("openai"));
    }

    #[test]
    fn test_other_rejections_keep_http_category() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","param":null,"code":"invalid_api_key"}}"#;
        assert_eq!(classify_api_error(401, body).category, ErrorCategory::Auth);

        let body = r#"{"error":{"message":"Invalid schema for response_format","param":"text.format.schema"}}"#;
        assert_eq!(
            classify_api_error(400, body).category,
            ErrorCategory::BadRequest
        );
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let (api, config) = spawn_fake_api(vec![completed_reply("OK")]).await;
        let provider = OpenAiProvider::new(config).unwrap();

        let response = provider.create(&structured_request(&provider)).await.unwrap();

        assert_eq!(response.id.as_deref(), Some("resp_1"));
        assert!(!response.is_incomplete());
        assert!(matches!(
            response.contents().next(),
            Some(ContentItem::Structured(payload)) if payload.summary == "OK"
        ));

        let seen = api.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer sk-test-key"));
        let body = &seen[0].1;
        assert_eq!(body["model"], "gpt-5-mini");
        assert_eq!(body["max_output_tokens"], 1200);
        assert_eq!(body["reasoning"]["effort"], "minimal");
        assert_eq!(body["text"]["format"]["type"], "json_schema");
    }

    #[tokio::test]
    async fn test_create_classifies_error_replies() {
        let (_api, config) = spawn_fake_api(vec![
            reasoning_rejected_reply(),
            (
                StatusCode::UNAUTHORIZED,
                json!({ "error": { "message": "Incorrect API key provided", "param": null } }),
            ),
        ])
        .await;
        let provider = OpenAiProvider::new(config).unwrap();
        let request = structured_request(&provider);

        let err = provider.create(&request).await.unwrap_err();
        assert!(err.is_unsupported_parameter());

        let err = provider.create(&request).await.unwrap_err();
        assert!(!err.is_unsupported_parameter());
        assert!(matches!(
            err,
            FeedbackError::Llm(LlmError { category: ErrorCategory::Auth, .. })
        ));
    }

    #[tokio::test]
    async fn test_feedback_flow_over_the_wire() {
        let (api, config) = spawn_fake_api(vec![
            reasoning_rejected_reply(),
            truncated_reply(),
            completed_reply("OK"),
        ])
        .await;
        let service = FeedbackService::from_config(&config).unwrap();

        let result = service.get_feedback(r#"{"extends":["config:base"]}"#).await;
        assert_eq!(result.summary, "OK");

        let bodies = api.bodies();
        let budgets: Vec<u64> = bodies
            .iter()
            .filter_map(|b| b["max_output_tokens"].as_u64())
            .collect();
        assert_eq!(budgets, vec![1200, 1200, 4096]);
        let reasoning: Vec<bool> = bodies.iter().map(|b| b.get("reasoning").is_some()).collect();
        assert_eq!(reasoning, vec![true, false, false]);
        assert!(bodies.iter().all(|b| b["input"] == bodies[0]["input"]));
    }

    #[test]
    fn test_unparseable_error_body() {
        let err = classify_api_error(502, "<html>Bad Gateway</html>");
        assert_eq!(err.category, ErrorCategory::Transient);
        assert!(err.message.contains("502"));
    }
}
