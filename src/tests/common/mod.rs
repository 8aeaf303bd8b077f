// Common test utilities and helpers

use crate::services::llm::{
    GatewayFailure, LLMError, LLMRequest, LLMService, extract_json,
};
use crate::{AppState, api_router};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const BOUNDARY: &str = "autodiag-test-boundary";

pub use crate::services::llm::sample_images::{encoded as encoded_image, jpeg as jpeg_bytes};

enum Reply {
    Text(Option<String>),
    Transport(fn() -> LLMError),
}

/// Gateway double that runs the real text extraction on a scripted reply
pub struct FakeLLMService {
    reply: Reply,
    requests: Mutex<Vec<LLMRequest>>,
}

impl FakeLLMService {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::with_reply(Reply::Text(Some(text.to_string())))
    }

    pub fn without_text() -> Arc<Self> {
        Self::with_reply(Reply::Text(None))
    }

    pub fn failing(error: fn() -> LLMError) -> Arc<Self> {
        Self::with_reply(Reply::Transport(error))
    }

    fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self { reply, requests: Mutex::new(Vec::new()) })
    }

    pub fn requests(&self) -> std::sync::MutexGuard<'_, Vec<LLMRequest>> {
        self.requests.lock().expect("requests lock poisoned")
    }
}

#[async_trait]
impl LLMService for FakeLLMService {
    async fn generate_json(&self, request: LLMRequest) -> Result<Value, GatewayFailure> {
        let scenario = request.scenario;
        self.requests().push(request);

        match &self.reply {
            Reply::Text(text) => {
                extract_json(text.as_deref()).map_err(|cause| GatewayFailure::new(scenario, cause))
            },
            Reply::Transport(error) => Err(GatewayFailure::new(scenario, error())),
        }
    }
}

pub fn test_app(llm_service: Arc<FakeLLMService>) -> Router {
    api_router(Arc::new(AppState::new(llm_service)), 1024 * 1024)
}

async fn send(app: Router, request: Request) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("Failed to make request");
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

pub async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("Failed to create test request");
    send(app, request).await
}

pub async fn post_json(app: Router, path: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to create test request");
    send(app, request).await
}

/// POST a multipart form with text fields and an optional `file` part
pub async fn post_multipart(
    app: Router,
    path: &str,
    fields: &[(&str, &str)],
    file: Option<&[u8]>,
) -> (StatusCode, Value) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .expect("Failed to create test request");
    send(app, request).await
}
