//! LLM Client - HTTP client for the Gemini `generateContent` API
//!
//! One call per invocation, no retries. Images travel inline as base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::models::*;
use crate::config::LlmConfig;

/// LLM HTTP Client
pub struct LLMClient {
    http_client: Client,
    api_base: String,
    model_name: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl LLMClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LLMError> {
        let timeout = config.timeout_secs.map(Duration::from_secs);

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| LLMError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
            api_key: config.api_key.clone(),
            timeout,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Call generateContent and return the raw text of the first candidate
    ///
    /// `Ok(None)` means the provider answered but with no text part at all
    /// (blocked prompt, empty candidate list, image-only reply).
    pub async fn generate_content(&self, request: &LLMRequest) -> Result<Option<String>, LLMError> {
        if self.api_key.trim().is_empty() {
            return Err(LLMError::NotConfigured);
        }

        let body = GenerateContentRequest::from_request(request);
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model_name);

        tracing::debug!(
            "Calling LLM API: {} ({} parts, scenario={})",
            url,
            request.parts.len(),
            request.scenario.as_str()
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LLMError::Timeout(self.timeout.map(|t| t.as_secs()))
                } else {
                    LLMError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LLMError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LLMError::ApiError(format!("API error {}: {}", status, error_text)));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        if let Some(usage) = &reply.usage_metadata {
            tracing::debug!(
                "LLM usage: input_tokens={}, output_tokens={}",
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0)
            );
        }

        Ok(reply.into_text())
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: Instruction<'a>,
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct Instruction<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a LLMRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => RequestPart::Text { text },
                ContentPart::Image(image) => RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type(),
                        data: BASE64.encode(image.data()),
                    },
                },
            })
            .collect();

        Self {
            system_instruction: Instruction {
                parts: vec![RequestPart::Text { text: request.system_prompt }],
            },
            contents: vec![RequestContent { role: "user", parts }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i64>,
    candidates_token_count: Option<i64>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let texts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() { None } else { Some(texts.concat()) }
    }
}
