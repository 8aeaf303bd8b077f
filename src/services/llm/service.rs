//! LLM Service Trait and Implementation
//!
//! The gateway seam: one provider call per request, normalised into a JSON
//! value or a [`GatewayFailure`].

use async_trait::async_trait;
use serde_json::Value;

use super::client::LLMClient;
use super::models::*;
use crate::config::LlmConfig;

/// LLM Service - the core abstraction the diagnostic operations depend on
#[async_trait]
pub trait LLMService: Send + Sync {
    /// Issue `request` and parse the reply as JSON
    async fn generate_json(&self, request: LLMRequest) -> Result<Value, GatewayFailure>;
}

/// Gateway backed by the Gemini HTTP client
pub struct LLMServiceImpl {
    client: LLMClient,
}

impl LLMServiceImpl {
    pub fn new(config: &LlmConfig) -> Result<Self, LLMError> {
        Ok(Self { client: LLMClient::new(config)? })
    }

    /// Create with custom client (for testing)
    pub fn with_client(client: LLMClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LLMService for LLMServiceImpl {
    async fn generate_json(&self, request: LLMRequest) -> Result<Value, GatewayFailure> {
        let scenario = request.scenario;
        tracing::info!(
            "Sending {} request to LLM (model={})",
            scenario.as_str(),
            self.client.model_name()
        );

        let start = std::time::Instant::now();
        let result = self.client.generate_content(&request).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let text = result.map_err(|e| {
            tracing::error!("LLM call failed for {} after {}ms: {}", scenario.as_str(), latency_ms, e);
            GatewayFailure::new(scenario, e)
        })?;
        tracing::info!("Received {} response from LLM in {}ms", scenario.as_str(), latency_ms);

        extract_json(text.as_deref()).map_err(|cause| {
            tracing::warn!("Error parsing LLM response for {}: {}", scenario.as_str(), cause);
            GatewayFailure::new(scenario, cause)
        })
    }
}

/// Remove markdown code-fence markers and surrounding whitespace
///
/// Every ```` ```json ```` and ```` ``` ```` marker is removed, wherever it
/// appears, so applying this twice gives the same result as applying it once.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim().replace("```json", "").replace("```", "").trim().to_string()
}

/// Turn the provider's raw text into JSON
pub fn extract_json(raw: Option<&str>) -> Result<Value, GatewayFailureCause> {
    let raw = raw.ok_or(GatewayFailureCause::EmptyResponse)?;
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(GatewayFailureCause::EmptyResponse);
    }
    serde_json::from_str(&cleaned).map_err(|e| GatewayFailureCause::InvalidJson(e.to_string()))
}
