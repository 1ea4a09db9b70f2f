// [libs/infra/worker-client/src/client.rs]
//! The `LlmAdapter` trait is the seam between the analysis job controller
//! and whatever actually answers a prompt. [`ReqwestLlmAdapter`] is the
//! production implementation (a single bearer-authenticated HTTP endpoint);
//! [`MockLlmAdapter`] is a deterministic stand-in for tests that never
//! touches the network.

use crate::errors::ClientError;
use async_trait::async_trait;
use meridian_domain_ai_cortex::PromptRequest;
use meridian_domain_models::{LlmMetrics, TokenUsage};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, instrument};

/// What the job controller persists into an `AnalysisArtifact` once a
/// prompt resolves: the model's draft plus the metrics it reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub ai_draft_json: serde_json::Value,
    pub ai_draft_text: String,
    pub llm_metrics: LlmMetrics,
}

#[async_trait]
pub trait LlmAdapter: Send + Sync {
    async fn generate(&self, request: &PromptRequest) -> Result<LlmResponse, ClientError>;
}

/// Wire payload sent to the endpoint; mirrors `PromptRequest` field for
/// field so the adapter contract stays a flat JSON object on the wire.
#[derive(Serialize)]
struct GenerateRequestPayload<'a> {
    kind: &'a str,
    project_context: &'a str,
    device_context: Option<&'a str>,
    include_original: bool,
}

#[derive(Deserialize)]
struct GenerateResponsePayload {
    ai_draft_json: serde_json::Value,
    ai_draft_text: String,
    model_name: String,
    inference_time_ms: u64,
    token_usage: TokenUsagePayload,
}

#[derive(Deserialize)]
struct TokenUsagePayload {
    prompt: u32,
    completion: u32,
    total: u32,
}

/// Production adapter: one bearer-authenticated HTTP client against a
/// configured generation endpoint.
pub struct ReqwestLlmAdapter {
    http: Client,
    endpoint_url: String,
}

impl ReqwestLlmAdapter {
    pub fn new(endpoint_url: String, api_key: String) -> Result<Self, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth_value = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ClientError::Configuration("API key contains invalid header characters".into()))?;
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(ClientError::NetworkFault)?;

        Ok(Self {
            http,
            endpoint_url: endpoint_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LlmAdapter for ReqwestLlmAdapter {
    #[instrument(skip(self, request))]
    async fn generate(&self, request: &PromptRequest) -> Result<LlmResponse, ClientError> {
        let kind_json = serde_json::to_value(request.kind).map_err(ClientError::DecodingFault)?;
        let kind = kind_json.as_str().unwrap_or("unknown").to_string();

        let payload = GenerateRequestPayload {
            kind: &kind,
            project_context: &request.project_context,
            device_context: request.device_context.as_deref(),
            include_original: request.include_original,
        };

        let response = self
            .http
            .post(format!("{}/v1/generate", self.endpoint_url))
            .json(&payload)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "LLM endpoint rejected generate request");
            return Err(ClientError::ServerRejection(format!("HTTP {status}: {body}")));
        }

        let parsed: GenerateResponsePayload = response.json().await?;

        Ok(LlmResponse {
            ai_draft_json: parsed.ai_draft_json,
            ai_draft_text: parsed.ai_draft_text,
            llm_metrics: LlmMetrics {
                model_name: parsed.model_name,
                inference_time_ms: parsed.inference_time_ms,
                token_usage: TokenUsage {
                    prompt: parsed.token_usage.prompt,
                    completion: parsed.token_usage.completion,
                    total: parsed.token_usage.total,
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_api_keys_with_invalid_header_characters() {
        let err = ReqwestLlmAdapter::new("https://example.invalid".into(), "bad\nkey".into());
        assert!(matches!(err, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn trims_trailing_slash_from_endpoint() {
        let adapter = ReqwestLlmAdapter::new("https://example.invalid/".into(), "key".into()).unwrap();
        assert_eq!(adapter.endpoint_url, "https://example.invalid");
    }
}
