// [libs/infra/worker-client/src/mock.rs]
//! Deterministic [`LlmAdapter`] for tests and local development without
//! a reachable generation endpoint.

use crate::client::{LlmAdapter, LlmResponse};
use crate::errors::ClientError;
use async_trait::async_trait;
use meridian_domain_ai_cortex::PromptRequest;
use meridian_domain_models::{LlmMetrics, TokenUsage};

/// Echoes the prompt's context back as the draft, with metrics derived
/// from its length so successive calls aren't bit-identical.
pub struct MockLlmAdapter {
    pub model_name: String,
}

impl Default for MockLlmAdapter {
    fn default() -> Self {
        Self {
            model_name: "mock-llm-v1".to_string(),
        }
    }
}

#[async_trait]
impl LlmAdapter for MockLlmAdapter {
    async fn generate(&self, request: &PromptRequest) -> Result<LlmResponse, ClientError> {
        let context = request
            .device_context
            .clone()
            .unwrap_or_else(|| request.project_context.clone());

        let prompt_tokens = (context.len() / 4) as u32;
        let completion_tokens = prompt_tokens / 2;

        let draft_text = format!("Mock analysis for kind {:?}:\n{context}", request.kind);

        Ok(LlmResponse {
            ai_draft_json: serde_json::json!({ "summary": draft_text, "kind": request.kind }),
            ai_draft_text: draft_text,
            llm_metrics: LlmMetrics {
                model_name: self.model_name.clone(),
                inference_time_ms: 42,
                token_usage: TokenUsage {
                    prompt: prompt_tokens,
                    completion: completion_tokens,
                    total: prompt_tokens + completion_tokens,
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_domain_models::AnalysisKind;

    #[tokio::test]
    async fn generates_deterministic_draft_from_context() {
        let adapter = MockLlmAdapter::default();
        let request = PromptRequest {
            kind: AnalysisKind::ProjectOverview,
            project_context: "Project: NetA\nDevice summary (0 devices):\n[]".into(),
            device_context: None,
            include_original: false,
        };

        let response = adapter.generate(&request).await.unwrap();
        assert!(response.ai_draft_text.contains("NetA"));
        assert_eq!(response.llm_metrics.model_name, "mock-llm-v1");
    }
}
