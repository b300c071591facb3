// Gateway trait for the external text-generation service
use async_trait::async_trait;
use serde::Serialize;

/// One outbound generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightRequest {
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
    pub temperature: f32,
}

#[async_trait]
pub trait InsightGateway: Send + Sync {
    /// Send the request and return the generated text (possibly empty).
    async fn generate(&self, request: &InsightRequest) -> anyhow::Result<String>;
}
