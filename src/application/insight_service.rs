// Insight service - Wraps the text-generation gateway so callers only ever see text
use crate::application::insight_gateway::{InsightGateway, InsightRequest};
use crate::domain::sensor::SensorReading;
use std::sync::Arc;
use std::time::Duration;

pub const FALLBACK_MESSAGE: &str = "The IDCON analytics gateway is currently undergoing maintenance. Please verify your industrial network connection.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "Unable to generate insight at this time.";

const SYSTEM_INSTRUCTION: &str = "You are an expert in industrial automation, data science, and manufacturing consultancy for IDCON Industrial Designing Consultants. Use technical terminology related to TIA Portal, MindSphere, and Edge Computing. Always be professional, optimistic, and genuine.";

#[derive(Clone)]
pub struct InsightService {
    gateway: Arc<dyn InsightGateway>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl InsightService {
    pub fn new(
        gateway: Arc<dyn InsightGateway>,
        model: String,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            model,
            temperature,
            timeout,
        }
    }

    /// Ask the gateway about `prompt` in the context of `snapshot`. Failures
    /// and timeouts come back as [`FALLBACK_MESSAGE`].
    pub async fn request_insight(&self, prompt: &str, snapshot: Option<&SensorReading>) -> String {
        let request = self.build_request(prompt, snapshot);

        match tokio::time::timeout(self.timeout, self.gateway.generate(&request)).await {
            Ok(Ok(text)) if text.trim().is_empty() => EMPTY_RESPONSE_MESSAGE.to_string(),
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::error!("Insight gateway error: {:#}", e);
                FALLBACK_MESSAGE.to_string()
            }
            Err(_) => {
                tracing::warn!("Insight gateway timed out after {:?}", self.timeout);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    pub fn build_request(&self, prompt: &str, snapshot: Option<&SensorReading>) -> InsightRequest {
        let data = serde_json::to_string(&snapshot).unwrap_or_else(|_| "null".to_string());

        let framed = format!(
            "You are a Senior Industrial Data Scientist at IDCON (Industrial Designing Consultants). \
             Analyze this factory telemetry data: {data}. \
             User request: {prompt}. \
             Provide technical, professional, and actionable insights specifically regarding PLC S7-1500 optimization, \
             SCADA WinCC data acquisition, OEE performance, or predictive maintenance. \
             Maintain a tone of high-level engineering consultancy."
        );

        InsightRequest {
            model: self.model.clone(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: framed,
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
pub mod fakes {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Gateway returning a canned answer and recording what it was sent.
    pub struct CannedGateway {
        pub reply: anyhow::Result<String>,
        pub delay: Duration,
        pub seen: Mutex<Vec<InsightRequest>>,
    }

    impl CannedGateway {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(anyhow::anyhow!(message.to_string())),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl InsightGateway for CannedGateway {
        async fn generate(&self, request: &InsightRequest) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            tokio::time::sleep(self.delay).await;
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!(e.to_string())),
            }
        }
    }
}
