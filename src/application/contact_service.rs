// Contact service - Simulated intake of consultation requests
use crate::domain::contact::{ContactError, ContactRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub status: &'static str,
    pub callback_requested: bool,
    pub received_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ContactService {
    delay: Duration,
}

impl ContactService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Validate, wait out the simulated send, and acknowledge. Nothing is
    /// transmitted anywhere.
    pub async fn submit(&self, request: ContactRequest) -> Result<ContactReceipt, ContactError> {
        request.validate()?;

        tracing::info!(
            "Contact request received: domain={:?} industry={:?} timeline={:?}",
            request.domain,
            request.industry,
            request.timeline
        );
        tokio::time::sleep(self.delay).await;

        Ok(ContactReceipt {
            status: "success",
            callback_requested: request.callback,
            received_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> ContactRequest {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "email": "ops@plant.example",
            "message": "Need a SCADA review",
            "callback": true,
        }))
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_waits_then_succeeds() {
        let service = ContactService::new(Duration::from_millis(1800));
        let started = tokio::time::Instant::now();

        let receipt = service.submit(request("Grace")).await.unwrap();

        assert_eq!(receipt.status, "success");
        assert!(receipt.callback_requested);
        assert!(started.elapsed() >= Duration::from_millis(1800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_before_delay() {
        let service = ContactService::new(Duration::from_millis(1800));
        let started = tokio::time::Instant::now();

        let result = service.submit(request("")).await;

        assert_eq!(result, Err(ContactError::MissingField("name")));
        assert!(started.elapsed() < Duration::from_millis(1800));
    }
}
