// Chat service - Drives the chat session around insight requests
use crate::application::insight_service::{FALLBACK_MESSAGE, InsightService};
use crate::domain::chat::{ChatError, ChatMessage, ChatSession, ChatState};
use crate::domain::sensor::SensorReading;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct ChatService {
    session: Arc<Mutex<ChatSession>>,
    insight: InsightService,
}

impl ChatService {
    pub fn new(insight: InsightService, max_messages: Option<usize>) -> Self {
        Self {
            session: Arc::new(Mutex::new(ChatSession::new(max_messages))),
            insight,
        }
    }

    /// Post a user message and wait for the assistant's reply. The session
    /// lock is released while the insight request is outstanding, so a second
    /// caller sees `Sending` and gets [`ChatError::Busy`].
    ///
    /// The request and its completion run on their own task, so dropping the
    /// caller never leaves the session stuck in `Sending`.
    pub async fn send(&self, text: &str, snapshot: Option<SensorReading>) -> Result<ChatMessage, ChatError> {
        let prompt = self.session.lock().await.begin_send(text)?;
        tracing::debug!("Insight request started ({} chars)", prompt.len());

        let session = self.session.clone();
        let insight = self.insight.clone();
        let exchange = tokio::spawn(async move {
            let response = insight.request_insight(&prompt, snapshot.as_ref()).await;
            if !session.lock().await.complete(response.clone()) {
                tracing::debug!("Chat session closed before the reply arrived; dropping it");
            }
            ChatMessage::assistant(response)
        });

        match exchange.await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::error!("Insight exchange task failed: {}", e);
                self.session.lock().await.complete(FALLBACK_MESSAGE.to_string());
                Ok(ChatMessage::assistant(FALLBACK_MESSAGE))
            }
        }
    }

    pub async fn transcript(&self) -> (ChatState, Vec<ChatMessage>) {
        let session = self.session.lock().await;
        (session.state(), session.messages().to_vec())
    }

    pub async fn close(&self) {
        self.session.lock().await.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::insight_service::fakes::CannedGateway;
    use std::time::Duration;

    fn chat(gateway: CannedGateway) -> ChatService {
        let insight = InsightService::new(
            Arc::new(gateway),
            "test-model".to_string(),
            0.7,
            Duration::from_secs(30),
        );
        ChatService::new(insight, None)
    }

    #[tokio::test]
    async fn test_send_appends_both_turns() {
        let chat = chat(CannedGateway::replying("Vibration is nominal."));
        let reply = chat.send("Any bearing issues?", Some(SensorReading::default())).await.unwrap();

        assert_eq!(reply, ChatMessage::assistant("Vibration is nominal."));
        let (state, messages) = chat.transcript().await;
        assert_eq!(state, ChatState::Idle);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], ChatMessage::user("Any bearing issues?"));
    }

    #[tokio::test]
    async fn test_failure_returns_to_idle_with_fallback() {
        let chat = chat(CannedGateway::failing("quota exceeded"));
        let reply = chat.send("status?", None).await.unwrap();

        assert_eq!(reply.content, FALLBACK_MESSAGE);
        let (state, _) = chat.transcript().await;
        assert_eq!(state, ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_send_is_rejected() {
        let chat = chat(CannedGateway::replying("done").with_delay(Duration::from_secs(5)));

        let first = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("first", None).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let (state, before) = chat.transcript().await;
        assert_eq!(state, ChatState::Sending);

        assert_eq!(chat.send("second", None).await, Err(ChatError::Busy));
        let (_, after) = chat.transcript().await;
        assert_eq!(before, after);

        first.await.unwrap().unwrap();
        let (state, messages) = chat.transcript().await;
        assert_eq!(state, ChatState::Idle);
        assert_eq!(messages.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_after_close_is_discarded() {
        let chat = chat(CannedGateway::replying("late").with_delay(Duration::from_secs(5)));

        let pending = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("hello", None).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        chat.close().await;

        assert!(pending.await.unwrap().is_ok());
        let (_, messages) = chat.transcript().await;
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_send_still_returns_to_idle() {
        let chat = chat(CannedGateway::replying("done").with_delay(Duration::from_secs(5)));

        let caller = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("first", None).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        tokio::time::sleep(Duration::from_secs(6)).await;
        let (state, messages) = chat.transcript().await;
        assert_eq!(state, ChatState::Idle);
        assert_eq!(messages.last(), Some(&ChatMessage::assistant("done")));

        let reply = chat.send("second", None).await.unwrap();
        assert_eq!(reply.content, "done");
        let (state, messages) = chat.transcript().await;
        assert_eq!(state, ChatState::Idle);
        assert_eq!(messages.len(), 5);
    }
}
