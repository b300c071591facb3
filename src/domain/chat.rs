// Chat conversation domain model
use serde::{Deserialize, Serialize};

pub const GREETING: &str = "IDCON Industrial Agent ready. PLC telemetry streams are active and OpenCV vision nodes are validating precision. How can I optimize your metrics today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("an insight request is already in flight")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,

    #[error("chat session is closed")]
    Closed,
}

/// Conversation plus the Idle/Sending guard that admits one request at a time.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: ChatState,
    active: bool,
    max_messages: Option<usize>,
}

impl ChatSession {
    pub fn new(max_messages: Option<usize>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            state: ChatState::Idle,
            active: true,
            max_messages,
        }
    }

    /// Idle -> Sending. Appends the user message and returns the prompt text.
    pub fn begin_send(&mut self, text: &str) -> Result<String, ChatError> {
        if !self.active {
            return Err(ChatError::Closed);
        }
        if self.state == ChatState::Sending {
            return Err(ChatError::Busy);
        }
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.append(ChatMessage::user(text));
        self.state = ChatState::Sending;
        Ok(text.to_string())
    }

    /// Sending -> Idle. Returns false when the session was torn down meanwhile
    /// and the response was dropped.
    pub fn complete(&mut self, response: String) -> bool {
        if !self.active {
            return false;
        }
        self.append(ChatMessage::assistant(response));
        self.state = ChatState::Idle;
        true
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if let Some(max) = self.max_messages {
            if self.messages.len() > max {
                let excess = self.messages.len() - max;
                self.messages.drain(..excess);
            }
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(None)
    }
}
