use chrono::{DateTime, Utc};

use super::{ConversationId, ConversationSummary, Message};

pub const DEFAULT_TITLE: &str = "New Chat";
const TITLE_MAX_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: ConversationId::new(),
            title: DEFAULT_TITLE.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Appends a message. The very first message, whoever sent it, names the conversation.
    pub fn push_message(&mut self, message: Message) {
        if self.messages.is_empty() {
            self.title = derive_title(&message.text);
        }
        self.messages.push(message);
    }

    pub fn summary(&self) -> ConversationSummary {
        let first_message = self
            .messages
            .first()
            .map(|m| m.text.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        ConversationSummary {
            id: self.id,
            title: self.title.clone(),
            first_message,
            created_at: self.created_at,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Title for a conversation opened with `text`, capped at `TITLE_MAX_CHARS` characters
/// including the trailing ellipsis.
pub fn derive_title(text: &str) -> String {
    if text.chars().count() <= TITLE_MAX_CHARS {
        return text.to_string();
    }

    let kept: String = text
        .chars()
        .take(TITLE_MAX_CHARS - ELLIPSIS.len())
        .collect();
    format!("{}{}", kept, ELLIPSIS)
}
