use chrono::{DateTime, Utc};

use super::ConversationId;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub first_message: String,
    pub created_at: DateTime<Utc>,
}
