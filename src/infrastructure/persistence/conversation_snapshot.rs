use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::application::ports::RepositoryError;
use crate::domain::{
    Conversation, ConversationId, ConversationSummary, DEFAULT_TITLE, Message, Sender,
};

/// The whole conversation collection, keyed by id and kept in insertion order.
///
/// Serializes to the on-disk layout: a JSON object mapping each id to
/// `{messages, created_at, title}`.
#[derive(Debug, Clone, Default)]
pub struct ConversationSnapshot {
    order: Vec<ConversationId>,
    conversations: HashMap<ConversationId, Conversation>,
}

#[derive(Serialize)]
struct StoredConversationRef<'a> {
    messages: &'a [Message],
    created_at: &'a DateTime<Utc>,
    title: &'a str,
}

#[derive(Deserialize)]
struct StoredConversation {
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(deserialize_with = "deserialize_created_at")]
    created_at: DateTime<Utc>,
    #[serde(default = "default_title")]
    title: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// Accepts RFC-3339 timestamps and offset-less ISO-8601 ones, which are read as UTC.
fn deserialize_created_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid created_at {:?}: {}", raw, e)))
}

impl ConversationSnapshot {
    /// Parses a stored snapshot. Blank input is an empty collection. Insertion order is
    /// rebuilt from creation time, ties broken by id.
    pub fn from_json(bytes: &[u8]) -> Result<Self, RepositoryError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let stored: HashMap<ConversationId, StoredConversation> = serde_json::from_slice(bytes)
            .map_err(|e| RepositoryError::Corrupted(e.to_string()))?;

        let mut conversations: Vec<Conversation> = stored
            .into_iter()
            .map(|(id, record)| Conversation {
                id,
                title: record.title,
                created_at: record.created_at,
                messages: record.messages,
            })
            .collect();
        conversations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut snapshot = Self::default();
        for conversation in conversations {
            snapshot.insert(conversation);
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, RepositoryError> {
        serde_json::to_vec_pretty(self).map_err(|e| RepositoryError::PersistenceFailed(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ConversationId) -> bool {
        self.conversations.contains_key(&id)
    }

    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.get(&id)
    }

    pub fn summaries(&self) -> Vec<ConversationSummary> {
        self.iter().map(Conversation::summary).collect()
    }

    pub fn insert(&mut self, conversation: Conversation) {
        let id = conversation.id;
        if self.conversations.insert(id, conversation).is_none() {
            self.order.push(id);
        }
    }

    pub fn append(
        &mut self,
        id: ConversationId,
        sender: Sender,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        let conversation = self
            .conversations
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;

        if text.trim().is_empty() {
            return Err(RepositoryError::InvalidMessage(
                "message text must not be empty".to_string(),
            ));
        }

        let message = Message::new(sender, text);
        conversation.push_message(message.clone());
        Ok(message)
    }

    pub fn remove(&mut self, id: ConversationId) -> bool {
        if self.conversations.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.order
            .iter()
            .filter_map(|id| self.conversations.get(id))
    }
}

impl Serialize for ConversationSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for conversation in self.iter() {
            map.serialize_entry(
                &conversation.id,
                &StoredConversationRef {
                    messages: &conversation.messages,
                    created_at: &conversation.created_at,
                    title: &conversation.title,
                },
            )?;
        }
        map.end()
    }
}
