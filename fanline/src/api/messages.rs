//! Messages API.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    client::ClientInner,
    error::{Error, Result},
    models::{Conversation, ConversationId, Message, UserId},
    normalize::parse_timestamp,
};

const CONVERSATIONS: &str = "conversations";
const MESSAGES: &str = "messages";

/// API for direct messaging.
pub struct MessagesApi {
    client: Arc<ClientInner>,
}

impl MessagesApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// List conversations involving the given user, most recent first.
    pub async fn conversations(&self, user_id: &UserId) -> Result<Vec<Conversation>> {
        let or_filter = format!(
            "(participant_a.eq.{id},participant_b.eq.{id})",
            id = user_id.as_str()
        );

        let value = self
            .client
            .executor()
            .select(
                CONVERSATIONS,
                &[
                    ("or", &or_filter),
                    ("select", "*"),
                    ("order", "last_activity.desc"),
                ],
            )
            .await?;

        let Value::Array(rows) = value else {
            return Ok(Vec::new());
        };
        Ok(rows.iter().map(parse_conversation).collect())
    }

    /// Fetch one conversation row by id.
    pub async fn conversation(&self, id: &ConversationId) -> Result<Option<Conversation>> {
        let filter = format!("eq.{}", id.as_str());

        let value = self
            .client
            .executor()
            .select(CONVERSATIONS, &[("id", &filter), ("select", "*")])
            .await?;

        let Value::Array(rows) = value else {
            return Ok(None);
        };
        Ok(rows.first().map(parse_conversation))
    }

    /// Messages in a conversation, oldest first.
    pub async fn messages_in(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        let filter = format!("eq.{}", conversation_id.as_str());

        let value = self
            .client
            .executor()
            .select(
                MESSAGES,
                &[
                    ("conversation_id", &filter),
                    ("select", "*"),
                    ("order", "created_at.asc"),
                ],
            )
            .await?;

        let Value::Array(rows) = value else {
            return Ok(Vec::new());
        };
        Ok(rows.iter().map(parse_message).collect())
    }

    /// Find the conversation for an unordered participant pair, creating it
    /// if absent. Query-then-insert: a concurrent creator can still win the
    /// insert, which the pair-uniqueness rule on the backend resolves.
    pub async fn find_or_create(&self, a: &UserId, b: &UserId) -> Result<Conversation> {
        if a.is_empty() || b.is_empty() {
            return Err(Error::InvalidArgument(
                "both participants are required".into(),
            ));
        }

        let (low, high) = Conversation::pair_key(a, b);

        let low_filter = format!("eq.{}", low.as_str());
        let high_filter = format!("eq.{}", high.as_str());
        let value = self
            .client
            .executor()
            .select(
                CONVERSATIONS,
                &[
                    ("participant_a", &low_filter),
                    ("participant_b", &high_filter),
                    ("select", "*"),
                ],
            )
            .await?;

        if let Value::Array(rows) = &value {
            if let Some(row) = rows.first() {
                return Ok(parse_conversation(row));
            }
        }

        let body = json!({
            "participant_a": low.as_str(),
            "participant_b": high.as_str(),
        });
        let inserted = self.client.executor().insert(CONVERSATIONS, &body).await?;

        first_row(&inserted)
            .map(parse_conversation)
            .ok_or_else(|| Error::missing("conversation row"))
    }

    /// Insert a message and return the authoritative row.
    pub async fn send(
        &self,
        conversation_id: &ConversationId,
        sender_id: &UserId,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<Message> {
        if text.trim().is_empty() && image_url.is_none() {
            return Err(Error::InvalidArgument("message has no content".into()));
        }

        let body = json!({
            "conversation_id": conversation_id.as_str(),
            "sender_id": sender_id.as_str(),
            "text": text,
            "image_url": image_url,
        });

        let inserted = self.client.executor().insert(MESSAGES, &body).await?;

        let message = first_row(&inserted)
            .map(parse_message)
            .ok_or_else(|| Error::missing("message row"))?;

        self.touch_conversation(conversation_id, &message).await;

        Ok(message)
    }

    /// Keep the conversation row's denormalized preview and activity
    /// columns current; the conversation list is ordered by them. Failure
    /// is non-fatal, the message row is already authoritative.
    async fn touch_conversation(&self, conversation_id: &ConversationId, message: &Message) {
        let mut patch = json!({ "preview": message.preview() });
        if let Some(sent_at) = message.sent_at {
            patch["last_activity"] = json!(sent_at.to_rfc3339());
        }

        let filter = format!("eq.{}", conversation_id.as_str());
        if let Err(e) = self
            .client
            .executor()
            .update(CONVERSATIONS, &[("id", &filter)], &patch)
            .await
        {
            log::warn!("conversation activity update failed: {}", e);
        }
    }
}

fn first_row(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(rows) => rows.first(),
        Value::Object(_) => Some(value),
        _ => None,
    }
}

fn parse_conversation(row: &Value) -> Conversation {
    Conversation {
        id: str_of(row, &["id", "conversation_id"]).into(),
        participant_a: str_of(row, &["participant_a", "user_a"]).into(),
        participant_b: str_of(row, &["participant_b", "user_b"]).into(),
        other_name: String::new(),
        other_avatar: String::new(),
        preview: str_of(row, &["preview", "last_message"]),
        last_activity: str_opt(row, &["last_activity", "updated_at"])
            .as_deref()
            .and_then(parse_timestamp),
    }
}

/// Map a raw message row, tolerating the historical field names.
pub fn parse_message(row: &Value) -> Message {
    Message {
        id: str_of(row, &["id", "message_id"]).into(),
        conversation_id: str_of(row, &["conversation_id", "thread_id"]).into(),
        sender_id: str_of(row, &["sender_id", "from_id", "user_id"]).into(),
        text: str_of(row, &["text", "content", "body"]),
        image_url: str_opt(row, &["image_url", "image"]),
        sent_at: str_opt(row, &["created_at", "sent_at"])
            .as_deref()
            .and_then(parse_timestamp),
        pending: false,
    }
}

fn str_of(row: &Value, keys: &[&str]) -> String {
    str_opt(row, keys).unwrap_or_default()
}

fn str_opt(row: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = row.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_owned());
            }
        }
    }
    None
}
