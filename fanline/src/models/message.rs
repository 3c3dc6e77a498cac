//! Direct messaging models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConversationId, MessageId, UserId};

/// A direct-message conversation between two users.
///
/// The participant pair is unordered: a conversation between A and B is the
/// same conversation as one between B and A.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation ID.
    pub id: ConversationId,
    /// One participant.
    pub participant_a: UserId,
    /// The other participant.
    pub participant_b: UserId,
    /// Display name of the party that is not the current user.
    pub other_name: String,
    /// Avatar URL of the party that is not the current user.
    pub other_avatar: String,
    /// Rendered preview of the latest message.
    pub preview: String,
    /// Time of the latest activity.
    pub last_activity: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Whether the given user is one of the two participants.
    pub fn involves(&self, user_id: &UserId) -> bool {
        self.participant_a == *user_id || self.participant_b == *user_id
    }

    /// The participant that is not `me`. Falls back to `participant_b`
    /// when `me` is neither party.
    pub fn other_party(&self, me: &UserId) -> &UserId {
        if self.participant_a == *me {
            &self.participant_b
        } else if self.participant_b == *me {
            &self.participant_a
        } else {
            &self.participant_b
        }
    }

    /// Canonical unordered key for a participant pair. Both orientations of
    /// the same pair produce the same key.
    pub fn pair_key(a: &UserId, b: &UserId) -> (UserId, UserId) {
        if a.as_str() <= b.as_str() {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }
}

/// A single direct message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Message ID. Optimistic entries carry a temporary ID until the
    /// authoritative realtime row arrives.
    pub id: MessageId,
    /// Conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Sender user ID.
    pub sender_id: UserId,
    /// Text payload.
    pub text: String,
    /// Optional attached image URL.
    pub image_url: Option<String>,
    /// Send time.
    pub sent_at: Option<DateTime<Utc>>,
    /// Whether this is a locally inserted, not-yet-confirmed entry.
    pub pending: bool,
}

impl Message {
    /// Build an optimistic local message with a temporary ID.
    pub fn optimistic(
        temp_seq: u64,
        conversation_id: impl Into<ConversationId>,
        sender_id: impl Into<UserId>,
        text: impl Into<String>,
    ) -> Self {
        Message {
            id: MessageId::temp(temp_seq),
            conversation_id: conversation_id.into(),
            sender_id: sender_id.into(),
            text: text.into(),
            pending: true,
            ..Default::default()
        }
    }

    /// Correlation signature used to reconcile an optimistic entry with its
    /// authoritative counterpart: same sender, same text.
    pub fn same_signature(&self, other: &Message) -> bool {
        self.sender_id == other.sender_id && self.text == other.text
    }

    /// Preview string for conversation lists.
    pub fn preview(&self) -> String {
        if !self.text.is_empty() {
            self.text.clone()
        } else if self.image_url.is_some() {
            "[image]".to_owned()
        } else {
            String::new()
        }
    }
}
