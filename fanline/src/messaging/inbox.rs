//! Conversation list state.

use crate::models::{Conversation, ConversationId, Message, UserId};

/// What an incoming message did to the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxEffect {
    /// A listed conversation was updated and moved to the front.
    Updated,
    /// The message references a conversation the inbox does not hold;
    /// the caller should fetch its row and [`Inbox::upsert`] it.
    Unknown(ConversationId),
    /// The message was not for this user's inbox.
    Ignored,
}

/// The current user's conversation list, most recent activity first.
#[derive(Debug)]
pub struct Inbox {
    me: UserId,
    conversations: Vec<Conversation>,
}

impl Inbox {
    /// Create an empty inbox for one user.
    pub fn new(me: impl Into<UserId>) -> Self {
        Self {
            me: me.into(),
            conversations: Vec::new(),
        }
    }

    /// Replace the list from a fetch, assumed already ordered by activity.
    pub fn load(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations
            .into_iter()
            .filter(|c| c.involves(&self.me))
            .collect();
    }

    /// Insert or replace a conversation row. New activity puts it at the
    /// front; a conversation not involving this user is dropped.
    pub fn upsert(&mut self, conversation: Conversation) {
        if !conversation.involves(&self.me) {
            return;
        }

        self.conversations.retain(|c| c.id != conversation.id);
        self.conversations.insert(0, conversation);
    }

    /// Apply an incoming message: update the affected conversation's
    /// preview and timestamp and move it to the front. Messages sent by
    /// someone else into a conversation the inbox does not list produce
    /// [`InboxEffect::Unknown`] so the caller can fetch the row lazily.
    pub fn apply_message(&mut self, message: &Message) -> InboxEffect {
        let Some(pos) = self
            .conversations
            .iter()
            .position(|c| c.id == message.conversation_id)
        else {
            // A row for an unlisted conversation might be a new counterpart
            // reaching out; only the sender's own echoes can be dropped
            // outright.
            return if message.sender_id == self.me {
                InboxEffect::Ignored
            } else {
                InboxEffect::Unknown(message.conversation_id.clone())
            };
        };

        let mut conversation = self.conversations.remove(pos);
        conversation.preview = message.preview();
        if message.sent_at.is_some() {
            conversation.last_activity = message.sent_at;
        }
        self.conversations.insert(0, conversation);
        InboxEffect::Updated
    }

    /// The conversations, most recent first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Find a listed conversation by the other participant.
    pub fn with_user(&self, other: &UserId) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|c| c.involves(other) && c.involves(&self.me))
    }

    /// Number of listed conversations.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the inbox is empty.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn conversation(id: &str, a: &str, b: &str) -> Conversation {
        Conversation {
            id: id.into(),
            participant_a: a.into(),
            participant_b: b.into(),
            ..Default::default()
        }
    }

    fn message(conversation_id: &str, sender: &str, text: &str) -> Message {
        Message {
            id: format!("m-{}", text).into(),
            conversation_id: conversation_id.into(),
            sender_id: sender.into(),
            text: text.into(),
            sent_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_activity_moves_conversation_to_front() {
        let mut inbox = Inbox::new("me");
        inbox.load(vec![
            conversation("c-1", "me", "alice"),
            conversation("c-2", "me", "bob"),
        ]);

        let effect = inbox.apply_message(&message("c-2", "bob", "ping"));
        assert_eq!(effect, InboxEffect::Updated);
        assert_eq!(inbox.conversations()[0].id.as_str(), "c-2");
        assert_eq!(inbox.conversations()[0].preview, "ping");
        assert!(inbox.conversations()[0].last_activity.is_some());
    }

    #[test]
    fn test_unknown_conversation_requests_fetch() {
        let mut inbox = Inbox::new("me");
        let effect = inbox.apply_message(&message("c-9", "carol", "hello"));
        assert_eq!(effect, InboxEffect::Unknown("c-9".into()));
    }

    #[test]
    fn test_own_echo_for_unlisted_conversation_ignored() {
        let mut inbox = Inbox::new("me");
        let effect = inbox.apply_message(&message("c-9", "me", "hello"));
        assert_eq!(effect, InboxEffect::Ignored);
    }

    #[test]
    fn test_upsert_replaces_and_fronts() {
        let mut inbox = Inbox::new("me");
        inbox.load(vec![
            conversation("c-1", "me", "alice"),
            conversation("c-2", "me", "bob"),
        ]);

        let mut updated = conversation("c-2", "me", "bob");
        updated.preview = "latest".into();
        inbox.upsert(updated);

        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox.conversations()[0].id.as_str(), "c-2");
        assert_eq!(inbox.conversations()[0].preview, "latest");
    }

    #[test]
    fn test_foreign_conversations_filtered() {
        let mut inbox = Inbox::new("me");
        inbox.load(vec![
            conversation("c-1", "me", "alice"),
            conversation("c-2", "alice", "bob"),
        ]);
        assert_eq!(inbox.len(), 1);

        inbox.upsert(conversation("c-3", "alice", "bob"));
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn test_with_user() {
        let mut inbox = Inbox::new("me");
        inbox.load(vec![conversation("c-1", "me", "alice")]);

        assert!(inbox.with_user(&"alice".into()).is_some());
        assert!(inbox.with_user(&"bob".into()).is_none());
    }
}
