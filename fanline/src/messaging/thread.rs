//! Active conversation view.

use chrono::{DateTime, Utc};

use crate::models::{ConversationId, Message, MessageId, UserId};

/// Messages of the active conversation, with optimistic-send
/// reconciliation.
#[derive(Debug)]
pub struct ThreadView {
    conversation_id: ConversationId,
    me: UserId,
    messages: Vec<Message>,
    temp_seq: u64,
}

impl ThreadView {
    /// Create a view for one conversation.
    pub fn new(conversation_id: impl Into<ConversationId>, me: impl Into<UserId>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            me: me.into(),
            messages: Vec::new(),
            temp_seq: 0,
        }
    }

    /// Replace the message list from a fetch, oldest first. Pending local
    /// entries that the fetch does not cover are re-appended.
    pub fn load(&mut self, fetched: Vec<Message>) {
        let pending: Vec<Message> = self
            .messages
            .drain(..)
            .filter(|m| m.pending && !fetched.iter().any(|f| f.same_signature(m)))
            .collect();

        self.messages = fetched;
        self.messages.extend(pending);
    }

    /// Insert an optimistic local message and return it. The caller sends
    /// the same text remotely; the authoritative row later replaces this
    /// entry via [`apply_event`].
    ///
    /// [`apply_event`]: ThreadView::apply_event
    pub fn push_optimistic(&mut self, text: impl Into<String>, at: DateTime<Utc>) -> Message {
        self.temp_seq += 1;
        let mut message = Message::optimistic(
            self.temp_seq,
            self.conversation_id.clone(),
            self.me.clone(),
            text,
        );
        message.sent_at = Some(at);
        self.messages.push(message.clone());
        message
    }

    /// Apply an authoritative message row. A pending entry with the same
    /// sender and text is replaced in place, keeping its list position;
    /// otherwise the message is appended. Rows for other conversations and
    /// already-known ids are ignored. Returns whether the list changed.
    pub fn apply_event(&mut self, incoming: Message) -> bool {
        if incoming.conversation_id != self.conversation_id {
            return false;
        }
        if self.messages.iter().any(|m| m.id == incoming.id) {
            return false;
        }

        if let Some(pos) = self
            .messages
            .iter()
            .position(|m| m.pending && m.same_signature(&incoming))
        {
            self.messages[pos] = incoming;
            return true;
        }

        self.messages.push(incoming);
        true
    }

    /// Give up on pending entries older than the cutoff: they stay in the
    /// list as permanently local. The realtime event that would confirm
    /// them is no longer expected.
    pub fn expire_pending(&mut self, older_than: DateTime<Utc>) -> usize {
        let mut expired = 0;
        for message in &mut self.messages {
            if message.pending && message.sent_at.is_some_and(|t| t < older_than) {
                message.pending = false;
                expired += 1;
            }
        }
        expired
    }

    /// The messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The conversation this view renders.
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Ids of still-pending local entries.
    pub fn pending_ids(&self) -> Vec<MessageId> {
        self.messages
            .iter()
            .filter(|m| m.pending)
            .map(|m| m.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn confirmed(id: &str, sender: &str, text: &str) -> Message {
        Message {
            id: id.into(),
            conversation_id: "c-1".into(),
            sender_id: sender.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_optimistic_replaced_in_place() {
        let mut thread = ThreadView::new("c-1", "me");
        thread.apply_event(confirmed("m-1", "them", "hey"));
        thread.push_optimistic("hi", now());
        thread.apply_event(confirmed("m-2", "them", "more"));
        assert_eq!(thread.len(), 3);

        let changed = thread.apply_event(confirmed("m-9", "me", "hi"));
        assert!(changed);
        assert_eq!(thread.len(), 3);
        assert_eq!(thread.messages()[1].id.as_str(), "m-9");
        assert!(!thread.messages()[1].pending);
        assert!(thread.pending_ids().is_empty());
    }

    #[test]
    fn test_unmatched_event_appends() {
        let mut thread = ThreadView::new("c-1", "me");
        thread.push_optimistic("hi", now());

        thread.apply_event(confirmed("m-1", "them", "hello"));
        assert_eq!(thread.len(), 2);
        assert_eq!(thread.pending_ids().len(), 1);
    }

    #[test]
    fn test_other_conversation_ignored() {
        let mut thread = ThreadView::new("c-1", "me");
        let mut other = confirmed("m-1", "them", "hello");
        other.conversation_id = "c-2".into();

        assert!(!thread.apply_event(other));
        assert!(thread.is_empty());
    }

    #[test]
    fn test_duplicate_id_ignored() {
        let mut thread = ThreadView::new("c-1", "me");
        thread.apply_event(confirmed("m-1", "them", "hello"));
        assert!(!thread.apply_event(confirmed("m-1", "them", "hello")));
        assert_eq!(thread.len(), 1);
    }

    #[test]
    fn test_load_keeps_unconfirmed_pending() {
        let mut thread = ThreadView::new("c-1", "me");
        thread.push_optimistic("hi", now());
        thread.push_optimistic("still local", now());

        // The fetch covers the first optimistic send but not the second.
        thread.load(vec![
            confirmed("m-1", "them", "hello"),
            confirmed("m-2", "me", "hi"),
        ]);

        assert_eq!(thread.len(), 3);
        assert_eq!(thread.messages()[2].text, "still local");
        assert!(thread.messages()[2].pending);
    }

    #[test]
    fn test_expire_pending() {
        let mut thread = ThreadView::new("c-1", "me");
        thread.push_optimistic("hi", now());

        let later = now() + chrono::Duration::seconds(30);
        assert_eq!(thread.expire_pending(later), 1);
        assert!(thread.pending_ids().is_empty());
        // Still present, just no longer awaiting confirmation.
        assert_eq!(thread.len(), 1);
        assert!(thread.messages()[0].id.is_temp());
    }
}
