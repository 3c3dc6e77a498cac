//! Realtime change notifications.
//!
//! The hosted backend streams row changes over a channel protocol this
//! crate does not speak directly. Embedders bridge that stream into a
//! [`Realtime`] implementation; [`MemoryHub`] is the in-crate
//! implementation used by tests and single-process embedders.

use serde_json::Value;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Kind of row change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Row inserted.
    Insert,
    /// Row updated.
    Update,
}

/// A row change delivered to a subscriber.
#[derive(Debug, Clone)]
pub struct RowEvent {
    /// Table the change happened on.
    pub table: String,
    /// Change kind.
    pub kind: EventKind,
    /// The changed row.
    pub row: Value,
}

/// Column-equality filter on a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Column name.
    pub column: String,
    /// Required value.
    pub value: String,
}

impl EventFilter {
    /// Filter on `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether the given row passes this filter.
    pub fn matches(&self, row: &Value) -> bool {
        match row.get(&self.column) {
            Some(Value::String(s)) => *s == self.value,
            Some(Value::Number(n)) => n.to_string() == self.value,
            _ => false,
        }
    }
}

/// A live subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<RowEvent>,
}

impl Subscription {
    /// Wait for the next event. `None` once the source is gone.
    pub async fn next(&mut self) -> Option<RowEvent> {
        self.receiver.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next(&mut self) -> Option<RowEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Source of realtime row changes.
pub trait Realtime: Send + Sync + std::fmt::Debug {
    /// Subscribe to changes on a table, optionally filtered by column
    /// equality.
    fn subscribe(&self, table: &str, filter: Option<EventFilter>) -> Subscription;
}

struct HubEntry {
    table: String,
    filter: Option<EventFilter>,
    sender: mpsc::UnboundedSender<RowEvent>,
}

/// In-memory realtime hub. `publish` fans events out to every matching
/// live subscription; closed subscriptions are pruned as they are found.
#[derive(Default)]
pub struct MemoryHub {
    entries: Mutex<Vec<HubEntry>>,
}

impl std::fmt::Debug for MemoryHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.lock().unwrap().len();
        f.debug_struct("MemoryHub").field("subscribers", &count).finish()
    }
}

impl MemoryHub {
    /// Create a new hub with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a row change to all matching subscribers.
    pub fn publish(&self, table: &str, kind: EventKind, row: Value) {
        let event = RowEvent {
            table: table.to_owned(),
            kind,
            row,
        };

        let mut entries = self.entries.lock().unwrap();
        entries.retain(|entry| {
            if entry.table != event.table {
                return !entry.sender.is_closed();
            }
            if let Some(filter) = &entry.filter {
                if !filter.matches(&event.row) {
                    return !entry.sender.is_closed();
                }
            }
            entry.sender.send(event.clone()).is_ok()
        });
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|e| !e.sender.is_closed());
        entries.len()
    }
}

impl Realtime for MemoryHub {
    fn subscribe(&self, table: &str, filter: Option<EventFilter>) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.entries.lock().unwrap().push(HubEntry {
            table: table.to_owned(),
            filter,
            sender,
        });
        Subscription { receiver }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_to_matching_table() {
        let hub = MemoryHub::new();
        let mut messages = hub.subscribe("messages", None);
        let mut posts = hub.subscribe("posts", None);

        hub.publish("messages", EventKind::Insert, json!({"id": "m-1"}));

        let event = messages.next().await.unwrap();
        assert_eq!(event.kind, EventKind::Insert);
        assert_eq!(event.row["id"], "m-1");
        assert!(posts.try_next().is_none());
    }

    #[tokio::test]
    async fn test_column_filter() {
        let hub = MemoryHub::new();
        let mut mine = hub.subscribe("messages", Some(EventFilter::eq("conversation_id", "c-1")));

        hub.publish("messages", EventKind::Insert, json!({"conversation_id": "c-2"}));
        hub.publish("messages", EventKind::Insert, json!({"conversation_id": "c-1"}));

        let event = mine.next().await.unwrap();
        assert_eq!(event.row["conversation_id"], "c-1");
        assert!(mine.try_next().is_none());
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let hub = MemoryHub::new();
        let sub = hub.subscribe("messages", None);
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        hub.publish("messages", EventKind::Insert, json!({}));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_filter_matches_numbers() {
        let filter = EventFilter::eq("sender_id", "42");
        assert!(filter.matches(&json!({"sender_id": 42})));
        assert!(filter.matches(&json!({"sender_id": "42"})));
        assert!(!filter.matches(&json!({"sender_id": "41"})));
        assert!(!filter.matches(&json!({})));
    }
}
