//! Messaging synchronization.
//!
//! [`ThreadView`] holds the active conversation's messages and reconciles
//! optimistic local entries against authoritative realtime rows;
//! [`Inbox`] keeps the conversation list ordered by activity.
//!
//! Realtime subscriptions are keyed by the current user or the active
//! conversation. When that key changes, drop the old [`Subscription`]
//! before calling one of the `subscribe_*` helpers again, so no events
//! are consumed through a stale filter.
//!
//! [`Subscription`]: crate::realtime::Subscription

mod inbox;
mod thread;

pub use inbox::{Inbox, InboxEffect};
pub use thread::ThreadView;

use crate::models::ConversationId;
use crate::realtime::{EventFilter, Realtime, Subscription};

/// Table carrying message rows.
pub const MESSAGES_TABLE: &str = "messages";

/// Table carrying conversation rows.
pub const CONVERSATIONS_TABLE: &str = "conversations";

/// Subscribe to message inserts for one conversation.
pub fn subscribe_thread(realtime: &dyn Realtime, conversation_id: &ConversationId) -> Subscription {
    realtime.subscribe(
        MESSAGES_TABLE,
        Some(EventFilter::eq("conversation_id", conversation_id.as_str())),
    )
}

/// Subscribe to message inserts across all conversations. The realtime
/// filter supports a single column equality, which cannot express "any of
/// my conversations"; [`Inbox::apply_message`] does the per-user
/// filtering.
pub fn subscribe_inbox(realtime: &dyn Realtime) -> Subscription {
    realtime.subscribe(MESSAGES_TABLE, None)
}
