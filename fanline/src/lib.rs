//! Rust client library for the Fanline creator/supporter platform.
//!
//! All persistence, auth, and business rules live in the hosted backend;
//! this crate is the fetch/merge/render-state layer: typed models, API
//! facades, the feed pagination pipeline, and messaging synchronization.

pub mod api;
pub mod client;
pub mod error;
pub mod feed;
pub mod identity;
pub mod messaging;
pub mod models;
pub mod normalize;
pub mod realtime;
pub mod store;

// Re-export main types
pub use api::WebhookOutcome;
pub use client::{AuthSession, FanClient, FanClientBuilder, HttpConfig};
pub use error::{Error, Result};

// Re-export commonly used models
pub use models::{
    Collection, CollectionId, CollectionItem, Conversation, ConversationId, FeedPost, Media,
    MediaKind, Message, MessageId, PostId, Profile, SupportRecord, Tier, UserId, Visibility,
};

// Re-export the core state machines
pub use feed::{FeedSession, PageOutcome, PageSource};
pub use identity::{IdentityContext, IdentityResolver};
pub use messaging::{Inbox, InboxEffect, ThreadView};
pub use realtime::{EventFilter, EventKind, MemoryHub, Realtime, RowEvent, Subscription};
pub use store::{LocalStore, LocalStoreExt, MemoryStore};
