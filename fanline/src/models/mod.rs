//! Data models for Fanline entities.

mod collection;
mod ids;
mod message;
mod post;
mod user;

pub use collection::{Collection, CollectionItem};
pub use ids::{CollectionId, ConversationId, MessageId, PostId, UserId};
pub use message::{Conversation, Message};
pub use post::{FeedPost, Media, MediaKind, Tier, Visibility};
pub use user::{Profile, SupportRecord};
