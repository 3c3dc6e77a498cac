//! Paid content collection models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionId, Media, UserId};

/// A paid content collection offered by a creator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: CollectionId,
    /// Creator who owns the collection.
    pub owner_id: UserId,
    /// Collection title.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Cover image URL.
    pub cover_url: String,
    /// Unlock price in points. Zero means free.
    pub price_points: i64,
    /// Number of items inside.
    pub item_count: u32,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

impl Collection {
    /// Whether this collection requires a points purchase.
    pub fn is_paid(&self) -> bool {
        self.price_points > 0
    }
}

/// A single item inside a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionItem {
    /// Item ID.
    pub id: String,
    /// Owning collection.
    pub collection_id: CollectionId,
    /// Item media.
    pub media: Media,
    /// Optional caption.
    pub caption: String,
    /// Position within the collection.
    pub position: u32,
}
