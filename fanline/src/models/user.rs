//! Creator and supporter models.

use serde::{Deserialize, Serialize};

use super::{Tier, UserId};

/// A creator or supporter profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// User ID.
    pub id: UserId,
    /// Unique handle.
    pub username: String,
    /// Display name shown on posts and conversations.
    pub display_name: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// Creator category label (e.g. "Fitness", "Music").
    pub category: String,
    /// Profile bio.
    pub bio: String,
    /// Points balance, spendable on locked content.
    pub points: i64,
}

impl Profile {
    /// Best display string: display name, else username, else "Unknown".
    pub fn display(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if !self.username.is_empty() {
            &self.username
        } else {
            "Unknown"
        }
    }
}

/// A supporter's subscription toward one creator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportRecord {
    /// The supporting user.
    pub supporter_id: UserId,
    /// The supported creator.
    pub creator_id: UserId,
    /// Subscribed tier.
    pub tier: Tier,
}
