//! Feed post models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostId, UserId};

/// A displayable unit in the feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedPost {
    /// Post ID, the dedup key within a feed session.
    pub id: PostId,
    /// Creator who owns this post.
    pub creator_id: UserId,
    /// Post title.
    pub title: String,
    /// Post body text.
    pub content: String,
    /// Attached media in display order.
    pub media: Vec<Media>,
    /// Creation time. `None` when the row carried no parseable timestamp;
    /// renderers show a generic "some time ago" in that case.
    pub created_at: Option<DateTime<Utc>>,
    /// Creator display name. May arrive blank and be backfilled.
    pub author_name: String,
    /// Creator avatar URL. May arrive blank and be backfilled.
    pub author_avatar: String,
    /// Creator category label. May arrive blank and be backfilled.
    pub author_category: String,
    /// Minimum support tier required to view unblurred content.
    pub tier_required: Tier,
    /// Informational visibility setting.
    pub visibility: Visibility,
    /// Like count.
    pub likes_count: u32,
    /// Comment count.
    pub comments_count: u32,
    /// Whether the viewer is barred from unblurred content. `Some` when the
    /// backend computed it, `None` until the client derives it.
    pub locked: Option<bool>,
}

impl FeedPost {
    /// Whether this post should render locked. Unknown lock state renders
    /// unlocked; the feed pipeline resolves it before posts are stored.
    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }

    /// Whether the given viewer owns this post.
    pub fn is_owned_by(&self, viewer_id: &UserId) -> bool {
        !self.creator_id.is_empty() && self.creator_id == *viewer_id
    }

    /// Author name for display. Normalization leaves a missing name empty
    /// so backfill can detect it; rendering shows "Unknown" instead.
    pub fn author_display(&self) -> &str {
        if self.author_name.is_empty() {
            "Unknown"
        } else {
            &self.author_name
        }
    }

    /// Whether any creator display field is missing and a backfill lookup
    /// could fill it in.
    pub fn needs_author_backfill(&self) -> bool {
        !self.creator_id.is_empty()
            && (self.author_name.is_empty()
                || self.author_avatar.is_empty()
                || self.author_category.is_empty())
    }
}

/// A media attachment on a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Media {
    /// Media URL.
    pub url: String,
    /// Media type sniffed from the URL extension.
    pub kind: MediaKind,
}

impl Media {
    /// Build a media entry, sniffing the kind from the URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = MediaKind::from_url(&url);
        Media { url, kind }
    }
}

/// Media type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// Image media.
    #[default]
    Image,
    /// Video media.
    Video,
}

impl MediaKind {
    /// Determine media kind from a URL's extension. Unknown extensions are
    /// treated as images.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "mp4" | "webm" | "mov" | "avi" | "mkv" | "m3u8" => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

/// Ordered content-access tier. The variant order is the precedence order
/// used for lock computation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tier {
    /// Free content, visible to everyone.
    #[default]
    Public,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// Parse a tier name. Unrecognized or absent values fall back to Public.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "bronze" => Tier::Bronze,
            "silver" => Tier::Silver,
            "gold" => Tier::Gold,
            "platinum" => Tier::Platinum,
            _ => Tier::Public,
        }
    }

    /// Whether a supporter at this tier can view content requiring `required`.
    pub fn satisfies(&self, required: Tier) -> bool {
        *self >= required
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Public => "Public",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }
}

/// Informational post visibility setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone.
    #[default]
    Public,
    /// Visible to friends.
    Friends,
    /// Visible to the owner only.
    Private,
}

impl Visibility {
    /// Parse a visibility value, defaulting to public.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "friends" => Visibility::Friends,
            "private" => Visibility::Private,
            _ => Visibility::Public,
        }
    }
}
