//! Raw row normalization.
//!
//! The backend has shipped several historical row shapes for feed posts;
//! creator display fields and the owner id in particular have gone by
//! different names across versions. Each logical field is resolved from a
//! fixed priority list, first present non-null value wins, and every field
//! has a defined fallback so normalization is total.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::{FeedPost, Media, Tier, Visibility};

const ID_KEYS: &[&str] = &["id", "post_id", "uuid"];
const CREATOR_ID_KEYS: &[&str] = &["creator_id", "owner_id", "user_id", "author_id"];
const TITLE_KEYS: &[&str] = &["title", "post_title"];
const CONTENT_KEYS: &[&str] = &["content", "body", "text", "caption"];
const AUTHOR_NAME_KEYS: &[&str] = &["author_name", "creator_name", "display_name", "username"];
const AUTHOR_AVATAR_KEYS: &[&str] = &["author_avatar", "creator_avatar", "avatar_url", "avatar"];
const AUTHOR_CATEGORY_KEYS: &[&str] = &["author_category", "creator_category", "category"];
const CREATED_AT_KEYS: &[&str] = &["created_at", "createdAt", "inserted_at", "timestamp"];
const TIER_KEYS: &[&str] = &["tier_required", "required_tier", "tier"];
const VISIBILITY_KEYS: &[&str] = &["visibility"];
const LIKES_KEYS: &[&str] = &["likes_count", "like_count", "likes"];
const COMMENTS_KEYS: &[&str] = &["comments_count", "comment_count", "comments"];
const LOCKED_KEYS: &[&str] = &["is_locked", "locked"];
const MEDIA_KEYS: &[&str] = &["media", "media_urls", "images", "image_urls"];
const SINGLE_MEDIA_KEYS: &[&str] = &["image_url", "video_url"];

/// Map a raw backend row into a canonical `FeedPost`. Never fails: absent
/// or malformed fields take their documented defaults. `author_name` stays
/// empty (not "Unknown") so the backfill step can detect it; renderers use
/// [`FeedPost::author_display`].
pub fn normalize_row(row: &Value) -> FeedPost {
    FeedPost {
        id: first_str(row, ID_KEYS).unwrap_or_default().into(),
        creator_id: first_str(row, CREATOR_ID_KEYS).unwrap_or_default().into(),
        title: first_str(row, TITLE_KEYS).unwrap_or_default(),
        content: first_str(row, CONTENT_KEYS).unwrap_or_default(),
        media: collect_media(row),
        created_at: first_str(row, CREATED_AT_KEYS)
            .as_deref()
            .and_then(parse_timestamp),
        author_name: first_str(row, AUTHOR_NAME_KEYS).unwrap_or_default(),
        author_avatar: first_str(row, AUTHOR_AVATAR_KEYS).unwrap_or_default(),
        author_category: first_str(row, AUTHOR_CATEGORY_KEYS).unwrap_or_default(),
        tier_required: first_str(row, TIER_KEYS)
            .map(|s| Tier::parse(&s))
            .unwrap_or_default(),
        visibility: first_str(row, VISIBILITY_KEYS)
            .map(|s| Visibility::parse(&s))
            .unwrap_or_default(),
        likes_count: first_count(row, LIKES_KEYS),
        comments_count: first_count(row, COMMENTS_KEYS),
        locked: first_bool(row, LOCKED_KEYS),
    }
}

/// Normalize a whole page of raw rows.
pub fn normalize_rows(rows: &[Value]) -> Vec<FeedPost> {
    rows.iter().map(normalize_row).collect()
}

/// First present non-null string value among the given keys. Numbers are
/// stringified; some backend versions returned numeric ids.
fn first_str(row: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match row.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}

/// First present non-negative count among the given keys.
fn first_count(row: &Value, keys: &[&str]) -> u32 {
    for key in keys {
        match row.get(key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_i64() {
                    return v.max(0) as u32;
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.parse::<i64>() {
                    return v.max(0) as u32;
                }
            }
            _ => continue,
        }
    }
    0
}

/// First present boolean among the given keys. `None` means the backend did
/// not compute it and the client must.
fn first_bool(row: &Value, keys: &[&str]) -> Option<bool> {
    for key in keys {
        if let Some(Value::Bool(b)) = row.get(key) {
            return Some(*b);
        }
    }
    None
}

/// Gather media URLs: an array under one of the known keys, plus any
/// single-URL legacy fields.
fn collect_media(row: &Value) -> Vec<Media> {
    let mut media = Vec::new();

    for key in MEDIA_KEYS {
        if let Some(Value::Array(items)) = row.get(key) {
            for item in items {
                if let Some(url) = item.as_str().filter(|u| !u.is_empty()) {
                    media.push(Media::from_url(url));
                }
            }
            break;
        }
    }

    for key in SINGLE_MEDIA_KEYS {
        if let Some(url) = row.get(key).and_then(Value::as_str) {
            if !url.is_empty() && !media.iter().any(|m| m.url == url) {
                media.push(Media::from_url(url));
            }
        }
    }

    media
}

/// Parse a timestamp string, RFC 3339 first, then the backend's older
/// space-separated format. Unparseable input yields `None`.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}
