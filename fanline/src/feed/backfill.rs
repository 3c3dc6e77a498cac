//! Creator display-field backfill.

use std::collections::HashSet;

use crate::models::{FeedPost, Profile, UserId};

/// Unique creator ids for posts that are missing a display field. One
/// lookup covers the whole page; per-post lookups are never issued.
pub fn missing_creator_ids(posts: &[FeedPost]) -> Vec<UserId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for post in posts {
        if post.needs_author_backfill() && seen.insert(post.creator_id.clone()) {
            ids.push(post.creator_id.clone());
        }
    }

    ids
}

/// Merge looked-up profiles into the posts, filling only fields that are
/// still empty. A present value is never overwritten by a backfilled one.
pub fn apply_profiles(posts: &mut [FeedPost], profiles: &[Profile]) {
    for post in posts.iter_mut() {
        let Some(profile) = profiles.iter().find(|p| p.id == post.creator_id) else {
            continue;
        };

        if post.author_name.is_empty() {
            post.author_name = profile.display().to_owned();
        }
        if post.author_avatar.is_empty() {
            post.author_avatar = profile.avatar_url.clone();
        }
        if post.author_category.is_empty() {
            post.author_category = profile.category.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(id: &str, creator: &str, name: &str, avatar: &str, category: &str) -> FeedPost {
        FeedPost {
            id: id.into(),
            creator_id: creator.into(),
            author_name: name.into(),
            author_avatar: avatar.into(),
            author_category: category.into(),
            ..Default::default()
        }
    }

    fn profile(id: &str, name: &str, avatar: &str, category: &str) -> Profile {
        Profile {
            id: id.into(),
            display_name: name.into(),
            avatar_url: avatar.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_ids_unique_and_batched() {
        let posts = vec![
            post("p-1", "c-1", "", "", ""),
            post("p-2", "c-1", "", "", ""),
            post("p-3", "c-2", "Ada", "a.png", "Art"),
            post("p-4", "c-3", "Grace", "", "Code"),
            post("p-5", "", "", "", ""),
        ];

        let ids = missing_creator_ids(&posts);
        assert_eq!(ids, vec![UserId::new("c-1"), UserId::new("c-3")]);
    }

    #[test]
    fn test_apply_fills_only_empty_fields() {
        let mut posts = vec![post("p-1", "c-1", "", "kept.png", "")];
        let profiles = vec![profile("c-1", "Ada", "new.png", "Art")];

        apply_profiles(&mut posts, &profiles);
        assert_eq!(posts[0].author_name, "Ada");
        assert_eq!(posts[0].author_avatar, "kept.png");
        assert_eq!(posts[0].author_category, "Art");
    }

    #[test]
    fn test_apply_without_match_keeps_blanks() {
        let mut posts = vec![post("p-1", "c-1", "", "", "")];
        apply_profiles(&mut posts, &[profile("c-9", "Nobody", "n.png", "X")]);
        assert!(posts[0].author_name.is_empty());
    }

    #[test]
    fn test_apply_uses_profile_display_fallback() {
        let mut posts = vec![post("p-1", "c-1", "", "", "")];
        let handle_only = Profile {
            id: "c-1".into(),
            username: "ada".into(),
            ..Default::default()
        };

        apply_profiles(&mut posts, &[handle_only]);
        assert_eq!(posts[0].author_name, "ada");
    }
}
