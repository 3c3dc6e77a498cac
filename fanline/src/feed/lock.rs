//! Client-side lock computation.
//!
//! Most backend versions compute `is_locked` server-side; rows from the
//! variants that do not arrive with an unknown lock state, and the client
//! derives it from the viewer's support tier toward each creator.

use std::collections::HashMap;

use crate::models::{FeedPost, Tier, UserId};

/// Unique creator ids whose posts still need a tier lookup: lock state
/// unknown, not the viewer's own post, and not Public-tier. One batched
/// lookup covers them all.
pub fn lock_lookup_ids(viewer_id: &str, posts: &[FeedPost]) -> Vec<UserId> {
    let viewer = UserId::new(viewer_id);
    let mut ids: Vec<UserId> = Vec::new();

    for post in posts {
        if post.locked.is_some()
            || post.is_owned_by(&viewer)
            || post.tier_required == Tier::Public
            || post.creator_id.is_empty()
        {
            continue;
        }
        if !ids.contains(&post.creator_id) {
            ids.push(post.creator_id.clone());
        }
    }

    ids
}

/// Resolve every unknown lock state. The owner's own posts and Public
/// posts are always unlocked; otherwise the viewer is unlocked iff their
/// tier toward the creator ranks at or above the post's required tier.
/// Creators absent from `tiers` (no support record, or the lookup failed
/// and an empty map was passed) stay locked.
pub fn apply_locks(viewer_id: &str, tiers: &HashMap<UserId, Tier>, posts: &mut [FeedPost]) {
    let viewer = UserId::new(viewer_id);

    for post in posts.iter_mut() {
        if post.locked.is_some() {
            continue;
        }

        let unlocked = post.is_owned_by(&viewer)
            || post.tier_required == Tier::Public
            || tiers
                .get(&post.creator_id)
                .is_some_and(|tier| tier.satisfies(post.tier_required));

        post.locked = Some(!unlocked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(id: &str, creator: &str, tier: Tier) -> FeedPost {
        FeedPost {
            id: id.into(),
            creator_id: creator.into(),
            tier_required: tier,
            ..Default::default()
        }
    }

    #[test]
    fn test_owner_always_unlocked() {
        let mut posts = vec![post("p-1", "viewer", Tier::Platinum)];
        apply_locks("viewer", &HashMap::new(), &mut posts);
        assert_eq!(posts[0].locked, Some(false));
    }

    #[test]
    fn test_public_never_locked() {
        let mut posts = vec![post("p-1", "c-1", Tier::Public)];
        apply_locks("viewer", &HashMap::new(), &mut posts);
        assert_eq!(posts[0].locked, Some(false));
    }

    #[test]
    fn test_tier_comparison() {
        let mut posts = vec![
            post("p-gold", "c-1", Tier::Gold),
            post("p-silver", "c-1", Tier::Silver),
            post("p-bronze", "c-1", Tier::Bronze),
        ];
        let tiers = HashMap::from([(UserId::new("c-1"), Tier::Silver)]);

        apply_locks("viewer", &tiers, &mut posts);
        assert_eq!(posts[0].locked, Some(true));
        assert_eq!(posts[1].locked, Some(false));
        assert_eq!(posts[2].locked, Some(false));
    }

    #[test]
    fn test_no_support_record_means_locked() {
        let mut posts = vec![post("p-1", "c-1", Tier::Bronze)];
        apply_locks("viewer", &HashMap::new(), &mut posts);
        assert_eq!(posts[0].locked, Some(true));
    }

    #[test]
    fn test_server_lock_untouched() {
        let mut posts = vec![post("p-1", "c-1", Tier::Gold)];
        posts[0].locked = Some(false);

        apply_locks("viewer", &HashMap::new(), &mut posts);
        assert_eq!(posts[0].locked, Some(false));
    }

    #[test]
    fn test_lookup_ids_skip_resolved_owned_and_public() {
        let viewer = "viewer";
        let mut resolved = post("p-1", "c-1", Tier::Gold);
        resolved.locked = Some(true);

        let posts = vec![
            resolved,
            post("p-2", "viewer", Tier::Gold),
            post("p-3", "c-2", Tier::Public),
            post("p-4", "c-3", Tier::Bronze),
            post("p-5", "c-3", Tier::Gold),
        ];

        let ids = lock_lookup_ids(viewer, &posts);
        assert_eq!(ids, vec![UserId::new("c-3")]);
    }
}
