//! Merge/dedup store.

use std::collections::HashSet;

use crate::models::FeedPost;

/// Fold `incoming` into `existing`, keyed by post id: a FIFO-appended set.
///
/// `existing` keeps its order (deduplicated against itself defensively);
/// each incoming post whose id has not been seen is appended in order.
/// A previously placed post is never reordered, so the result is stable
/// under repeated pagination and out-of-order responses.
pub fn merge_posts(existing: Vec<FeedPost>, incoming: Vec<FeedPost>) -> Vec<FeedPost> {
    let mut seen: HashSet<String> = HashSet::with_capacity(existing.len() + incoming.len());
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());

    for post in existing.into_iter().chain(incoming) {
        if seen.insert(post.id.as_str().to_owned()) {
            merged.push(post);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn posts(ids: &[&str]) -> Vec<FeedPost> {
        ids.iter()
            .map(|id| FeedPost {
                id: (*id).into(),
                ..Default::default()
            })
            .collect()
    }

    fn ids(posts: &[FeedPost]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_appends_new_ids_in_order() {
        let merged = merge_posts(posts(&["a", "b"]), posts(&["c", "d"]));
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_duplicate_page_is_noop() {
        let first = merge_posts(Vec::new(), posts(&["a", "b", "c"]));
        let again = merge_posts(first.clone(), posts(&["a", "b", "c"]));
        assert_eq!(ids(&again), ids(&first));
        assert_eq!(again.len(), 3);
    }

    #[test]
    fn test_partial_overlap_keeps_first_seen_order() {
        let merged = merge_posts(posts(&["a", "b"]), posts(&["b", "c", "a", "d"]));
        assert_eq!(ids(&merged), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_existing_self_dedup() {
        let merged = merge_posts(posts(&["a", "b", "a"]), posts(&["c"]));
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_keeps_first_version() {
        let mut original = posts(&["a"]);
        original[0].title = "first".into();
        let mut dup = posts(&["a"]);
        dup[0].title = "second".into();

        let merged = merge_posts(original, dup);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "first");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_posts(Vec::new(), Vec::new()).is_empty());
        assert_eq!(ids(&merge_posts(posts(&["a"]), Vec::new())), vec!["a"]);
        assert_eq!(ids(&merge_posts(Vec::new(), posts(&["a"]))), vec!["a"]);
    }
}
