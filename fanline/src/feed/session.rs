//! Feed session state machine.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    client::FanClient,
    error::Result,
    models::{FeedPost, Profile, Tier, UserId},
    normalize::normalize_rows,
};

use super::{apply_locks, apply_profiles, lock_lookup_ids, merge_posts, missing_creator_ids};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Remote calls a feed session makes. Implemented over [`FanClient`] for
/// production; tests drive the session with a stub.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// One page of raw feed rows.
    async fn fetch_page(&self, viewer_id: &str, limit: u32, offset: u32) -> Result<Vec<Value>>;

    /// Batched creator profile lookup for backfill.
    async fn creator_profiles(&self, ids: &[UserId]) -> Result<Vec<Profile>>;

    /// Batched support tier lookup for lock computation.
    async fn support_tiers(
        &self,
        viewer_id: &str,
        creator_ids: &[UserId],
    ) -> Result<HashMap<UserId, Tier>>;
}

struct ClientPageSource {
    client: FanClient,
}

#[async_trait]
impl PageSource for ClientPageSource {
    async fn fetch_page(&self, viewer_id: &str, limit: u32, offset: u32) -> Result<Vec<Value>> {
        self.client.feed().page(viewer_id, limit, offset).await
    }

    async fn creator_profiles(&self, ids: &[UserId]) -> Result<Vec<Profile>> {
        self.client.profiles().by_ids(ids).await
    }

    async fn support_tiers(
        &self,
        viewer_id: &str,
        creator_ids: &[UserId],
    ) -> Result<HashMap<UserId, Tier>> {
        self.client.support().tiers_for(viewer_id, creator_ids).await
    }
}

/// Result of a page-load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page was fetched and this many new posts were appended.
    Appended(usize),
    /// The trigger was dropped: a fetch was already in flight, or the
    /// session was reset while this fetch was outstanding.
    Skipped,
    /// The feed is exhausted; nothing was fetched.
    EndOfFeed,
}

/// Per-feed-instance pagination state: ordered deduplicated posts, the
/// next offset, the end-of-feed flag, and the single-flight guard.
/// Instances share nothing; each remount gets a fresh session.
pub struct FeedSession {
    source: Arc<dyn PageSource>,
    viewer_id: String,
    limit: u32,
    offset: u32,
    has_more: bool,
    in_flight: bool,
    epoch: u64,
    posts: Vec<FeedPost>,
}

impl FeedSession {
    /// Create a session backed by the live client.
    pub fn new(client: &FanClient, viewer_id: impl Into<String>, limit: u32) -> Self {
        Self::with_source(
            Arc::new(ClientPageSource {
                client: client.clone(),
            }),
            viewer_id,
            limit,
        )
    }

    /// Create a session over any page source.
    pub fn with_source(
        source: Arc<dyn PageSource>,
        viewer_id: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            source,
            viewer_id: viewer_id.into(),
            limit: limit.max(1),
            offset: 0,
            has_more: true,
            in_flight: false,
            epoch: 0,
            posts: Vec::new(),
        }
    }

    /// Fetch, prepare, and merge the next page. Overlapping triggers are
    /// dropped; a short page marks the feed exhausted until [`reset`].
    ///
    /// [`reset`]: FeedSession::reset
    pub async fn load_next_page(&mut self) -> Result<PageOutcome> {
        if self.in_flight {
            return Ok(PageOutcome::Skipped);
        }
        if !self.has_more {
            return Ok(PageOutcome::EndOfFeed);
        }

        self.in_flight = true;
        let epoch = self.epoch;
        let result = prepare_page(
            self.source.clone(),
            self.viewer_id.clone(),
            self.limit,
            self.offset,
        )
        .await;
        self.in_flight = false;

        let (fetched, page) = result?;

        if epoch != self.epoch {
            // A reset happened while the fetch was outstanding; its rows
            // belong to the old pagination run.
            return Ok(PageOutcome::Skipped);
        }

        self.offset += self.limit;
        if fetched < self.limit as usize {
            self.has_more = false;
        }

        let before = self.posts.len();
        self.posts = merge_posts(std::mem::take(&mut self.posts), page);
        let appended = self.posts.len() - before;

        log::debug!(
            "feed page merged: +{} posts ({} total), offset {}, has_more {}",
            appended,
            self.posts.len(),
            self.offset,
            self.has_more
        );

        Ok(PageOutcome::Appended(appended))
    }

    /// Scroll trigger: the last rendered post became visible. Fetches the
    /// next page unless the feed is exhausted or a fetch is in flight.
    pub async fn notify_end_visible(&mut self) -> Result<PageOutcome> {
        if !self.has_more {
            return Ok(PageOutcome::EndOfFeed);
        }
        if self.in_flight {
            return Ok(PageOutcome::Skipped);
        }
        self.load_next_page().await
    }

    /// Clear the store and restart pagination at offset zero. The next
    /// completion of a fetch that was outstanding at reset time is
    /// discarded.
    pub fn reset(&mut self) {
        self.posts.clear();
        self.offset = 0;
        self.has_more = true;
        self.in_flight = false;
        self.epoch += 1;
    }

    /// Explicit refresh signal: reset, then issue exactly one fetch at
    /// offset zero.
    pub async fn refresh(&mut self) -> Result<PageOutcome> {
        self.reset();
        self.load_next_page().await
    }

    /// The merged posts, in first-seen order.
    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    /// Whether more pages are believed to exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// The next fetch offset.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// The viewer this session renders for.
    pub fn viewer_id(&self) -> &str {
        &self.viewer_id
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Fetch one page and run it through the enrichment pipeline: normalize,
/// backfill creator fields (non-fatal), resolve lock state (non-fatal,
/// conservative on failure). Returns the raw row count alongside the
/// prepared posts so the caller can decide `has_more`.
async fn prepare_page(
    source: Arc<dyn PageSource>,
    viewer_id: String,
    limit: u32,
    offset: u32,
) -> Result<(usize, Vec<FeedPost>)> {
    let rows = source.fetch_page(&viewer_id, limit, offset).await?;
    let fetched = rows.len();
    let mut posts = normalize_rows(&rows);

    let missing = missing_creator_ids(&posts);
    if !missing.is_empty() {
        match source.creator_profiles(&missing).await {
            Ok(profiles) => apply_profiles(&mut posts, &profiles),
            Err(e) => log::warn!("creator backfill failed, keeping blank fields: {}", e),
        }
    }

    let lookup = lock_lookup_ids(&viewer_id, &posts);
    let tiers = if lookup.is_empty() {
        HashMap::new()
    } else {
        match source.support_tiers(&viewer_id, &lookup).await {
            Ok(tiers) => tiers,
            Err(e) => {
                log::warn!("support tier lookup failed, locking non-public posts: {}", e);
                HashMap::new()
            }
        }
    };
    apply_locks(&viewer_id, &tiers, &mut posts);

    Ok((fetched, posts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubSource {
        pages: HashMap<u32, Vec<Value>>,
        profiles: Vec<Profile>,
        tiers: HashMap<UserId, Tier>,
        fail_fetch: bool,
        fail_profiles: bool,
        fail_tiers: bool,
        fetch_log: Mutex<Vec<u32>>,
        profile_calls: AtomicUsize,
        tier_calls: AtomicUsize,
    }

    #[async_trait]
    impl PageSource for StubSource {
        async fn fetch_page(&self, _viewer: &str, _limit: u32, offset: u32) -> Result<Vec<Value>> {
            if self.fail_fetch {
                return Err(crate::error::Error::remote("500", "feed rpc down"));
            }
            self.fetch_log.lock().unwrap().push(offset);
            Ok(self.pages.get(&offset).cloned().unwrap_or_default())
        }

        async fn creator_profiles(&self, _ids: &[UserId]) -> Result<Vec<Profile>> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_profiles {
                return Err(crate::error::Error::remote("500", "profiles down"));
            }
            Ok(self.profiles.clone())
        }

        async fn support_tiers(
            &self,
            _viewer: &str,
            _ids: &[UserId],
        ) -> Result<HashMap<UserId, Tier>> {
            self.tier_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_tiers {
                return Err(crate::error::Error::remote("500", "support down"));
            }
            Ok(self.tiers.clone())
        }
    }

    fn rows(ids: &[&str]) -> Vec<Value> {
        ids.iter()
            .map(|id| {
                json!({
                    "id": id,
                    "creator_id": "c-1",
                    "author_name": "Ada",
                    "author_avatar": "a.png",
                    "author_category": "Art",
                    "is_locked": false,
                })
            })
            .collect()
    }

    fn session(stub: StubSource, limit: u32) -> FeedSession {
        FeedSession::with_source(Arc::new(stub), "viewer", limit)
    }

    #[tokio::test]
    async fn test_pagination_dedup_scenario() {
        let ids: Vec<String> = (0..10).map(|i| format!("p-{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();

        let mut stub = StubSource::default();
        stub.pages.insert(0, rows(&id_refs));
        // Backend glitch: page two repeats page one.
        stub.pages.insert(10, rows(&id_refs));
        stub.pages.insert(20, rows(&["q-0", "q-1", "q-2", "q-3"]));

        let mut session = session(stub, 10);

        assert_eq!(session.load_next_page().await.unwrap(), PageOutcome::Appended(10));
        assert_eq!(session.len(), 10);
        assert!(session.has_more());

        assert_eq!(session.load_next_page().await.unwrap(), PageOutcome::Appended(0));
        assert_eq!(session.len(), 10);
        let order: Vec<&str> = session.posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, id_refs);

        assert_eq!(session.load_next_page().await.unwrap(), PageOutcome::Appended(4));
        assert_eq!(session.len(), 14);
        assert!(!session.has_more());
    }

    #[tokio::test]
    async fn test_short_page_is_terminal() {
        let mut stub = StubSource::default();
        stub.pages.insert(0, rows(&["a", "b"]));

        let mut session = session(stub, 10);
        session.load_next_page().await.unwrap();
        assert!(!session.has_more());

        assert_eq!(
            session.notify_end_visible().await.unwrap(),
            PageOutcome::EndOfFeed
        );
        assert_eq!(
            session.load_next_page().await.unwrap(),
            PageOutcome::EndOfFeed
        );
    }

    #[tokio::test]
    async fn test_refresh_restarts_pagination() {
        let ids: Vec<String> = (0..10).map(|i| format!("p-{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();

        let mut stub = StubSource::default();
        stub.pages.insert(0, rows(&id_refs));
        stub.pages.insert(10, rows(&["x-0", "x-1"]));

        let mut session = session(stub, 10);
        session.load_next_page().await.unwrap();
        session.load_next_page().await.unwrap();
        assert_eq!(session.offset(), 20);
        assert!(!session.has_more());

        let outcome = session.refresh().await.unwrap();
        assert_eq!(outcome, PageOutcome::Appended(10));
        assert_eq!(session.len(), 10);
        assert_eq!(session.offset(), 10);
        assert!(session.has_more());
    }

    #[tokio::test]
    async fn test_refresh_issues_one_fetch_at_offset_zero() {
        let mut inner = StubSource::default();
        inner.pages.insert(0, rows(&["a", "b"]));
        let stub = Arc::new(inner);

        let mut session = FeedSession::with_source(stub.clone(), "viewer", 2);
        session.load_next_page().await.unwrap();
        session.refresh().await.unwrap();

        assert_eq!(*stub.fetch_log.lock().unwrap(), vec![0, 0]);
        assert_eq!(session.offset(), 2);
    }

    #[tokio::test]
    async fn test_single_flight_drops_triggers() {
        let mut stub = StubSource::default();
        stub.pages.insert(0, rows(&["a"]));

        let mut session = session(stub, 10);
        session.in_flight = true;

        assert_eq!(session.load_next_page().await.unwrap(), PageOutcome::Skipped);
        assert_eq!(
            session.notify_end_visible().await.unwrap(),
            PageOutcome::Skipped
        );

        session.in_flight = false;
        assert_eq!(session.load_next_page().await.unwrap(), PageOutcome::Appended(1));
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_state() {
        let stub = StubSource {
            fail_fetch: true,
            ..Default::default()
        };

        let mut session = session(stub, 10);
        let err = session.load_next_page().await.unwrap_err();
        assert!(matches!(err, crate::error::Error::Remote { .. }));

        assert_eq!(session.offset(), 0);
        assert!(session.has_more());
        assert!(!session.in_flight);
    }

    #[tokio::test]
    async fn test_backfill_applied_and_batched() {
        let mut stub = StubSource::default();
        stub.pages.insert(
            0,
            vec![
                json!({"id": "p-1", "creator_id": "c-1", "is_locked": false}),
                json!({"id": "p-2", "creator_id": "c-1", "is_locked": false}),
            ],
        );
        stub.profiles = vec![Profile {
            id: "c-1".into(),
            display_name: "Ada".into(),
            avatar_url: "a.png".into(),
            category: "Art".into(),
            ..Default::default()
        }];
        let stub = Arc::new(stub);

        let mut session = FeedSession::with_source(stub.clone(), "viewer", 10);
        session.load_next_page().await.unwrap();

        assert_eq!(session.posts()[0].author_name, "Ada");
        assert_eq!(session.posts()[1].author_avatar, "a.png");
        assert_eq!(stub.profile_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backfill_failure_is_nonfatal() {
        let mut stub = StubSource {
            fail_profiles: true,
            ..Default::default()
        };
        stub.pages
            .insert(0, vec![json!({"id": "p-1", "creator_id": "c-1", "is_locked": false})]);

        let mut session = session(stub, 10);
        let outcome = session.load_next_page().await.unwrap();
        assert_eq!(outcome, PageOutcome::Appended(1));
        assert!(session.posts()[0].author_name.is_empty());
    }

    #[tokio::test]
    async fn test_client_computed_locks() {
        let mut stub = StubSource::default();
        stub.pages.insert(
            0,
            vec![
                json!({"id": "p-mine", "creator_id": "viewer", "tier_required": "platinum"}),
                json!({"id": "p-free", "creator_id": "c-1", "tier_required": "public"}),
                json!({"id": "p-gold", "creator_id": "c-1", "tier_required": "gold"}),
                json!({"id": "p-bronze", "creator_id": "c-1", "tier_required": "bronze"}),
            ],
        );
        stub.tiers = HashMap::from([(UserId::new("c-1"), Tier::Silver)]);

        let mut session = session(stub, 10);
        session.load_next_page().await.unwrap();

        let by_id = |id: &str| {
            session
                .posts()
                .iter()
                .find(|p| p.id.as_str() == id)
                .unwrap()
                .is_locked()
        };
        assert!(!by_id("p-mine"));
        assert!(!by_id("p-free"));
        assert!(by_id("p-gold"));
        assert!(!by_id("p-bronze"));
    }

    #[tokio::test]
    async fn test_tier_failure_locks_conservatively() {
        let mut stub = StubSource {
            fail_tiers: true,
            ..Default::default()
        };
        stub.pages.insert(
            0,
            vec![
                json!({"id": "p-1", "creator_id": "c-1", "tier_required": "bronze"}),
                json!({"id": "p-2", "creator_id": "c-1", "tier_required": "public"}),
            ],
        );

        let mut session = session(stub, 10);
        session.load_next_page().await.unwrap();

        assert!(session.posts()[0].is_locked());
        assert!(!session.posts()[1].is_locked());
    }

    #[tokio::test]
    async fn test_server_locks_skip_tier_lookup() {
        let mut stub = StubSource::default();
        stub.pages.insert(
            0,
            vec![json!({"id": "p-1", "creator_id": "c-1", "tier_required": "gold", "is_locked": true})],
        );
        let stub = Arc::new(stub);

        let mut session = FeedSession::with_source(stub.clone(), "viewer", 10);
        session.load_next_page().await.unwrap();

        assert!(session.posts()[0].is_locked());
        assert_eq!(stub.tier_calls.load(Ordering::SeqCst), 0);
    }
}
