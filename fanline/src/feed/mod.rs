//! Feed loading pipeline.
//!
//! One [`FeedSession`] per rendered feed: fetch a page, normalize the raw
//! rows, backfill missing creator fields, resolve lock state, then fold
//! the result into the session's ordered, deduplicated post list.

mod backfill;
mod lock;
mod merge;
mod session;

pub use backfill::{apply_profiles, missing_creator_ids};
pub use lock::{apply_locks, lock_lookup_ids};
pub use merge::merge_posts;
pub use session::{FeedSession, PageOutcome, PageSource, DEFAULT_PAGE_SIZE};
