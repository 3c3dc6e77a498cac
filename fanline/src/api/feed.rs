//! Feed API.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::{client::ClientInner, error::Result};

/// Name of the feed page procedure. Stable across backend versions.
const FEED_RPC: &str = "get_feed_posts";

/// API for feed page fetches.
pub struct FeedApi {
    client: Arc<ClientInner>,
}

impl FeedApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Fetch one page of raw feed rows for the viewer. Rows come back in
    /// whatever historical shape the backend holds; callers normalize.
    pub async fn page(&self, viewer_id: &str, limit: u32, offset: u32) -> Result<Vec<Value>> {
        let params = json!({
            "viewer_id": viewer_id,
            "page_limit": limit,
            "page_offset": offset,
        });

        let value = self.client.executor().rpc(FEED_RPC, &params).await?;
        Ok(rows_from(value))
    }
}

/// Accept either a bare array or a `{ "data": [...] }` envelope; anything
/// else is an empty page.
fn rows_from(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
