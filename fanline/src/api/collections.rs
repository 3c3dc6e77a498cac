//! Collections API.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    client::ClientInner,
    error::Result,
    models::{Collection, CollectionId, CollectionItem, Media, UserId},
    normalize::parse_timestamp,
};

const COLLECTIONS: &str = "collections";
const ITEMS: &str = "collection_items";

/// API for paid content collections.
pub struct CollectionsApi {
    client: Arc<ClientInner>,
}

impl CollectionsApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Get one collection by id.
    pub async fn get(&self, id: &CollectionId) -> Result<Option<Collection>> {
        let filter = format!("eq.{}", id.as_str());

        let value = self
            .client
            .executor()
            .select(COLLECTIONS, &[("id", &filter), ("select", "*")])
            .await?;

        let Value::Array(rows) = value else {
            return Ok(None);
        };
        Ok(rows.first().and_then(parse_collection))
    }

    /// Collections owned by a creator, newest first.
    pub async fn by_owner(&self, owner_id: &UserId) -> Result<Vec<Collection>> {
        let filter = format!("eq.{}", owner_id.as_str());

        let value = self
            .client
            .executor()
            .select(
                COLLECTIONS,
                &[
                    ("owner_id", &filter),
                    ("select", "*"),
                    ("order", "created_at.desc"),
                ],
            )
            .await?;

        let Value::Array(rows) = value else {
            return Ok(Vec::new());
        };
        Ok(rows.iter().filter_map(parse_collection).collect())
    }

    /// Items inside a collection, in position order.
    pub async fn items(&self, collection_id: &CollectionId) -> Result<Vec<CollectionItem>> {
        let filter = format!("eq.{}", collection_id.as_str());

        let value = self
            .client
            .executor()
            .select(
                ITEMS,
                &[
                    ("collection_id", &filter),
                    ("select", "*"),
                    ("order", "position.asc"),
                ],
            )
            .await?;

        let Value::Array(rows) = value else {
            return Ok(Vec::new());
        };
        Ok(rows.iter().filter_map(parse_item).collect())
    }
}

fn parse_collection(row: &Value) -> Option<Collection> {
    let id = row.get("id").and_then(Value::as_str)?;

    Some(Collection {
        id: id.into(),
        owner_id: str_of(row, &["owner_id", "creator_id"]).into(),
        title: str_of(row, &["title", "name"]),
        description: str_of(row, &["description"]),
        cover_url: str_of(row, &["cover_url", "cover"]),
        price_points: row
            .get("price_points")
            .or_else(|| row.get("price"))
            .and_then(Value::as_i64)
            .unwrap_or(0),
        item_count: row
            .get("item_count")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32,
        created_at: row
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
    })
}

fn parse_item(row: &Value) -> Option<CollectionItem> {
    let id = row.get("id").and_then(Value::as_str)?;
    let url = str_of(row, &["url", "media_url"]);

    Some(CollectionItem {
        id: id.to_owned(),
        collection_id: str_of(row, &["collection_id"]).into(),
        media: Media::from_url(url),
        caption: str_of(row, &["caption"]),
        position: row.get("position").and_then(Value::as_u64).unwrap_or(0) as u32,
    })
}

fn str_of(row: &Value, keys: &[&str]) -> String {
    for key in keys {
        if let Some(s) = row.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return s.to_owned();
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use serde_json::json;

    #[test]
    fn test_parse_collection() {
        let row = json!({
            "id": "col-1",
            "owner_id": "c-1",
            "title": "Backstage",
            "price": 300,
            "item_count": 12
        });

        let collection = parse_collection(&row).unwrap();
        assert_eq!(collection.id.as_str(), "col-1");
        assert_eq!(collection.price_points, 300);
        assert!(collection.is_paid());
    }

    #[test]
    fn test_parse_item_sniffs_media() {
        let row = json!({
            "id": "i-1",
            "collection_id": "col-1",
            "url": "https://cdn.example/clip.mp4",
            "position": 3
        });

        let item = parse_item(&row).unwrap();
        assert_eq!(item.media.kind, MediaKind::Video);
        assert_eq!(item.position, 3);
    }
}
