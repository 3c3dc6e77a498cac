//! Collection handlers.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use fanline::{Collection, CollectionItem, FanClient, IdentityContext, MediaKind, WebhookOutcome};
use serde::Serialize;

use crate::output::{format_relative_time, PlainPrint, TableRow};

/// Collection list entry.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionInfo {
    pub id: String,
    pub title: String,
    pub price_points: i64,
    pub item_count: u32,
    pub created: Option<DateTime<Utc>>,
}

impl From<&Collection> for CollectionInfo {
    fn from(c: &Collection) -> Self {
        Self {
            id: c.id.to_string(),
            title: c.title.clone(),
            price_points: c.price_points,
            item_count: c.item_count,
            created: c.created_at,
        }
    }
}

impl TableRow for CollectionInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Price", "Items", "Created"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            if self.price_points > 0 {
                format!("{} pts", self.price_points)
            } else {
                "free".to_string()
            },
            self.item_count.to_string(),
            format_relative_time(self.created),
        ]
    }
}

impl PlainPrint for CollectionInfo {
    fn plain_print(&self) {
        let price = if self.price_points > 0 {
            format!("{} pts", self.price_points)
        } else {
            "free".to_string()
        };
        println!(
            "[{}] {} {} {}",
            self.id.cyan(),
            self.title.bold(),
            price.yellow(),
            format!("{} items", self.item_count).dimmed()
        );
    }
}

/// Collection list result.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionListResult {
    pub owner: String,
    pub collections: Vec<CollectionInfo>,
}

/// Collection item entry.
#[derive(Debug, Clone, Serialize)]
pub struct ItemInfo {
    pub id: String,
    pub kind: String,
    pub url: String,
    pub caption: String,
    pub position: u32,
}

impl From<&CollectionItem> for ItemInfo {
    fn from(item: &CollectionItem) -> Self {
        Self {
            id: item.id.clone(),
            kind: match item.media.kind {
                MediaKind::Image => "image".to_string(),
                MediaKind::Video => "video".to_string(),
            },
            url: item.media.url.clone(),
            caption: item.caption.clone(),
            position: item.position,
        }
    }
}

impl TableRow for ItemInfo {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Kind", "Caption", "URL"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.position.to_string(),
            self.kind.clone(),
            self.caption.clone(),
            self.url.clone(),
        ]
    }
}

impl PlainPrint for ItemInfo {
    fn plain_print(&self) {
        println!(
            "{} [{}] {}",
            format!("#{}", self.position).dimmed(),
            self.kind.cyan(),
            self.url
        );
        if !self.caption.is_empty() {
            println!("   {}", self.caption);
        }
    }
}

/// Unlock attempt result.
#[derive(Debug, Clone, Serialize)]
pub struct UnlockResult {
    pub title: String,
    pub price: i64,
    pub unlocked: bool,
    pub reason: String,
}

/// List a creator's collections. `owner` may be a user id or a username.
pub async fn list_collections(client: &FanClient, owner: &str) -> Result<CollectionListResult> {
    let profile = client.profiles().by_username(owner).await?;
    let (owner_id, owner_display) = match profile {
        Some(p) => (p.id.clone(), p.display().to_string()),
        None => (owner.into(), owner.to_string()),
    };

    let collections = client.collections().by_owner(&owner_id).await?;

    Ok(CollectionListResult {
        owner: owner_display,
        collections: collections.iter().map(CollectionInfo::from).collect(),
    })
}

/// List the items of a collection.
pub async fn list_items(client: &FanClient, collection_id: &str) -> Result<Vec<ItemInfo>> {
    let items = client.collections().items(&collection_id.into()).await?;
    Ok(items.iter().map(ItemInfo::from).collect())
}

/// Spend points to unlock a paid collection through the webhook gateway.
pub async fn unlock(client: &FanClient, collection_id: &str) -> Result<UnlockResult> {
    let me = client
        .identity()
        .resolve(IdentityContext::Messaging)
        .await?;

    let collection = client
        .collections()
        .get(&collection_id.into())
        .await?
        .ok_or_else(|| anyhow!("Collection {} not found", collection_id))?;

    if !collection.is_paid() {
        return Ok(UnlockResult {
            title: collection.title,
            price: 0,
            unlocked: true,
            reason: "Collection is free".to_string(),
        });
    }

    let outcome = client
        .webhook()
        .spend_points(&me, collection.id.as_str(), collection.price_points)
        .await?;

    let (unlocked, reason) = match outcome {
        WebhookOutcome::Accepted { .. } => (true, String::new()),
        WebhookOutcome::InsufficientBalance => {
            (false, "Insufficient points balance".to_string())
        }
        WebhookOutcome::Other(body) => (false, format!("Unexpected response: {}", body)),
    };

    Ok(UnlockResult {
        title: collection.title,
        price: collection.price_points,
        unlocked,
        reason,
    })
}
