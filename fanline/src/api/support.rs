//! Support/subscription API.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    client::ClientInner,
    error::Result,
    models::{SupportRecord, Tier, UserId},
};

const TABLE: &str = "support_records";

/// API for supporter-to-creator subscription lookups.
pub struct SupportApi {
    client: Arc<ClientInner>,
}

impl SupportApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// The supporter's tier toward each of the given creators, one remote
    /// call for the whole batch. Creators with no support record are absent
    /// from the map.
    pub async fn tiers_for(
        &self,
        supporter_id: &str,
        creator_ids: &[UserId],
    ) -> Result<HashMap<UserId, Tier>> {
        if creator_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let supporter_filter = format!("eq.{}", supporter_id);
        let creator_list = creator_ids
            .iter()
            .map(UserId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let creator_filter = format!("in.({})", creator_list);

        let value = self
            .client
            .executor()
            .select(
                TABLE,
                &[
                    ("supporter_id", &supporter_filter),
                    ("creator_id", &creator_filter),
                    ("select", "*"),
                ],
            )
            .await?;

        Ok(parse_tier_map(value))
    }

    /// The supporter's tier toward a single creator.
    pub async fn tier_for(&self, supporter_id: &str, creator_id: &UserId) -> Result<Option<Tier>> {
        let map = self
            .tiers_for(supporter_id, std::slice::from_ref(creator_id))
            .await?;
        Ok(map.get(creator_id).copied())
    }

    /// All support records held by the supporter.
    pub async fn records_for(&self, supporter_id: &str) -> Result<Vec<SupportRecord>> {
        let filter = format!("eq.{}", supporter_id);

        let value = self
            .client
            .executor()
            .select(TABLE, &[("supporter_id", &filter), ("select", "*")])
            .await?;

        let Value::Array(rows) = value else {
            return Ok(Vec::new());
        };
        Ok(rows.iter().filter_map(parse_record).collect())
    }
}

fn parse_tier_map(value: Value) -> HashMap<UserId, Tier> {
    let Value::Array(rows) = value else {
        return HashMap::new();
    };
    rows.iter()
        .filter_map(parse_record)
        .map(|r| (r.creator_id, r.tier))
        .collect()
}

fn parse_record(row: &Value) -> Option<SupportRecord> {
    let creator_id = row.get("creator_id").and_then(Value::as_str)?;

    Some(SupportRecord {
        supporter_id: row
            .get("supporter_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .into(),
        creator_id: creator_id.into(),
        tier: row
            .get("tier")
            .and_then(Value::as_str)
            .map(Tier::parse)
            .unwrap_or_default(),
    })
}
