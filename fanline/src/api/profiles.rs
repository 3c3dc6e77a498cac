//! Profiles API.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    client::ClientInner,
    error::Result,
    models::{Profile, UserId},
    store::{id_for_email, LocalStore},
};

const TABLE: &str = "profiles";

/// API for creator/supporter profile lookups.
pub struct ProfilesApi {
    client: Arc<ClientInner>,
}

impl ProfilesApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Get one profile by id.
    pub async fn get(&self, user_id: impl Into<UserId>) -> Result<Option<Profile>> {
        let user_id = user_id.into();
        let mut profiles = self.by_ids(&[user_id]).await?;
        Ok(profiles.pop())
    }

    /// Batched lookup by id set. One remote call regardless of how many
    /// ids are requested; unknown ids are simply absent from the result.
    pub async fn by_ids(&self, ids: &[UserId]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids
            .iter()
            .map(UserId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let filter = format!("in.({})", id_list);

        let value = self
            .client
            .executor()
            .select(TABLE, &[("id", &filter), ("select", "*")])
            .await?;

        Ok(parse_profiles(value))
    }

    /// Get a profile by handle.
    pub async fn by_username(&self, username: &str) -> Result<Option<Profile>> {
        let filter = format!("eq.{}", username);

        let value = self
            .client
            .executor()
            .select(TABLE, &[("username", &filter), ("select", "*")])
            .await?;

        Ok(parse_profiles(value).into_iter().next())
    }

    /// Get a profile by email. A hit writes the id through to the local
    /// per-email cache so identity fallback can reuse it offline.
    pub async fn by_email(&self, email: &str) -> Result<Option<Profile>> {
        let filter = format!("eq.{}", email.trim().to_lowercase());

        let value = self
            .client
            .executor()
            .select(TABLE, &[("email", &filter), ("select", "*")])
            .await?;

        let profile = parse_profiles(value).into_iter().next();
        if let Some(profile) = &profile {
            self.client
                .store
                .set(&id_for_email(email), profile.id.as_str())
                .await;
        }
        Ok(profile)
    }

    /// Get the signed-in user's profile.
    pub async fn me(&self) -> Result<Option<Profile>> {
        let session = self.client.require_session()?;
        self.get(session.user_id.as_str()).await
    }
}

fn parse_profiles(value: Value) -> Vec<Profile> {
    let Value::Array(rows) = value else {
        return Vec::new();
    };
    rows.iter().filter_map(parse_profile).collect()
}

/// Profile rows also vary across backend versions; same first-present-wins
/// treatment as feed rows.
fn parse_profile(row: &Value) -> Option<Profile> {
    let id = first_str(row, &["id", "user_id", "uuid"])?;

    Some(Profile {
        id: id.into(),
        username: first_str(row, &["username", "handle"]).unwrap_or_default(),
        display_name: first_str(row, &["display_name", "name", "full_name"]).unwrap_or_default(),
        avatar_url: first_str(row, &["avatar_url", "avatar"]).unwrap_or_default(),
        category: first_str(row, &["category", "creator_category"]).unwrap_or_default(),
        bio: first_str(row, &["bio", "about"]).unwrap_or_default(),
        points: row.get("points").and_then(Value::as_i64).unwrap_or(0),
    })
}

fn first_str(row: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = row.get(key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_owned());
            }
        }
    }
    None
}
