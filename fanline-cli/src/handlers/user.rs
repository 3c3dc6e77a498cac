//! User handlers.

use anyhow::{anyhow, Result};
use colored::Colorize;
use fanline::{FanClient, Profile, UserId};
use serde::Serialize;

use crate::output::{PlainPrint, TableRow};

/// Profile info.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub id: String,
    pub username: String,
    pub name: String,
    pub category: String,
    pub bio: String,
    pub points: i64,
    pub collection_count: Option<usize>,
}

impl From<&Profile> for ProfileInfo {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id.to_string(),
            username: p.username.clone(),
            name: p.display().to_string(),
            category: p.category.clone(),
            bio: p.bio.clone(),
            points: p.points,
            collection_count: None,
        }
    }
}

impl TableRow for ProfileInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Username", "Name", "Category", "Points"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.name.clone(),
            self.category.clone(),
            self.points.to_string(),
        ]
    }
}

impl PlainPrint for ProfileInfo {
    fn plain_print(&self) {
        println!("{} (@{})", self.name.bold(), self.username.green());
        if !self.category.is_empty() {
            println!("   {}", self.category.cyan());
        }
        if !self.bio.is_empty() {
            println!("   {}", self.bio);
        }
        let mut meta = format!("{} points", self.points);
        if let Some(count) = self.collection_count {
            meta.push_str(&format!("  {} collections", count));
        }
        println!("   {}", meta.dimmed());
    }
}

/// Upload an avatar image and persist the public URL in the local store.
pub async fn set_avatar(client: &FanClient, path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow!("Could not read {}: {}", path.display(), e))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name"))?;

    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };

    let user_id = client
        .session()
        .map(|s| s.user_id.clone())
        .ok_or_else(|| anyhow!("Authentication required"))?;

    let url = client
        .storage()
        .upload(
            "avatars",
            &format!("{}/{}", user_id, filename),
            bytes,
            content_type,
        )
        .await?;

    client
        .store()
        .set(fanline::store::wellknown::AVATAR_URL, &url)
        .await;

    Ok(url)
}

/// Look up a profile. An argument containing '@' is treated as an email,
/// otherwise username first, then raw id.
pub async fn show_user(client: &FanClient, query: &str) -> Result<ProfileInfo> {
    let profiles = client.profiles();

    let profile = if query.contains('@') {
        profiles.by_email(query).await?
    } else {
        match profiles.by_username(query).await? {
            Some(p) => Some(p),
            None => profiles.get(query).await?,
        }
    };

    profile
        .as_ref()
        .map(ProfileInfo::from)
        .ok_or_else(|| anyhow!("User '{}' not found", query))
}

/// Show the signed-in user's profile with their collection count.
pub async fn me(client: &FanClient) -> Result<ProfileInfo> {
    let user_id: UserId = client
        .session()
        .map(|s| s.user_id.clone())
        .ok_or_else(|| anyhow!("Authentication required"))?
        .into();

    let profiles_api = client.profiles();
    let collections_api = client.collections();
    let (profile, collections) = futures::join!(
        profiles_api.get(user_id.as_str()),
        collections_api.by_owner(&user_id)
    );

    let profile = profile?.ok_or_else(|| anyhow!("Profile not found for the signed-in user"))?;

    let mut info = ProfileInfo::from(&profile);
    info.collection_count = collections.ok().map(|c| c.len());
    Ok(info)
}
