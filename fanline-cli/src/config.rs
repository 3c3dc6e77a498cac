//! Configuration management for the Fanline CLI.

use anyhow::{Context, Result};
use fanline::{AuthSession, FanClient};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Authentication credentials.
    pub auth: Option<AuthConfig>,
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Access token.
    pub token: String,
    /// User ID.
    pub user_id: String,
    /// Sign-in email.
    pub email: Option<String>,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend base URL. Falls back to the library default.
    pub base_url: Option<String>,
    /// Project API key.
    pub api_key: Option<String>,
    /// External webhook endpoint for message/points processing.
    pub webhook_url: Option<String>,
}

impl BackendConfig {
    /// The effective base URL.
    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(fanline::client::DEFAULT_BASE_URL)
    }
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.join("fanline.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

/// Build a Fanline client from the current configuration.
pub fn build_client() -> Result<FanClient> {
    let config = load_config()?;

    let mut builder = FanClient::builder();

    if let Some(base_url) = &config.backend.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(api_key) = &config.backend.api_key {
        builder = builder.api_key(api_key);
    }
    if let Some(webhook_url) = &config.backend.webhook_url {
        builder = builder.webhook_url(webhook_url);
    }

    if let Some(auth) = config.auth {
        let mut session = AuthSession::new(&auth.token, &auth.user_id);
        if let Some(email) = &auth.email {
            session = session.with_email(email);
        }
        builder = builder.with_session(session);
    }

    builder.build().context("Failed to build Fanline client")
}

/// Build a Fanline client that requires authentication.
pub fn build_authed_client() -> Result<FanClient> {
    let client = build_client()?;

    if !client.is_authenticated() {
        anyhow::bail!("Authentication required. Run 'fanline auth login' first.");
    }

    Ok(client)
}
