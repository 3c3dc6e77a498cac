//! HTTP client configuration and request execution.

use crate::error::{Error, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default hosted backend base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.fanline.app/";

/// REST prefix for table queries and RPCs.
const REST_PREFIX: &str = "rest/v1/";

/// Storage object prefix.
const STORAGE_PREFIX: &str = "storage/v1/object/";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the hosted backend.
    pub base_url: String,
    /// Project API key sent with every request.
    pub api_key: String,
    /// External webhook endpoint for message/points processing, when
    /// configured.
    pub webhook_url: Option<String>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: String::new(),
            webhook_url: None,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(20),
        }
    }
}

impl HttpConfig {
    /// Resolve a path relative to the base URL.
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(Error::Url);
        }

        Url::parse(&self.base_url)
            .and_then(|b| b.join(path))
            .map_err(Error::Url)
    }

    /// Public URL for an uploaded storage object.
    pub fn public_object_url(&self, bucket: &str, path: &str) -> Result<Url> {
        self.resolve_url(&format!("{}public/{}/{}", STORAGE_PREFIX, bucket, path))
    }
}

/// Build a reqwest client with the given configuration.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .gzip(true)
        .build()
        .map_err(Error::Network)
}

/// HTTP request executor.
pub struct HttpExecutor<'a> {
    client: &'a Client,
    config: &'a HttpConfig,
    access_token: Option<&'a str>,
}

impl<'a> HttpExecutor<'a> {
    /// Create a new executor. `access_token` overrides the API key as the
    /// bearer credential when present.
    pub fn new(client: &'a Client, config: &'a HttpConfig, access_token: Option<&'a str>) -> Self {
        Self {
            client,
            config,
            access_token,
        }
    }

    /// Build a request with common headers.
    fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token.unwrap_or(&self.config.api_key);

        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Call a remote procedure with JSON parameters.
    pub async fn rpc(&self, name: &str, params: &Value) -> Result<Value> {
        let url = self.config.resolve_url(&format!("{}rpc/{}", REST_PREFIX, name))?;

        let response = self
            .build_request(Method::POST, url)
            .json(params)
            .send()
            .await
            .map_err(Error::Network)?;

        handle_json_response(response).await
    }

    /// Select rows from a table with equality/list filters.
    pub async fn select(&self, table: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.config.resolve_url(&format!("{}{}", REST_PREFIX, table))?;

        let response = self
            .build_request(Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(Error::Network)?;

        handle_json_response(response).await
    }

    /// Insert a row and return the inserted representation.
    pub async fn insert(&self, table: &str, body: &Value) -> Result<Value> {
        let url = self.config.resolve_url(&format!("{}{}", REST_PREFIX, table))?;

        let response = self
            .build_request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(Error::Network)?;

        handle_json_response(response).await
    }

    /// Update rows matching the filters.
    pub async fn update(&self, table: &str, query: &[(&str, &str)], body: &Value) -> Result<Value> {
        let url = self.config.resolve_url(&format!("{}{}", REST_PREFIX, table))?;

        let response = self
            .build_request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(Error::Network)?;

        handle_json_response(response).await
    }

    /// Upload raw bytes to a storage bucket path.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = self
            .config
            .resolve_url(&format!("{}{}/{}", STORAGE_PREFIX, bucket, path))?;

        let response = self
            .build_request(Method::POST, url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Upload(extract_error_message(&body).unwrap_or_else(|| {
            format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )
        })))
    }

    /// POST a JSON payload to an absolute URL outside the hosted backend and
    /// return the raw response body.
    pub async fn post_external(&self, url: &str, body: &Value) -> Result<String> {
        let url = Url::parse(url).map_err(Error::Url)?;

        let response = self
            .client
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        let text = response.text().await.map_err(Error::Network)?;

        if !status.is_success() && text.is_empty() {
            return Err(Error::remote(
                status.as_u16().to_string(),
                status.canonical_reason().unwrap_or("Unknown error"),
            ));
        }

        Ok(text)
    }
}

/// Handle a backend response, mapping error bodies to `Error::Remote`.
async fn handle_json_response(response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await.map_err(Error::Network)?;

    if !status.is_success() {
        let message = extract_error_message(&text).unwrap_or_else(|| {
            status.canonical_reason().unwrap_or("Unknown error").to_owned()
        });
        return Err(Error::remote(status.as_u16().to_string(), message));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(Error::Json)
}

/// Pull a human-readable message out of an error body. The backend has
/// used several field names across versions.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    for key in ["message", "error_description", "error", "msg", "hint"] {
        if let Some(msg) = value.get(key).and_then(Value::as_str) {
            if !msg.is_empty() {
                return Some(msg.to_owned());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let config = HttpConfig::default();

        let url = config.resolve_url("rest/v1/feed_posts").unwrap();
        assert!(url.as_str().contains("api.fanline.app"));
        assert!(url.as_str().ends_with("rest/v1/feed_posts"));
    }

    #[test]
    fn test_public_object_url() {
        let config = HttpConfig::default();

        let url = config.public_object_url("avatars", "u-1/pic.png").unwrap();
        assert!(url
            .as_str()
            .ends_with("storage/v1/object/public/avatars/u-1/pic.png"));
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message": "permission denied"}"#),
            Some("permission denied".to_owned())
        );
        assert_eq!(
            extract_error_message(r#"{"error": "Bucket not found"}"#),
            Some("Bucket not found".to_owned())
        );
        assert_eq!(extract_error_message("not json"), None);
        assert_eq!(extract_error_message(r#"{"message": ""}"#), None);
    }
}
