//! External webhook gateway.
//!
//! One HTTP endpoint outside the hosted backend processes chat messages
//! and "spend points to unlock" actions. Its typed JSON contract is
//! authoritative here; the legacy deployments answered with plain text
//! that clients matched for fixed marker substrings, so those markers are
//! kept as a fallback shim for compatibility with endpoints that predate
//! the typed contract.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::{client::ClientInner, error::Result};

/// Legacy plain-text marker for an accepted action.
const LEGACY_SUCCESS_MARKER: &str = "SUCCESS";

/// Legacy plain-text marker for a declined spend.
const LEGACY_INSUFFICIENT_MARKER: &str = "Insufficient points";

/// Outcome of a webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The action was accepted; chat actions may carry a reply.
    Accepted { reply: Option<String> },
    /// The viewer's points balance cannot cover the spend.
    InsufficientBalance,
    /// Unrecognized response body, kept verbatim for the caller.
    Other(String),
}

impl WebhookOutcome {
    /// Whether the action went through.
    pub fn is_accepted(&self) -> bool {
        matches!(self, WebhookOutcome::Accepted { .. })
    }
}

/// Gateway to the external message/points endpoint.
pub struct WebhookApi {
    client: Arc<ClientInner>,
}

impl WebhookApi {
    pub(crate) fn new(client: Arc<ClientInner>) -> Self {
        Self { client }
    }

    /// Submit a chat message for processing.
    pub async fn send_chat(
        &self,
        user_id: &str,
        conversation_id: &str,
        message: &str,
    ) -> Result<WebhookOutcome> {
        let payload = json!({
            "kind": "chat_message",
            "user_id": user_id,
            "conversation_id": conversation_id,
            "message": message,
        });

        self.post(&payload).await
    }

    /// Spend points to unlock a target (a post or collection).
    pub async fn spend_points(
        &self,
        user_id: &str,
        target_id: &str,
        amount: i64,
    ) -> Result<WebhookOutcome> {
        let payload = json!({
            "kind": "spend_points",
            "user_id": user_id,
            "target_id": target_id,
            "amount": amount,
        });

        self.post(&payload).await
    }

    async fn post(&self, payload: &Value) -> Result<WebhookOutcome> {
        let url = self.client.require_webhook_url()?;
        let body = self.client.executor().post_external(url, payload).await?;
        Ok(parse_outcome(&body))
    }
}

/// Decide the outcome from a response body: typed JSON first, then the
/// legacy marker substrings.
fn parse_outcome(body: &str) -> WebhookOutcome {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(status) = value.get("status").and_then(Value::as_str) {
            match status {
                "ok" | "success" => {
                    let reply = value
                        .get("reply")
                        .and_then(Value::as_str)
                        .map(str::to_owned);
                    return WebhookOutcome::Accepted { reply };
                }
                "insufficient_points" | "insufficient_balance" => {
                    return WebhookOutcome::InsufficientBalance;
                }
                _ => {}
            }
        }
    }

    if body.contains(LEGACY_INSUFFICIENT_MARKER) {
        return WebhookOutcome::InsufficientBalance;
    }
    if body.contains(LEGACY_SUCCESS_MARKER) {
        return WebhookOutcome::Accepted { reply: None };
    }

    WebhookOutcome::Other(body.to_owned())
}
