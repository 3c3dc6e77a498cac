//! Message handlers.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use fanline::{Error, FanClient, IdentityContext, UserId, WebhookOutcome};
use serde::Serialize;

use crate::output::{format_relative_time, PlainPrint, TableRow};

/// Conversation list entry.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationInfo {
    pub id: String,
    pub with: String,
    pub preview: String,
    pub last_activity: Option<DateTime<Utc>>,
}

impl TableRow for ConversationInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "With", "Preview", "Last"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.with.clone(),
            self.preview.clone(),
            format_relative_time(self.last_activity),
        ]
    }
}

impl PlainPrint for ConversationInfo {
    fn plain_print(&self) {
        println!(
            "[{}] {} {}",
            self.id.cyan(),
            self.with.green(),
            format_relative_time(self.last_activity).dimmed()
        );
        if !self.preview.is_empty() {
            println!("   {}", self.preview);
        }
    }
}

/// Conversation list result.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationListResult {
    pub conversations: Vec<ConversationInfo>,
}

/// Single message entry.
#[derive(Debug, Clone, Serialize)]
pub struct MessageInfo {
    pub id: String,
    pub from: String,
    pub is_mine: bool,
    pub content: String,
    pub time: Option<DateTime<Utc>>,
}

impl TableRow for MessageInfo {
    fn headers() -> Vec<&'static str> {
        vec!["From", "Content", "Time"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.from.clone(),
            self.content.clone(),
            format_relative_time(self.time),
        ]
    }
}

impl PlainPrint for MessageInfo {
    fn plain_print(&self) {
        let from_display = if self.is_mine {
            "You".green().to_string()
        } else {
            self.from.clone()
        };
        println!("{} {}", from_display, format_relative_time(self.time).dimmed());
        for line in self.content.lines() {
            if !line.trim().is_empty() {
                println!("   {}", line);
            }
        }
        println!();
    }
}

/// Conversation read result.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationReadResult {
    pub conversation_id: String,
    pub other_name: String,
    pub messages: Vec<MessageInfo>,
}

/// Send result.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResult {
    pub conversation_id: String,
    pub webhook_reply: Option<String>,
}

/// List the signed-in user's conversations with resolved display names.
pub async fn list_conversations(client: &FanClient) -> Result<ConversationListResult> {
    let me: UserId = client
        .identity()
        .resolve(IdentityContext::Messaging)
        .await?
        .into();

    let conversations = client.messages().conversations(&me).await?;

    // One batched profile lookup covers every counterpart.
    let other_ids: Vec<UserId> = conversations
        .iter()
        .map(|c| c.other_party(&me).clone())
        .collect();
    let names = display_names(client, &other_ids).await;

    Ok(ConversationListResult {
        conversations: conversations
            .iter()
            .map(|c| {
                let other = c.other_party(&me);
                ConversationInfo {
                    id: c.id.to_string(),
                    with: names
                        .get(other)
                        .cloned()
                        .unwrap_or_else(|| other.to_string()),
                    preview: c.preview.clone(),
                    last_activity: c.last_activity,
                }
            })
            .collect(),
    })
}

/// Read a conversation's messages.
pub async fn read_conversation(
    client: &FanClient,
    conversation_id: &str,
) -> Result<ConversationReadResult> {
    let me: UserId = client
        .identity()
        .resolve(IdentityContext::Messaging)
        .await?
        .into();

    let conversation = client
        .messages()
        .conversation(&conversation_id.into())
        .await?
        .ok_or_else(|| anyhow!("Conversation {} not found", conversation_id))?;

    let messages = client.messages().messages_in(&conversation.id).await?;

    let other = conversation.other_party(&me).clone();
    let names = display_names(client, std::slice::from_ref(&other)).await;
    let other_name = names
        .get(&other)
        .cloned()
        .unwrap_or_else(|| other.to_string());

    Ok(ConversationReadResult {
        conversation_id: conversation.id.to_string(),
        other_name: other_name.clone(),
        messages: messages
            .iter()
            .map(|m| MessageInfo {
                id: m.id.to_string(),
                from: if m.sender_id == me {
                    "You".to_string()
                } else {
                    other_name.clone()
                },
                is_mine: m.sender_id == me,
                content: m.text.clone(),
                time: m.sent_at,
            })
            .collect(),
    })
}

/// Send a message to a user by handle, creating the conversation if this
/// is the first contact. The webhook gateway is notified when configured.
pub async fn send_message(
    client: &FanClient,
    to_username: &str,
    content: &str,
) -> Result<SendMessageResult> {
    let me: UserId = client
        .identity()
        .resolve(IdentityContext::Messaging)
        .await?
        .into();

    let recipient = client
        .profiles()
        .by_username(to_username)
        .await?
        .ok_or_else(|| anyhow!("User '{}' not found", to_username))?;

    let conversation = client.messages().find_or_create(&me, &recipient.id).await?;
    client
        .messages()
        .send(&conversation.id, &me, content, None)
        .await?;

    let webhook_reply = match client
        .webhook()
        .send_chat(me.as_str(), conversation.id.as_str(), content)
        .await
    {
        Ok(WebhookOutcome::Accepted { reply }) => reply,
        // No webhook configured; the message row alone is enough.
        Err(Error::InvalidArgument(_)) => None,
        Ok(_) | Err(_) => None,
    };

    Ok(SendMessageResult {
        conversation_id: conversation.id.to_string(),
        webhook_reply,
    })
}

/// Resolve display names for a set of user ids; lookup failures fall back
/// to the raw ids.
async fn display_names(client: &FanClient, ids: &[UserId]) -> HashMap<UserId, String> {
    let unique: Vec<UserId> = {
        let mut seen = Vec::new();
        for id in ids {
            if !seen.contains(id) {
                seen.push(id.clone());
            }
        }
        seen
    };

    match client.profiles().by_ids(&unique).await {
        Ok(profiles) => profiles
            .into_iter()
            .map(|p| (p.id.clone(), p.display().to_string()))
            .collect(),
        Err(_) => HashMap::new(),
    }
}
