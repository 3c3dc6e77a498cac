//! Message commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::config::build_authed_client;
use crate::handlers::message as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum MessageAction {
    /// List conversations
    #[command(alias = "ls")]
    List,

    /// View messages in a conversation
    Read {
        /// Conversation ID
        conversation_id: String,
    },

    /// Send a message to a user
    Send {
        /// Recipient username
        #[arg(short, long)]
        to: String,
        /// Message content
        content: String,
    },
}

pub async fn handle(action: MessageAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        MessageAction::List => list_conversations(format).await,
        MessageAction::Read { conversation_id } => {
            read_conversation(&conversation_id, format).await
        }
        MessageAction::Send { to, content } => send_message(&to, &content).await,
    }
}

async fn list_conversations(format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::list_conversations(&client).await?;

    if matches!(format, OutputFormat::Plain) {
        println!("Conversations ({})\n", result.conversations.len());
    }

    print_table(result.conversations, format);
    Ok(())
}

async fn read_conversation(conversation_id: &str, format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::read_conversation(&client, conversation_id).await?;

    if matches!(format, OutputFormat::Plain) {
        println!(
            "Conversation with {} ({} messages)\n",
            result.other_name.green(),
            result.messages.len()
        );
    }

    print_table(result.messages, format);
    Ok(())
}

async fn send_message(to: &str, content: &str) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::send_message(&client, to, content).await?;

    println!("Message sent to {} (conversation {})", to, result.conversation_id);
    if let Some(reply) = result.webhook_reply {
        println!("{} {}", "reply:".dimmed(), reply);
    }
    Ok(())
}
