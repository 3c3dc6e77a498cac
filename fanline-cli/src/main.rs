//! Fanline CLI.

mod commands;
mod config;
mod handlers;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{collection, feed, message, user};

/// Fanline platform CLI
#[derive(Parser)]
#[command(name = "fanline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Feed operations
    #[command(alias = "f")]
    Feed {
        #[command(subcommand)]
        action: feed::FeedAction,
    },

    /// Message operations
    #[command(alias = "m")]
    Message {
        #[command(subcommand)]
        action: message::MessageAction,
    },

    /// Collection operations
    #[command(alias = "c")]
    Collection {
        #[command(subcommand)]
        action: collection::CollectionAction,
    },

    /// User operations
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        action: user::UserAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Login with access token and user id
    Login {
        /// Access token
        #[arg(short, long)]
        token: String,
        /// User ID
        #[arg(short, long)]
        user_id: String,
        /// Sign-in email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Logout
    Logout,
    /// Show current auth status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Auth { action } => handle_auth(action).await,
        Commands::Feed { action } => feed::handle(action, cli.format, cli.verbose).await,
        Commands::Message { action } => message::handle(action, cli.format, cli.verbose).await,
        Commands::Collection { action } => collection::handle(action, cli.format, cli.verbose).await,
        Commands::User { action } => user::handle(action, cli.format, cli.verbose).await,
        Commands::Config => {
            let cfg = config::load_config()?;
            println!("Config file: {}", config::config_path()?.display());
            println!("Backend: {}", cfg.backend.base_url_or_default());
            println!("Webhook configured: {}", cfg.backend.webhook_url.is_some());
            println!("Authenticated: {}", cfg.auth.is_some());
            if let Some(auth) = &cfg.auth {
                println!("User ID: {}", auth.user_id);
            }
            Ok(())
        }
    }
}

async fn handle_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login {
            token,
            user_id,
            email,
        } => {
            let mut cfg = config::load_config()?;
            cfg.auth = Some(config::AuthConfig {
                token,
                user_id: user_id.clone(),
                email,
            });
            config::save_config(&cfg)?;
            println!("Logged in as {}", user_id);
            Ok(())
        }
        AuthAction::Logout => {
            let mut cfg = config::load_config()?;
            cfg.auth = None;
            config::save_config(&cfg)?;
            println!("Logged out");
            Ok(())
        }
        AuthAction::Status => {
            let cfg = config::load_config()?;
            if let Some(auth) = &cfg.auth {
                println!("Logged in as {}", auth.user_id);
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
    }
}
