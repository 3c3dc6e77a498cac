//! Collection commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::config::{build_authed_client, build_client};
use crate::handlers::collection as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum CollectionAction {
    /// List a creator's collections
    #[command(alias = "ls")]
    List {
        /// Creator id or username
        owner: String,
    },

    /// View items in a collection
    Items {
        /// Collection ID
        collection_id: String,
    },

    /// Spend points to unlock a collection
    Unlock {
        /// Collection ID
        collection_id: String,
    },
}

pub async fn handle(action: CollectionAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        CollectionAction::List { owner } => list_collections(&owner, format).await,
        CollectionAction::Items { collection_id } => list_items(&collection_id, format).await,
        CollectionAction::Unlock { collection_id } => unlock(&collection_id).await,
    }
}

async fn list_collections(owner: &str, format: OutputFormat) -> Result<()> {
    let client = build_client()?;
    let result = handlers::list_collections(&client, owner).await?;

    if matches!(format, OutputFormat::Plain) {
        println!("Collections by {} ({})\n", result.owner, result.collections.len());
    }

    print_table(result.collections, format);
    Ok(())
}

async fn list_items(collection_id: &str, format: OutputFormat) -> Result<()> {
    let client = build_client()?;
    let items = handlers::list_items(&client, collection_id).await?;

    print_table(items, format);
    Ok(())
}

async fn unlock(collection_id: &str) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::unlock(&client, collection_id).await?;

    if result.unlocked {
        println!("{} Unlocked \"{}\" for {} points", "✓".green(), result.title, result.price);
    } else {
        println!("{} {}", "✗".red(), result.reason);
    }
    Ok(())
}
