//! Feed commands.

use anyhow::Result;
use clap::Subcommand;

use crate::config::build_client;
use crate::handlers::feed as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum FeedAction {
    /// Browse the feed
    #[command(alias = "ls")]
    Show {
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// Page size
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
}

pub async fn handle(action: FeedAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        FeedAction::Show { pages, limit } => show_feed(pages, limit, format).await,
    }
}

async fn show_feed(pages: u32, limit: u32, format: OutputFormat) -> Result<()> {
    let client = build_client()?;
    let result = handlers::browse_feed(&client, pages, limit).await?;

    if matches!(format, OutputFormat::Plain) {
        let more = if result.has_more {
            "more available"
        } else {
            "end of feed"
        };
        println!("Feed for {} ({} posts, {})\n", result.viewer_id, result.posts.len(), more);
    }

    print_table(result.posts, format);
    Ok(())
}
