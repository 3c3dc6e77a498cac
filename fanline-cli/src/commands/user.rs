//! User commands.

use anyhow::Result;
use clap::Subcommand;

use crate::config::{build_authed_client, build_client};
use crate::handlers::user as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum UserAction {
    /// Show a user profile by id, username, or email
    Show {
        /// User id, username, or email
        user: String,
    },

    /// Show the signed-in user's profile
    Me,

    /// Upload a new avatar image
    SetAvatar {
        /// Path to the image file
        path: std::path::PathBuf,
    },
}

pub async fn handle(action: UserAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        UserAction::Show { user } => {
            let client = build_client()?;
            let info = handlers::show_user(&client, &user).await?;
            print_table(vec![info], format);
            Ok(())
        }
        UserAction::Me => {
            let client = build_authed_client()?;
            let info = handlers::me(&client).await?;
            print_table(vec![info], format);
            Ok(())
        }
        UserAction::SetAvatar { path } => {
            let client = build_authed_client()?;
            let url = handlers::set_avatar(&client, &path).await?;
            println!("Avatar uploaded: {}", url);
            Ok(())
        }
    }
}
