//! Command handlers
//!
//! Each handler performs one façade call and returns the text to print.

mod auth;
mod requests;

use crate::cli::Commands;
use crate::context::AppContext;

/// Output mode chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

impl Format {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

pub async fn dispatch(ctx: &AppContext, command: Commands, format: Format) -> anyhow::Result<String> {
    match command {
        Commands::Login { username, password } => auth::login(ctx, username, password).await,
        Commands::Logout => auth::logout(ctx).await,
        Commands::Status => auth::status(ctx, format).await,
        Commands::List(args) => requests::list(ctx, args, format).await,
        Commands::Show { id } => requests::show(ctx, id, format).await,
        Commands::Create(args) => requests::create(ctx, args, format).await,
        Commands::Update(args) => requests::update(ctx, args, format).await,
        Commands::SetStatus { id, status, note } => {
            requests::set_status(ctx, id, status, note, format).await
        }
        Commands::Delete { id } => requests::delete(ctx, id).await,
        Commands::Mine => requests::mine(ctx, format).await,
        Commands::Pending => requests::pending(ctx, format).await,
    }
}
