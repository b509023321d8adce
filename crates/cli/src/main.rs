//! `maintrack` - command-line client for the maintenance request backend

mod cli;
mod commands;
mod context;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::commands::Format;
use crate::context::AppContext;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: {err:#}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", output::error_message(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli.config)?;
    let mut watch = ctx.watch_session();

    let result = commands::dispatch(&ctx, cli.command, Format::from_flag(cli.json)).await;

    if let Some(reason) = watch.expired() {
        tracing::debug!(%reason, "session ended during command");
        if result.is_ok() {
            eprintln!("session expired, run `maintrack login`");
        }
    }

    print!("{}", result?);
    Ok(())
}
