//! login, logout and status

use std::io::{self, IsTerminal};

use anyhow::{bail, Context as _};
use maintrack_domain::LoginCredentials;
use serde_json::json;
use tracing::info;

use super::Format;
use crate::context::AppContext;
use crate::output;

pub async fn login(
    ctx: &AppContext,
    username: String,
    password: Option<String>,
) -> anyhow::Result<String> {
    let password = match password {
        Some(password) => password,
        None => read_password().await?,
    };

    ctx.auth.login(&LoginCredentials::new(username.clone(), password)).await?;
    info!(%username, "logged in");
    Ok(format!("Logged in as {username}.\n"))
}

async fn read_password() -> anyhow::Result<String> {
    let password = tokio::task::spawn_blocking(|| {
        if io::stdin().is_terminal() {
            rpassword::prompt_password("Password: ")
        } else {
            rpassword::read_password_from_bufread(&mut io::stdin().lock())
        }
    })
    .await
    .context("password prompt was interrupted")?
    .context("failed to read password")?;

    non_empty(password)
}

fn non_empty(password: String) -> anyhow::Result<String> {
    let password = password.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("no password given");
    }
    Ok(password)
}

pub async fn logout(ctx: &AppContext) -> anyhow::Result<String> {
    ctx.auth.logout().await?;
    Ok("Logged out.\n".to_string())
}

pub async fn status(ctx: &AppContext, format: Format) -> anyhow::Result<String> {
    let authenticated = ctx.auth.is_authenticated().await?;
    let api = &ctx.config.api;
    let storage = &ctx.config.storage;

    if format == Format::Json {
        return output::json(&json!({
            "authenticated": authenticated,
            "base_url": api.base_url,
            "token_url": api.token_url(),
            "token_store": storage.backend.as_code(),
            "token_path": storage.path,
        }))
        .map(|s| s + "\n");
    }

    let mut out = format!(
        "{}\nBackend:     {}\nCredentials: {} store",
        if authenticated { "Logged in." } else { "Not logged in." },
        api.base_url,
        storage.backend,
    );
    if let Some(path) = &storage.path {
        out.push_str(&format!(" ({})", path.display()));
    }
    out.push('\n');
    Ok(out)
}
