//! Maintenance request commands

use std::path::Path;

use anyhow::{bail, Context as _};
use maintrack_domain::{
    Attachment, MaintenanceRequest, MaintenanceRequestPatch, NewMaintenanceRequest, RequestFilter,
    RequestId, RequestStatus,
};

use super::Format;
use crate::cli::{CreateArgs, ListArgs, UpdateArgs};
use crate::context::AppContext;
use crate::output;

fn render_many(requests: &[MaintenanceRequest], format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => output::json(requests).map(|s| s + "\n"),
        Format::Table => Ok(output::request_table(requests)),
    }
}

fn render_one(request: &MaintenanceRequest, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Json => output::json(request).map(|s| s + "\n"),
        Format::Table => Ok(output::request_detail(request)),
    }
}

pub fn filter_from(args: ListArgs) -> RequestFilter {
    RequestFilter {
        status: args.status,
        priority: args.priority,
        search: args.search,
        requester: args.requester,
        ordering: args.ordering,
    }
}

pub async fn list(ctx: &AppContext, args: ListArgs, format: Format) -> anyhow::Result<String> {
    let requests = ctx.requests.list(&filter_from(args)).await?;
    render_many(&requests, format)
}

pub async fn show(ctx: &AppContext, id: RequestId, format: Format) -> anyhow::Result<String> {
    let request = ctx.requests.get(id).await?;
    render_one(&request, format)
}

async fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read attachment {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("attachment path has no usable file name: {}", path.display()))?;
    Ok(Attachment::new(file_name, bytes))
}

pub async fn create(ctx: &AppContext, args: CreateArgs, format: Format) -> anyhow::Result<String> {
    let mut input = NewMaintenanceRequest::new(args.title, args.description, args.priority);
    if let Some(location) = args.location {
        input = input.with_location(location);
    }
    if let Some(path) = &args.attachment {
        input = input.with_attachment(read_attachment(path).await?);
    }

    let created = ctx.requests.create(&input).await?;
    match format {
        Format::Json => render_one(&created, format),
        Format::Table => Ok(format!("Created request #{}.\n", created.id)),
    }
}

pub fn patch_from(args: &UpdateArgs) -> MaintenanceRequestPatch {
    MaintenanceRequestPatch {
        title: args.title.clone(),
        description: args.description.clone(),
        priority: args.priority,
        location: args.location.clone(),
    }
}

pub async fn update(ctx: &AppContext, args: UpdateArgs, format: Format) -> anyhow::Result<String> {
    let patch = patch_from(&args);
    if patch.is_empty() {
        bail!("nothing to update: pass --title, --description, --priority or --location");
    }

    let updated = ctx.requests.update(args.id, &patch).await?;
    render_one(&updated, format)
}

pub async fn set_status(
    ctx: &AppContext,
    id: RequestId,
    status: RequestStatus,
    note: Option<String>,
    format: Format,
) -> anyhow::Result<String> {
    let note = note.filter(|n| !n.trim().is_empty());
    let updated = ctx.requests.update_status(id, status, note).await?;
    match format {
        Format::Json => render_one(&updated, format),
        Format::Table => Ok(format!("Request #{} is now {}.\n", updated.id, updated.status)),
    }
}

pub async fn delete(ctx: &AppContext, id: RequestId) -> anyhow::Result<String> {
    ctx.requests.delete(id).await?;
    Ok(format!("Deleted request #{id}.\n"))
}

pub async fn mine(ctx: &AppContext, format: Format) -> anyhow::Result<String> {
    render_many(&ctx.requests.mine().await?, format)
}

pub async fn pending(ctx: &AppContext, format: Format) -> anyhow::Result<String> {
    render_many(&ctx.requests.pending().await?, format)
}
