//! Text and JSON rendering of API results

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use maintrack_domain::MaintenanceRequest;
use maintrack_infra::ApiError;

const TITLE_WIDTH: usize = 36;

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Compact table, one request per line.
pub fn request_table(requests: &[MaintenanceRequest]) -> String {
    if requests.is_empty() {
        return "No maintenance requests.\n".to_string();
    }

    let mut out = format!(
        "{:>6}  {:<12}  {:<7}  {:<TITLE_WIDTH$}  {:<18}  {}\n",
        "ID", "STATUS", "PRIO", "TITLE", "REQUESTER", "CREATED"
    );
    for request in requests {
        let _ = writeln!(
            out,
            "{:>6}  {:<12}  {:<7}  {:<TITLE_WIDTH$}  {:<18}  {}",
            request.id,
            request.status.as_code(),
            request.priority.as_code(),
            truncate(&request.title, TITLE_WIDTH),
            truncate(&request.requester_name, 18),
            local_time(&request.created_at),
        );
    }
    out
}

/// Every field of one request, followed by its status history.
pub fn request_detail(request: &MaintenanceRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", request.id, request.title);
    let _ = writeln!(out, "Status:      {}", request.status);
    let _ = writeln!(out, "Priority:    {}", request.priority);
    if let Some(location) = &request.location {
        let _ = writeln!(out, "Location:    {location}");
    }
    let _ = writeln!(out, "Requester:   {}", request.requester_name);
    if let Some(approver) = &request.approver_name {
        let _ = writeln!(out, "Approver:    {approver}");
    }
    if let Some(executor) = &request.executor_name {
        let _ = writeln!(out, "Executor:    {executor}");
    }
    let _ = writeln!(out, "Created:     {}", local_time(&request.created_at));
    let _ = writeln!(out, "Updated:     {}", local_time(&request.updated_at));
    if let Some(at) = &request.approved_at {
        let _ = writeln!(out, "Approved:    {}", local_time(at));
    }
    if let Some(at) = &request.completed_at {
        let _ = writeln!(out, "Completed:   {}", local_time(at));
    }
    if let Some(attachment) = &request.attachment {
        let _ = writeln!(out, "Attachment:  {attachment}");
    }
    let _ = writeln!(out, "\n{}", request.description);
    if let Some(notes) = &request.notes {
        let _ = writeln!(out, "\nNotes: {notes}");
    }

    if !request.history.is_empty() {
        let _ = writeln!(out, "\nHistory:");
        let mut history: Vec<_> = request.history.iter().collect();
        history.sort_by_key(|record| record.created_at);
        for record in history {
            let _ = write!(
                out,
                "  {}  {} -> {}",
                local_time(&record.created_at),
                record.previous_status,
                record.new_status
            );
            if let Some(actor) = &record.actor_name {
                let _ = write!(out, " by {actor}");
            }
            if !record.note.trim().is_empty() {
                let _ = write!(out, ": {}", record.note);
            }
            out.push('\n');
        }
    }
    out
}

/// Pretty JSON in the backend's own field names.
pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Human-readable error, with the backend's field messages when present.
pub fn error_message(err: &anyhow::Error) -> String {
    let Some(api) = err.downcast_ref::<ApiError>() else {
        return format!("{err:#}");
    };

    if api.is_session_expired() {
        return "session expired, run `maintrack login`".to_string();
    }

    let Some(response) = api.response() else {
        return api.to_string();
    };
    if let Some(message) = response.message() {
        return format!("{message} (HTTP {})", response.status);
    }

    let fields = response.field_errors();
    if fields.is_empty() {
        return api.to_string();
    }
    let mut out = format!("request rejected (HTTP {}):", response.status);
    for (field, messages) in fields {
        let _ = write!(out, "\n  {field}: {}", messages.join(" "));
    }
    out
}
