//! Write models sent to the backend

use std::fmt;

use serde::Serialize;

use super::request::{Priority, RequestStatus};

/// File uploaded together with a new request
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create an attachment, guessing the content type from the file name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).map(str::to_string);
        Self { file_name, content_type, bytes }
    }

    /// Override the guessed content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => return None,
    };
    Some(mime)
}

/// Input for creating a maintenance request
///
/// The attachment decides the encoding: multipart when present, JSON
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMaintenanceRequest {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
    #[serde(rename = "localizacao", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip)]
    pub attachment: Option<Attachment>,
}

impl NewMaintenanceRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            location: None,
            attachment: None,
        }
    }

    /// Blank locations are dropped so the field stays absent.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        self.location = (!location.trim().is_empty()).then_some(location);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Text fields in the order the backend form expects them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("titulo", self.title.clone()),
            ("descricao", self.description.clone()),
            ("prioridade", self.priority.as_code().to_string()),
        ];
        if let Some(location) = &self.location {
            fields.push(("localizacao", location.clone()));
        }
        fields
    }
}

/// Partial update; absent fields are left untouched by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceRequestPatch {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "prioridade", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(rename = "localizacao", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl MaintenanceRequestPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.location.is_none()
    }
}

/// Body of the status-transition action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub status: RequestStatus,
    #[serde(rename = "observacao", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StatusChange {
    pub fn new(status: RequestStatus, note: Option<String>) -> Self {
        Self { status, note }
    }
}
