//! Listing filters and ordering

use super::request::{Priority, RequestStatus};

/// Sort order supported by the listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestOrdering {
    #[default]
    NewestFirst,
    OldestFirst,
    PriorityAscending,
    PriorityDescending,
}

crate::impl_wire_code_conversions!(RequestOrdering {
    NewestFirst => "-criado_em" | "newest",
    OldestFirst => "criado_em" | "oldest",
    PriorityAscending => "prioridade" | "priority",
    PriorityDescending => "-prioridade" | "-priority",
});

/// Optional constraints for listing requests
///
/// Every field maps to one query parameter; `None` (or a blank search
/// string) means the parameter is not sent at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub requester: Option<u64>,
    pub ordering: Option<RequestOrdering>,
}

impl RequestFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    #[must_use]
    pub fn requester(mut self, user_id: u64) -> Self {
        self.requester = Some(user_id);
        self
    }

    #[must_use]
    pub fn ordering(mut self, ordering: RequestOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    /// Query parameters in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_code().to_string()));
        }
        if let Some(priority) = self.priority {
            query.push(("prioridade", priority.as_code().to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(requester) = self.requester {
            query.push(("solicitante", requester.to_string()));
        }
        if let Some(ordering) = self.ordering {
            query.push(("ordering", ordering.as_code().to_string()));
        }
        query
    }
}
