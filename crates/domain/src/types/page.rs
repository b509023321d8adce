//! List response envelope

use serde::Deserialize;

/// A list response, paginated or not
///
/// The backend returns a bare array when pagination is off and a
/// `{count, next, previous, results}` envelope when it is on. Callers only
/// ever want the items, so both shapes flatten through [`Page::into_items`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Plain(Vec<T>),
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
}

impl<T> Page<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Plain(items) => items,
            Self::Paginated { results, .. } => results,
        }
    }

    /// URL of the next page, when the server paginates.
    pub fn next_page(&self) -> Option<&str> {
        match self {
            Self::Paginated { next, .. } => next.as_deref(),
            Self::Plain(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_bare_array() {
        let page: Page<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert!(page.next_page().is_none());
        assert_eq!(page.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn decodes_paginated_envelope() {
        let page: Page<u32> = serde_json::from_value(json!({
            "count": 12,
            "next": "http://localhost:8000/api/requisicoes/?page=2",
            "previous": null,
            "results": [4, 5]
        }))
        .unwrap();

        assert_eq!(page.next_page(), Some("http://localhost:8000/api/requisicoes/?page=2"));
        assert_eq!(page.into_items(), vec![4, 5]);
    }
}
