//! Pagination queries for the document source.

use serde::Serialize;
use serde_json::Value;

/// Largest page the bridge ever requests.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A single list-documents query.
///
/// Serialized in the JSON query form accepted by the document database:
/// `{"method":"limit","values":[100]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Caps the number of documents returned.
    Limit(u32),
    /// Returns documents strictly after the document with this id.
    CursorAfter(String),
}

#[derive(Serialize)]
struct QueryWire<'a> {
    method: &'a str,
    values: [Value; 1],
}

impl Query {
    /// Returns the query method name.
    pub fn method(&self) -> &'static str {
        match self {
            Query::Limit(_) => "limit",
            Query::CursorAfter(_) => "cursorAfter",
        }
    }

    /// Encodes the query as a JSON string.
    pub fn to_json(&self) -> String {
        let value = match self {
            Query::Limit(limit) => Value::from(*limit),
            Query::CursorAfter(cursor) => Value::from(cursor.as_str()),
        };
        let wire = QueryWire {
            method: self.method(),
            values: [value],
        };
        // Serializing a struct of a str and a JSON value cannot fail.
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

/// Request for one page of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of documents, within `1..=MAX_PAGE_SIZE`.
    pub limit: u32,
    /// Identifier of the last document already seen.
    pub cursor_after: Option<String>,
}

impl PageRequest {
    /// Creates a request for the first page.
    ///
    /// The limit is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            cursor_after: None,
        }
    }

    /// Continues after the given cursor.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.cursor_after = Some(cursor.into());
        self
    }

    /// Returns the queries for this request, limit first.
    pub fn queries(&self) -> Vec<Query> {
        let mut queries = vec![Query::Limit(self.limit)];
        if let Some(cursor) = &self.cursor_after {
            queries.push(Query::CursorAfter(cursor.clone()));
        }
        queries
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn query_json_form() {
        assert_eq!(
            Query::Limit(100).to_json(),
            r#"{"method":"limit","values":[100]}"#
        );
        assert_eq!(
            Query::CursorAfter("abc".into()).to_json(),
            r#"{"method":"cursorAfter","values":["abc"]}"#
        );
    }

    #[test]
    fn first_page_has_no_cursor() {
        let request = PageRequest::default();
        assert_eq!(request.queries(), vec![Query::Limit(100)]);
    }

    #[test]
    fn continuation_adds_cursor() {
        let request = PageRequest::new(25).after("doc-9");
        assert_eq!(
            request.queries(),
            vec![Query::Limit(25), Query::CursorAfter("doc-9".into())]
        );
    }

    proptest! {
        #[test]
        fn limit_is_always_within_bounds(limit in any::<u32>()) {
            let request = PageRequest::new(limit);
            prop_assert!(request.limit >= 1);
            prop_assert!(request.limit <= MAX_PAGE_SIZE);
        }
    }
}
