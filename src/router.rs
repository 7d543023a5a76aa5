//! Route table for the todo surface.
//!
//! Entries are evaluated in insertion order and the first match wins, so the
//! table order is part of the HTTP contract.

use axum::http::Method;

/// Operation selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Shape a request path must have to match an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// The path equals the template exactly.
    Exact(&'static str),
    /// The path starts with the template; any suffix is accepted.
    Prefix(&'static str),
    /// `<base>/<digits>` with one or more ASCII digits and nothing after them.
    WithId(&'static str),
}

impl PathPattern {
    /// Returns `Some(captured id segment)` on a match; the segment is empty
    /// for patterns that capture nothing.
    fn matches<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Exact(template) => (path == *template).then_some(""),
            PathPattern::Prefix(template) => path.starts_with(*template).then_some(""),
            PathPattern::WithId(base) => {
                let segment = path.strip_prefix(*base)?.strip_prefix('/')?;
                let is_id = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
                is_id.then_some(segment)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub pattern: PathPattern,
    pub operation: Operation,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub operation: Operation,
    /// Raw digits of the id segment for id routes.
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: Method, pattern: PathPattern, operation: Operation) -> Self {
        self.entries.push(RouteEntry {
            method,
            pattern,
            operation,
        });
        self
    }

    /// The `/todos` table.
    pub fn todos() -> Self {
        Self::new()
            .route(Method::GET, PathPattern::Exact("/todos"), Operation::List)
            .route(Method::GET, PathPattern::WithId("/todos"), Operation::Get)
            .route(Method::POST, PathPattern::Prefix("/todos"), Operation::Create)
            .route(Method::PUT, PathPattern::WithId("/todos"), Operation::Update)
            .route(Method::DELETE, PathPattern::WithId("/todos"), Operation::Delete)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Finds the first entry matching `method` and `path` (query excluded).
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        self.entries.iter().find_map(|entry| {
            if entry.method != *method {
                return None;
            }
            let captured = entry.pattern.matches(path)?;
            let id = match entry.pattern {
                PathPattern::WithId(_) => Some(captured.to_string()),
                _ => None,
            };
            Some(RouteMatch {
                operation: entry.operation,
                id,
            })
        })
    }
}
