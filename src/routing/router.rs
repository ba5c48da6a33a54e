//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled prefix and exact routes
//! - Resolve a request path and raw query to an absolute upstream URL
//! - Return explicit no-match so the caller can answer 404
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap on the first path segment
//! - Path and query are forwarded as received, without re-encoding

use std::collections::HashMap;

use crate::config::{ExactRoutes, RouteTable};

/// Compiled, immutable route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    prefixes: HashMap<String, String>,
    exact: HashMap<String, String>,
}

impl Router {
    /// Compile routes from configuration.
    pub fn from_config(routes: &RouteTable, exact_routes: &ExactRoutes) -> Self {
        let prefixes = routes
            .0
            .iter()
            .map(|r| (r.prefix.clone(), r.upstream.clone()))
            .collect();
        let exact = exact_routes
            .0
            .iter()
            .map(|r| (r.path.clone(), r.target.clone()))
            .collect();

        Self { prefixes, exact }
    }

    /// Resolve `path` (plus the raw query string, without `?`) to an upstream URL.
    ///
    /// Exact routes win over prefix routes. For prefix routes the first path
    /// segment selects the upstream base URL and the remainder of the path is
    /// appended verbatim, so `/openai/v1/models` becomes
    /// `https://api.openai.com/v1/models`.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> Option<String> {
        let (base, remainder) = match self.exact.get(path) {
            Some(target) => (target.as_str(), ""),
            None => {
                let prefix = first_segment(path)?;
                let base = self.prefixes.get(prefix)?;
                (base.as_str(), &path[prefix.len()..])
            }
        };

        let mut target = String::with_capacity(base.len() + remainder.len() + 1);
        target.push_str(base);
        target.push_str(remainder);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        Some(target)
    }

    /// Number of prefix routes.
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// The leading `/segment` of a path, or `None` for paths that don't start with `/`.
fn first_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    let end = rest.find('/').map_or(path.len(), |i| i + 1);
    Some(&path[..end])
}
