//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route prefixes must be a single, non-root path segment
//! - Upstream and exact-route targets must be absolute http(s) URLs with no
//!   query or fragment
//! - Detect duplicate routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route prefix {0:?} must start with '/'")]
    PrefixMissingSlash(String),

    #[error("route prefix {0:?} must name a path segment")]
    PrefixIsRoot(String),

    #[error("route prefix {0:?} must be a single path segment without a trailing slash")]
    PrefixNotSingleSegment(String),

    #[error("route prefix {0:?} is defined more than once")]
    DuplicatePrefix(String),

    #[error("exact route path {0:?} must start with '/'")]
    PathMissingSlash(String),

    #[error("exact route path {0:?} is defined more than once")]
    DuplicatePath(String),

    #[error("{url:?} is not an absolute http(s) URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0:?} must not carry a query or fragment")]
    UrlHasQueryOrFragment(String),

    #[error("upstream {0:?} must not end with '/'")]
    UpstreamTrailingSlash(String),

    #[error("denied header substrings must not be empty strings")]
    EmptyDeniedSubstring,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut prefixes = HashSet::new();
    for route in &config.routes.0 {
        if let Some(err) = check_prefix(&route.prefix) {
            errors.push(err);
        } else if !prefixes.insert(route.prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix(route.prefix.clone()));
        }

        if let Err(err) = check_url(&route.upstream) {
            errors.push(err);
        } else if route.upstream.ends_with('/') {
            errors.push(ValidationError::UpstreamTrailingSlash(route.upstream.clone()));
        }
    }

    let mut paths = HashSet::new();
    for route in &config.exact_routes.0 {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::PathMissingSlash(route.path.clone()));
        } else if !paths.insert(route.path.as_str()) {
            errors.push(ValidationError::DuplicatePath(route.path.clone()));
        }

        if let Err(err) = check_url(&route.target) {
            errors.push(err);
        }
    }

    if config
        .headers
        .denied_substrings
        .iter()
        .any(|s| s.is_empty())
    {
        errors.push(ValidationError::EmptyDeniedSubstring);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_prefix(prefix: &str) -> Option<ValidationError> {
    let Some(segment) = prefix.strip_prefix('/') else {
        return Some(ValidationError::PrefixMissingSlash(prefix.to_string()));
    };
    if segment.is_empty() {
        return Some(ValidationError::PrefixIsRoot(prefix.to_string()));
    }
    if segment.contains('/') {
        return Some(ValidationError::PrefixNotSingleSegment(prefix.to_string()));
    }
    None
}

fn check_url(raw: &str) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    // The request path and query are appended verbatim.
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::UrlHasQueryOrFragment(raw.to_string()));
    }
    Ok(())
}
