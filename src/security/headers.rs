//! Header manipulation and security headers.
//!
//! # Responsibilities
//! - Decide which inbound headers may travel upstream
//! - Copy permitted headers, keeping every value of multi-value headers in order
//! - Stamp security headers on relayed responses
//!
//! # Design Decisions
//! - Deny-list of lowercase substrings, not whole names: anything containing
//!   `forward` drops `X-Forwarded-For` and `Forwarded` alike
//! - `Authorization` and other credentials pass through untouched
//! - Security headers overwrite whatever the upstream sent

use axum::http::header::{
    HeaderMap, HeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};

use crate::config::HeaderFilterConfig;

/// Substring deny-list applied to outbound request header names.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    denied: Vec<String>,
}

impl HeaderFilter {
    pub fn new<I, S>(denied: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denied: denied
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &HeaderFilterConfig) -> Self {
        Self::new(&config.denied_substrings)
    }

    /// Returns false if the lowercased name contains any denied substring.
    pub fn is_allowed(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        !self.denied.iter().any(|denied| name.contains(denied.as_str()))
    }

    /// Copy every allowed header from `source`, appending values in order.
    pub fn filter(&self, source: &HeaderMap) -> HeaderMap {
        let mut filtered = HeaderMap::with_capacity(source.len());
        for (name, value) in source {
            if self.is_allowed(name.as_str()) {
                filtered.append(name.clone(), value.clone());
            }
        }
        filtered
    }
}

impl Default for HeaderFilter {
    fn default() -> Self {
        Self::from_config(&HeaderFilterConfig::default())
    }
}

/// Overwrite the response security headers.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
}
