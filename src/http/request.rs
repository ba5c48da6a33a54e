//! Request tracing.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) per inbound request
//! - Open the span every log line of the exchange is recorded under
//!
//! # Design Decisions
//! - The ID lives only in the span; it is never injected into the headers
//!   sent upstream
//! - Only the path is recorded, the query may carry API keys

use axum::body::Body;
use axum::http::Request;
use tracing::Span;
use uuid::Uuid;

/// Span factory for `tower_http::trace::TraceLayer`.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = Uuid::new_v4();
    tracing::info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}
