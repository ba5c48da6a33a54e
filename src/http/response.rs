//! Locally generated responses.
//!
//! # Responsibilities
//! - Liveness page for `/` and `/index.html`
//! - `robots.txt` that keeps crawlers off the relay
//! - Plain-text 404 and 500 bodies
//!
//! These are answered by the relay itself and never carry upstream headers.

use axum::http::{header::CONTENT_TYPE, StatusCode};
use axum::response::{IntoResponse, Response};

pub const INDEX_BODY: &str = "Service is running!";
pub const ROBOTS_BODY: &str = "User-agent: *\nDisallow: /";

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

pub async fn index() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, "text/html")], INDEX_BODY).into_response()
}

pub async fn robots() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, "text/plain")], ROBOTS_BODY).into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, [(CONTENT_TYPE, PLAIN_TEXT)], "Not Found").into_response()
}

pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CONTENT_TYPE, PLAIN_TEXT)],
        "Internal Server Error",
    )
        .into_response()
}
