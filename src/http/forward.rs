//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the resolved upstream URL
//! - Stream the request body upstream without buffering it
//! - Relay status, headers and body back to the client
//! - Map construction and transport failures to 500
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (connection pool) for every exchange
//! - No retries and no timeout beyond the client defaults
//! - The upstream body is owned by `RelayBody` and released when it drops,
//!   on every exit path

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::Stream;
use thiserror::Error;

use crate::http::response;
use crate::security::{apply_security_headers, HeaderFilter};

/// Failure before any part of the upstream response reached the client.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to build upstream request: {0}")]
    Build(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        response::internal_error()
    }
}

/// Issues proxied requests through a shared client.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    filter: Arc<HeaderFilter>,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, filter: HeaderFilter) -> Self {
        Self {
            client,
            filter: Arc::new(filter),
        }
    }

    /// Forward `request` to `target` and relay the upstream response.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target: &str,
    ) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();

        let mut builder = self.client.request(parts.method.clone(), target);
        if body.size_hint().exact() != Some(0) {
            builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }
        let mut outbound = builder.build().map_err(ForwardError::Build)?;
        *outbound.headers_mut() = self.filter.filter(&parts.headers);

        let upstream = self
            .client
            .execute(outbound)
            .await
            .map_err(ForwardError::Upstream)?;

        Ok(relay_response(&parts.method, upstream, target))
    }
}

fn relay_response(method: &Method, upstream: reqwest::Response, target: &str) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    apply_security_headers(&mut headers);

    let expected_len = if *method == Method::HEAD
        || matches!(status, StatusCode::NO_CONTENT | StatusCode::NOT_MODIFIED)
    {
        Some(0)
    } else {
        upstream.content_length()
    };

    let body = RelayBody::new(upstream.bytes_stream(), target, expected_len);

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// `url` with any query string removed, for logging. Queries may carry API keys.
pub fn without_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

type UpstreamStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Upstream body passed through to the client chunk by chunk.
///
/// With a known length the body counts as finished once that many bytes went
/// out, since hyper stops polling a `Content-Length` body at that point.
struct RelayBody {
    inner: UpstreamStream,
    upstream: String,
    expected_len: Option<u64>,
    relayed: u64,
    finished: bool,
}

impl RelayBody {
    fn new<S>(stream: S, upstream: &str, expected_len: Option<u64>) -> Self
    where
        S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            upstream: without_query(upstream).to_string(),
            expected_len,
            relayed: 0,
            finished: expected_len == Some(0),
        }
    }

    fn complete(&mut self) {
        if !self.finished {
            self.finished = true;
            tracing::trace!(
                upstream = %self.upstream,
                relayed_bytes = self.relayed,
                "Upstream body relayed"
            );
        }
    }
}

impl Stream for RelayBody {
    type Item = Result<Bytes, reqwest::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.relayed += chunk.len() as u64;
                if this.expected_len.is_some_and(|len| this.relayed >= len) {
                    this.complete();
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                tracing::error!(
                    upstream = %this.upstream,
                    relayed_bytes = this.relayed,
                    error = %e,
                    "Upstream body failed mid-stream"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.complete();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayBody {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                upstream = %self.upstream,
                relayed_bytes = self.relayed,
                "Client went away before the upstream body was fully relayed"
            );
        }
    }
}
