//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use api_relay::config::{
    ExactRouteConfig, ExactRoutes, RelayConfig, RouteConfig, RouteTable, UpstreamConfig,
};
use api_relay::{RelayServer, Shutdown};
use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Lets a test hold the mock upstream's streamed body between chunks.
///
/// `dropped` is notified once the upstream server has dropped the streamed body.
#[derive(Clone, Default)]
pub struct StreamGate {
    pub release: Arc<Notify>,
    pub dropped: Arc<Notify>,
}

struct DropSignal(Arc<Notify>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        self.0.notify_one();
    }
}

/// Start a mock upstream on an ephemeral port.
///
/// - `/api/echo` answers with a JSON description of the request it received
/// - `/api/headers` sets headers the relay must pass through or overwrite
/// - `/api/status/{code}` answers with the given status
/// - `/api/stream` sends one chunk, waits on the gate, then sends another
/// - `/api/broken` sends one chunk, waits on the gate, then fails the body
pub async fn start_mock_upstream(gate: StreamGate) -> SocketAddr {
    let app = Router::new()
        .route("/api/echo", any(echo))
        .route("/api/headers", any(upstream_headers))
        .route("/api/status/{code}", any(status))
        .route("/api/stream", any(stream))
        .route("/api/broken", any(broken))
        .with_state(gate);

    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        seen.entry(name.to_string())
            .or_default()
            .push(value.to_str().unwrap_or_default().to_string());
    }

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": seen,
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn upstream_headers() -> Response {
    (
        StatusCode::CREATED,
        [
            (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
            (header::REFERRER_POLICY, "unsafe-url"),
            (header::CONTENT_TYPE, "application/json"),
        ],
        AppendHeaders([
            (header::SET_COOKIE, "session=a"),
            (header::SET_COOKIE, "theme=dark"),
        ]),
        r#"{"ok":true}"#,
    )
        .into_response()
}

async fn status(Path(code): Path<u16>) -> Response {
    let code = StatusCode::from_u16(code).unwrap();
    (code, format!("upstream said {}", code.as_u16())).into_response()
}

async fn stream(State(gate): State<StreamGate>) -> Response {
    let body = gated_body(gate);
    Response::new(Body::from_stream(body))
}

fn gated_body(
    gate: StreamGate,
) -> impl futures_util::Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
    let signal = DropSignal(gate.dropped.clone());
    futures_util::stream::unfold((0u8, signal), move |(step, signal)| {
        let gate = gate.clone();
        async move {
            match step {
                0 => Some((Ok(Bytes::from_static(b"data: first\n\n")), (1, signal))),
                1 => {
                    gate.release.notified().await;
                    Some((Ok(Bytes::from_static(b"data: second\n\n")), (2, signal)))
                }
                _ => None,
            }
        }
    })
}

async fn broken(State(gate): State<StreamGate>) -> Response {
    let body = futures_util::stream::unfold(0u8, move |step| {
        let gate = gate.clone();
        async move {
            match step {
                0 => Some((Ok(Bytes::from_static(b"data: first\n\n")), 1)),
                1 => {
                    gate.release.notified().await;
                    Some((
                        Err(io::Error::new(io::ErrorKind::ConnectionReset, "upstream crashed")),
                        2,
                    ))
                }
                _ => None,
            }
        }
    });
    Response::new(Body::from_stream(body))
}

/// Relay configuration pointing `/mock` and `/ping` at the mock upstream and
/// `/down` at a port nothing listens on.
pub fn relay_config(upstream: SocketAddr) -> RelayConfig {
    RelayConfig {
        routes: RouteTable(vec![
            RouteConfig::new("/mock", format!("http://{upstream}/api")),
            RouteConfig::new("/down", "http://127.0.0.1:1"),
        ]),
        exact_routes: ExactRoutes(vec![ExactRouteConfig::new(
            "/ping",
            format!("http://{upstream}/api/echo"),
        )]),
        upstream: UpstreamConfig {
            use_system_proxy: false,
        },
        ..RelayConfig::default()
    }
}

/// Start the relay on an ephemeral port.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = RelayServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

/// Collects formatted log output from the current thread.
///
/// `#[tokio::test]` runs the relay and the mock upstream on the test thread,
/// so a thread-local subscriber sees their events.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn count(&self, message: &str) -> usize {
        let logs = self.0.lock().unwrap();
        String::from_utf8_lossy(&logs).matches(message).count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
