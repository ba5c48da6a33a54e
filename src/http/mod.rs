//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, HTTP/1.1 and HTTP/2)
//!     → request.rs (request ID span)
//!     → static pages (response.rs) or relay fallback
//!     → [routing layer resolves the upstream URL]
//!     → forward.rs (filter headers, call upstream, stream response back)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardError, Forwarder};
pub use server::{AppState, RelayServer};
