//! API relay.
//!
//! Maps the first path segment of an inbound request to an upstream API host
//! and streams the exchange through.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌─────────┐    ┌──────────────┐    ┌────────────┐
//!     ───────────────────▶│  http   │───▶│   routing    │───▶│  security  │
//!                         │ server  │    │ /openai/...  │    │  header    │
//!                         └────┬────┘    └──────────────┘    │  filter    │
//!                              │ /, /robots.txt              └─────┬──────┘
//!                              ▼                                   ▼
//!                         static pages                      ┌────────────┐
//!                                                           │  forward   │────▶ Upstream
//!     Client Response                                       │  (reqwest) │      API host
//!     ◀─────────────────────────────────────────────────────│  streaming │◀────
//!                                                           └────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
