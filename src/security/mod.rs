//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request:
//!     → headers.rs (drop denied headers: host, referer, cf-*, forwarding, cdn)
//!
//! Relayed response:
//!     → headers.rs (stamp nosniff, frame deny, no-referrer)
//! ```

pub mod headers;

pub use headers::{apply_security_headers, HeaderFilter};
