//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → http/request.rs (per-request span with correlation ID)
//!
//! Consumers:
//!     → stdout
//! ```

pub mod logging;

pub use logging::init_logging;
