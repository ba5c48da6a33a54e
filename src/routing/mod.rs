//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, raw query)
//!     → router.rs (exact path lookup, then first-segment lookup)
//!     → Return: absolute upstream URL or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[] + ExactRouteConfig[]
//!     → HashMaps keyed by prefix / full path
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (single segment lookup)
//! - Deterministic: same input always resolves to the same URL

pub mod router;

pub use router::Router;
