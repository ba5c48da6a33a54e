//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults, optionally overlaid by a TOML file
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (port, bind host, log level)
//!     → RelayConfig (validated, immutable)
//!     → compiled into the route table and header filter at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so the relay runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ExactRouteConfig, ExactRoutes, HeaderFilterConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RelayConfig, RouteConfig, RouteTable, UpstreamConfig, DEFAULT_PORT,
};
pub use validation::{validate_config, ValidationError};
