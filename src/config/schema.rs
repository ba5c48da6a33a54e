//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Port the relay listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 2233;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind host, port).
    pub listener: ListenerConfig,

    /// Path-prefix routes mapping the first path segment to an upstream base URL.
    pub routes: RouteTable,

    /// Full-path routes, checked before the prefix table.
    pub exact_routes: ExactRoutes,

    /// Outbound header filtering.
    pub headers: HeaderFilterConfig,

    /// Upstream client settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host or IP to bind (e.g., "0.0.0.0").
    pub bind_host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// The `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        if self.bind_host.contains(':') && !self.bind_host.starts_with('[') {
            format!("[{}]:{}", self.bind_host, self.port)
        } else {
            format!("{}:{}", self.bind_host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// A single prefix mapping, e.g. `/openai` -> `https://api.openai.com`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Leading path segment including the slash, without a trailing slash.
    pub prefix: String,

    /// Absolute upstream base URL without a trailing slash.
    pub upstream: String,
}

impl RouteConfig {
    pub fn new(prefix: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            upstream: upstream.into(),
        }
    }
}

/// Ordered list of prefix routes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RouteTable(pub Vec<RouteConfig>);

impl Default for RouteTable {
    fn default() -> Self {
        Self(
            DEFAULT_ROUTES
                .iter()
                .map(|(prefix, upstream)| RouteConfig::new(*prefix, *upstream))
                .collect(),
        )
    }
}

const DEFAULT_ROUTES: &[(&str, &str)] = &[
    ("/discord", "https://discord.com/api"),
    ("/telegram", "https://api.telegram.org"),
    ("/openai", "https://api.openai.com"),
    ("/claude", "https://api.anthropic.com"),
    ("/gemini", "https://generativelanguage.googleapis.com"),
    ("/meta", "https://www.meta.ai/api"),
    ("/groq", "https://api.groq.com/openai"),
    ("/xai", "https://api.x.ai"),
    ("/cohere", "https://api.cohere.ai"),
    ("/huggingface", "https://api-inference.huggingface.co"),
    ("/together", "https://api.together.xyz"),
    ("/novita", "https://api.novita.ai"),
    ("/portkey", "https://api.portkey.ai"),
    ("/fireworks", "https://api.fireworks.ai"),
    ("/openrouter", "https://openrouter.ai/api"),
    ("/cerebras", "https://api.cerebras.ai"),
];

/// A full-path route, e.g. `/get` -> `https://httpbin.org/get`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExactRouteConfig {
    /// Request path that must match exactly.
    pub path: String,

    /// Absolute URL the request is forwarded to (query appended).
    pub target: String,
}

impl ExactRouteConfig {
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
        }
    }
}

/// Ordered list of exact routes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ExactRoutes(pub Vec<ExactRouteConfig>);

impl Default for ExactRoutes {
    fn default() -> Self {
        Self(vec![ExactRouteConfig::new("/get", "https://httpbin.org/get")])
    }
}

/// Outbound header filtering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderFilterConfig {
    /// A header is dropped when its lowercased name contains any of these.
    pub denied_substrings: Vec<String>,
}

impl Default for HeaderFilterConfig {
    fn default() -> Self {
        Self {
            denied_substrings: ["host", "referer", "cf-", "forward", "cdn"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Upstream client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` for outbound calls.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            use_system_proxy: true,
        }
    }
}

/// Log output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line layout.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_route_table() {
        let routes = RouteTable::default();
        assert_eq!(routes.0.len(), 16);
        assert!(routes
            .0
            .contains(&RouteConfig::new("/discord", "https://discord.com/api")));
        assert!(routes
            .0
            .contains(&RouteConfig::new("/openai", "https://api.openai.com")));
    }

    #[test]
    fn test_bind_address() {
        let mut listener = ListenerConfig::default();
        assert_eq!(listener.bind_address(), "0.0.0.0:2233");

        listener.bind_host = "::1".to_string();
        listener.port = 8080;
        assert_eq!(listener.bind_address(), "[::1]:8080");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [listener]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.listener.bind_host, "0.0.0.0");
        assert_eq!(config.routes, RouteTable::default());
        assert_eq!(config.headers.denied_substrings.len(), 5);
        assert_eq!(config.observability.log_format, LogFormat::Full);
    }

    #[test]
    fn test_routes_replace_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [[routes]]
            prefix = "/local"
            upstream = "http://127.0.0.1:3000"

            [observability]
            log_format = "compact"
            "#,
        )
        .unwrap();

        assert_eq!(config.routes.0, vec![RouteConfig::new("/local", "http://127.0.0.1:3000")]);
        assert_eq!(config.observability.log_format, LogFormat::Compact);
    }
}
