//! Configuration for the peoplegraph HTTP server.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (`PEOPLEGRAPH__SERVER__PORT`, `PEOPLEGRAPH__NEO4J__URI`, ...)
//! 2. Config file (`peoplegraph.toml` by default)
//! 3. Defaults

use serde::Deserialize;

use peoplegraph_graph::GraphConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Neo4j connection settings (`[neo4j]` section).
    #[serde(default)]
    pub neo4j: GraphConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body, JSON or CSV, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// `Access-Control-Max-Age` sent on CORS preflight responses.
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age_secs: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}

fn default_cors_max_age() -> usize {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            cors_max_age_secs: default_cors_max_age(),
        }
    }
}

/// Load configuration from `<file_prefix>.toml` (optional) and the
/// `PEOPLEGRAPH__` environment.
pub fn load(file_prefix: &str) -> anyhow::Result<AppConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("PEOPLEGRAPH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors_max_age_secs, 3600);
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.neo4j.query_timeout_secs, 10);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 9090

            [neo4j]
            uri = "bolt://graph:7687"
            password = "s3cret"
            "#,
        );
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.neo4j.uri, "bolt://graph:7687");
        assert_eq!(config.neo4j.password, "s3cret");
        assert_eq!(config.neo4j.max_connections, 16);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let config = load("does-not-exist-peoplegraph").unwrap();
        assert!(!config.neo4j.uri.is_empty());
    }
}
