// Configuration module entry point
// Loads layered configuration and resolves sync credentials

mod dotenv;
mod types;

use std::net::SocketAddr;

pub use dotenv::{Credentials, DotEnv};
pub use types::{
    AssetsConfig, Config, LoggingConfig, PerformanceConfig, RewriteConfig, ServerConfig,
    SyncConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Environment variables override the file, e.g. `DOCS_EDGE__SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DOCS_EDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.assets.index_file, "index.html");
        assert_eq!(cfg.assets.not_found_page, "/404.html");
        assert_eq!(cfg.rewrite.namespace, "/webflow");
        assert!(cfg.rewrite.static_prefixes.contains(&"/_astro".to_string()));
        assert_eq!(cfg.sync.page_size, 100);
        assert_eq!(cfg.sync.api_version, "2.0.0");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        fs::write(
            &path,
            r#"
[server]
port = 9100

[assets]
root = "public"
client_prefix = "/client"

[rewrite]
enabled = true
static_prefixes = ["/static"]

[sync]
docs_dir = "content"
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.assets.client_prefix.as_deref(), Some("/client"));
        assert_eq!(cfg.assets.index_file, "index.html");
        assert!(cfg.rewrite.enabled);
        assert_eq!(cfg.rewrite.static_prefixes, vec!["/static".to_string()]);
        assert_eq!(cfg.sync.docs_path(), std::path::Path::new("./content"));
        assert_eq!(
            cfg.sync.manifest_path(),
            std::path::Path::new("./content/.webflow-sync-manifest.json")
        );
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);

        let mut bad = Config::default();
        bad.server.host = "not a host".to_string();
        assert!(bad.get_socket_addr().is_err());
    }
}
