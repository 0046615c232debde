// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub assets: AssetsConfig,
    pub rewrite: RewriteConfig,
    pub sync: SyncConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: debug, info, warn or error
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// Static asset store and fallback routing
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory the asset store serves from
    pub root: PathBuf,
    /// File probed for extensionless (directory-like) paths
    pub index_file: String,
    /// Page served when nothing else matched
    pub not_found_page: String,
    /// Alternate namespace probed first for pages (e.g. "/client")
    pub client_prefix: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dist"),
            index_file: "index.html".to_string(),
            not_found_page: "/404.html".to_string(),
            client_prefix: None,
        }
    }
}

/// Content path rewriting
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RewriteConfig {
    pub enabled: bool,
    /// Prefix prepended to content paths
    pub namespace: String,
    /// Prefixes reserved for non-content assets
    pub static_prefixes: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            namespace: "/webflow".to_string(),
            static_prefixes: [
                "/webflow", "/_astro", "/assets", "/fonts", "/videos", "/uploads", "/favicon",
                "/robots", "/sitemap",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

/// Webflow content sync
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SyncConfig {
    pub api_base: String,
    pub api_version: String,
    pub page_size: usize,
    /// Per-request timeout for the CMS API, in seconds
    pub timeout_secs: u64,
    /// Base directory for dot-env files and manifest-relative paths
    pub project_root: PathBuf,
    /// Documents directory, relative to `project_root`
    pub docs_dir: PathBuf,
    /// Manifest file name inside `docs_dir`
    pub manifest_file: String,
    /// Dot-env files under `project_root`, earlier files take precedence
    pub env_files: Vec<String>,
    pub token_var: String,
    pub collection_var: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.webflow.com/v2".to_string(),
            api_version: "2.0.0".to_string(),
            page_size: 100,
            timeout_secs: 60,
            project_root: PathBuf::from("."),
            docs_dir: PathBuf::from("src/content/docs"),
            manifest_file: ".webflow-sync-manifest.json".to_string(),
            env_files: vec![".env".to_string(), ".env.local".to_string()],
            token_var: "WEBFLOW_API_TOKEN".to_string(),
            collection_var: "WEBFLOW_ARTICLES_COLLECTION_ID".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn docs_path(&self) -> PathBuf {
        self.project_root.join(&self.docs_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.docs_path().join(&self.manifest_file)
    }
}
