// Application state module
// Per-process state shared by every connection

use crate::assets::{AssetRouter, DirAssetStore};
use crate::config::Config;
use crate::rewrite::PathRewrite;

pub struct AppState {
    pub config: Config,
    pub router: AssetRouter<DirAssetStore>,
    /// Present when content rewriting is enabled
    pub rewrite: Option<PathRewrite>,
    /// Whether requests are written to the access log
    pub access_log: bool,
}

impl AppState {
    /// Fails when the asset root cannot be opened
    pub fn new(config: &Config) -> std::io::Result<Self> {
        let store = DirAssetStore::new(&config.assets.root)?;
        Ok(Self {
            config: config.clone(),
            router: AssetRouter::from_config(store, &config.assets),
            rewrite: config
                .rewrite
                .enabled
                .then(|| PathRewrite::from_config(&config.rewrite)),
            access_log: config.logging.access_log,
        })
    }
}
