//! Edge serving and content sync for a static documentation site.
//!
//! - `assets`: asset routing with index and 404 fallbacks
//! - `rewrite`: namespace rewriting for content paths
//! - `sync`: Webflow CMS to Markdown sync
//! - `server`, `handler`, `http`: the HTTP/1 edge server around them

pub mod assets;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod rewrite;
pub mod server;
pub mod sync;
