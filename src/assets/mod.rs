//! Static asset module
//!
//! An [`AssetStore`] answers a single path lookup; the [`AssetRouter`] layers
//! the `index.html` / `404.html` fallback sequence on top of any store.

mod router;
mod store;

pub use router::{AssetRouter, Fallback, RoutedAsset};
pub use store::DirAssetStore;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::future::Future;
use thiserror::Error;

pub type AssetResponse = Response<Full<Bytes>>;

/// A single lookup against an asset store.
///
/// Conditional request data travels with every probe so the answering
/// asset can still produce a 304.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRequest {
    pub path: String,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

impl AssetRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Same request, different asset path
    #[must_use]
    pub fn with_path(&self, path: &str) -> Self {
        Self {
            path: path.to_string(),
            is_head: self.is_head,
            if_none_match: self.if_none_match.clone(),
        }
    }
}

/// Transport failure from an asset store
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    pub fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// Source of static assets.
///
/// A missing asset is an `Ok` response with status 404; `Err` is reserved for
/// failures of the store itself.
pub trait AssetStore {
    fn fetch(
        &self,
        request: &AssetRequest,
    ) -> impl Future<Output = Result<AssetResponse, AssetError>>;
}

/// True when the last path segment carries a dot
pub fn has_extension(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
}
