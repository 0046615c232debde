//! Directory-backed asset store
//!
//! Serves files below a root directory with `ETag` validation and HEAD support.

use super::{AssetError, AssetRequest, AssetResponse, AssetStore};
use crate::http::{self, cache, mime};
use crate::logger;
use hyper::body::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    /// The root must exist; it is canonicalized once here.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            root: root.as_ref().canonicalize()?,
        })
    }
}

impl AssetStore for DirAssetStore {
    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, AssetError> {
        let relative = request.path.trim_start_matches('/');
        let candidate = self.root.join(relative);

        // Anything that does not resolve is simply absent
        let resolved = match fs::canonicalize(&candidate).await {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(AssetError::io(&request.path, e));
            }
            Err(_) => return Ok(http::build_404_response()),
        };

        if !resolved.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                request.path,
                resolved.display()
            ));
            return Ok(http::build_404_response());
        }

        let metadata = fs::metadata(&resolved)
            .await
            .map_err(|e| AssetError::io(&request.path, e))?;
        if !metadata.is_file() {
            return Ok(http::build_404_response());
        }

        let content = fs::read(&resolved)
            .await
            .map_err(|e| AssetError::io(&request.path, e))?;

        let etag = cache::generate_etag(&content);
        if cache::check_etag_match(request.if_none_match.as_deref(), &etag) {
            return Ok(http::build_304_response(&etag));
        }

        let content_type = mime::get_content_type(candidate.extension().and_then(|e| e.to_str()));
        Ok(http::build_asset_response(
            Bytes::from(content),
            content_type,
            &etag,
            request.is_head,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::fs as stdfs;

    fn site() -> (tempfile::TempDir, DirAssetStore) {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(dir.path().join("site/docs")).unwrap();
        stdfs::write(dir.path().join("site/app.js"), "console.log(1)").unwrap();
        stdfs::write(dir.path().join("site/docs/index.html"), "<h1>docs</h1>").unwrap();
        stdfs::write(dir.path().join("secret.txt"), "nope").unwrap();
        let store = DirAssetStore::new(dir.path().join("site")).unwrap();
        (dir, store)
    }

    async fn body_of(resp: AssetResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let (_dir, store) = site();
        let resp = store.fetch(&AssetRequest::new("/app.js")).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/javascript");
        assert_eq!(body_of(resp).await, "console.log(1)");
    }

    #[tokio::test]
    async fn test_missing_and_directory_are_not_found() {
        let (_dir, store) = site();
        let missing = store.fetch(&AssetRequest::new("/nope.css")).await.unwrap();
        assert_eq!(missing.status(), 404);
        let directory = store.fetch(&AssetRequest::new("/docs")).await.unwrap();
        assert_eq!(directory.status(), 404);
        let root = store.fetch(&AssetRequest::new("/")).await.unwrap();
        assert_eq!(root.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let (_dir, store) = site();
        let resp = store
            .fetch(&AssetRequest::new("/../secret.txt"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_conditional_and_head_requests() {
        let (_dir, store) = site();
        let first = store
            .fetch(&AssetRequest::new("/docs/index.html"))
            .await
            .unwrap();
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let mut conditional = AssetRequest::new("/docs/index.html");
        conditional.if_none_match = Some(etag);
        let cached = store.fetch(&conditional).await.unwrap();
        assert_eq!(cached.status(), 304);

        let mut head = AssetRequest::new("/docs/index.html");
        head.is_head = true;
        let resp = store.fetch(&head).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "13");
        assert_eq!(body_of(resp).await, "");
    }
}
