//! Asset fallback router
//!
//! Lookup order for a request path `P`:
//! 1. (client prefix only) the client page for `P`
//! 2. `P` itself
//! 3. `P/index.html` when `P` has no file extension
//! 4. the not-found page
//!
//! The first answer that is not a 404 is returned untouched.

use super::{has_extension, AssetError, AssetRequest, AssetResponse, AssetStore};
use crate::config::AssetsConfig;
use crate::logger;
use hyper::StatusCode;

/// Which lookup produced the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    ClientIndex,
    Direct,
    Index,
    NotFoundPage,
}

#[derive(Debug)]
pub struct RoutedAsset {
    pub response: AssetResponse,
    /// Asset path that answered
    pub served_path: String,
    pub fallback: Fallback,
}

pub struct AssetRouter<S> {
    store: S,
    index_file: String,
    not_found_page: String,
    client_prefix: Option<String>,
}

impl<S: AssetStore> AssetRouter<S> {
    pub fn new(store: S) -> Self {
        Self::from_config(store, &AssetsConfig::default())
    }

    pub fn from_config(store: S, config: &AssetsConfig) -> Self {
        Self {
            store,
            index_file: config.index_file.trim_matches('/').to_string(),
            not_found_page: leading_slash(&config.not_found_page),
            client_prefix: config
                .client_prefix
                .as_deref()
                .map(|p| leading_slash(p.trim_end_matches('/')))
                .filter(|p| p != "/"),
        }
    }

    #[must_use]
    pub fn with_client_prefix(mut self, prefix: &str) -> Self {
        self.client_prefix = Some(leading_slash(prefix.trim_end_matches('/')));
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub async fn route(&self, request: &AssetRequest) -> Result<RoutedAsset, AssetError> {
        let path = request.path.as_str();

        if let Some(client_page) = self.client_page(path) {
            if let Some(found) = self.probe(request, client_page, Fallback::ClientIndex).await? {
                return Ok(found);
            }
        }

        if let Some(found) = self.probe(request, path.to_string(), Fallback::Direct).await? {
            return Ok(found);
        }

        if !has_extension(path) {
            let index = format!("{}/{}", path.trim_end_matches('/'), self.index_file);
            if let Some(found) = self.probe(request, index, Fallback::Index).await? {
                return Ok(found);
            }
        }

        let page = self.not_found_path();
        logger::log_debug(&format!("[Assets] {path} -> {page}"));
        let response = self.store.fetch(&request.with_path(&page)).await?;
        Ok(RoutedAsset {
            response,
            served_path: page,
            fallback: Fallback::NotFoundPage,
        })
    }

    async fn probe(
        &self,
        request: &AssetRequest,
        path: String,
        fallback: Fallback,
    ) -> Result<Option<RoutedAsset>, AssetError> {
        let response = self.store.fetch(&request.with_path(&path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(RoutedAsset {
            response,
            served_path: path,
            fallback,
        }))
    }

    /// Page path probed in the client namespace, if this path qualifies
    fn client_page(&self, path: &str) -> Option<String> {
        let prefix = self.client_prefix.as_deref()?;
        if path.is_empty() || path == "/" {
            return Some(format!("{prefix}/{}", self.index_file));
        }
        if !path.starts_with(&format!("{prefix}/")) && !path.contains('.') {
            return Some(format!(
                "{prefix}{}/{}",
                path.trim_end_matches('/'),
                self.index_file
            ));
        }
        None
    }

    fn not_found_path(&self) -> String {
        match &self.client_prefix {
            Some(prefix) => format!("{prefix}{}", self.not_found_page),
            None => self.not_found_page.clone(),
        }
    }
}

fn leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
