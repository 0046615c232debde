//! Content path rewriting middleware
//!
//! Every request that is not a static asset is served from under a content
//! namespace. The rewrite happens in place on the request URI before the next
//! stage runs; clients never see it.

use crate::config::RewriteConfig;
use crate::logger;
use hyper::{Request, Uri};
use regex::Regex;
use std::future::Future;
use std::sync::OnceLock;

fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.[a-zA-Z0-9]+$").expect("valid extension pattern"))
}

#[derive(Debug, Clone)]
pub struct PathRewrite {
    namespace: String,
    static_prefixes: Vec<String>,
}

impl PathRewrite {
    pub fn new(namespace: impl Into<String>, static_prefixes: Vec<String>) -> Self {
        Self {
            namespace: namespace.into().trim_end_matches('/').to_string(),
            static_prefixes,
        }
    }

    pub fn from_config(config: &RewriteConfig) -> Self {
        Self::new(config.namespace.clone(), config.static_prefixes.clone())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Static prefixes match exactly or as a whole leading segment; anything
    /// ending in a file extension is also static.
    pub fn is_static_path(&self, path: &str) -> bool {
        let under_prefix = self.static_prefixes.iter().any(|prefix| {
            path == prefix
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        });
        under_prefix || extension_pattern().is_match(path)
    }

    /// Rewritten URI for a content path, `None` when the path passes through
    pub fn rewrite(&self, uri: &Uri) -> Option<Uri> {
        let path = uri.path();
        if self.is_static_path(path) || path.starts_with(&self.namespace) {
            return None;
        }

        let target = match uri.query() {
            Some(query) => format!("{}{path}?{query}", self.namespace),
            None => format!("{}{path}", self.namespace),
        };

        let mut parts = uri.clone().into_parts();
        parts.path_and_query = match target.parse() {
            Ok(pq) => Some(pq),
            Err(e) => {
                logger::log_warning(&format!("Cannot rewrite '{path}': {e}"));
                return None;
            }
        };
        Uri::from_parts(parts).ok()
    }

    /// Rewrite the request URI in place, then hand the request to `next`
    pub async fn handle<B, F, Fut, R>(&self, mut req: Request<B>, next: F) -> R
    where
        F: FnOnce(Request<B>) -> Fut,
        Fut: Future<Output = R>,
    {
        if let Some(uri) = self.rewrite(req.uri()) {
            logger::log_rewrite(req.uri().path(), uri.path());
            *req.uri_mut() = uri;
        }
        next(req).await
    }
}

impl Default for PathRewrite {
    fn default() -> Self {
        Self::from_config(&RewriteConfig::default())
    }
}
