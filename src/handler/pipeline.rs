//! Request pipeline
//!
//! Entry point for HTTP request processing: method validation, the optional
//! content rewrite, then asset routing and access logging.

use super::AppState;
use crate::assets::AssetRequest;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of the asset stage
struct Served {
    response: Response<Full<Bytes>>,
    /// Path the router saw (after any rewrite)
    request_path: String,
    served_path: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = state.access_log.then(|| access_entry(&req, peer_addr));

    if let Some(resp) = check_http_method(req.method()) {
        if let Some(entry) = entry.as_mut() {
            finish_entry(entry, &resp, started);
            logger::log_access(entry, &state.config.logging.access_log_format);
        }
        return Ok(resp);
    }

    let original_path = req.uri().path().to_string();
    let served = match &state.rewrite {
        Some(rewrite) => rewrite.handle(req, |req| serve_assets(req, &state)).await,
        None => serve_assets(req, &state).await,
    };

    if let Some(entry) = entry.as_mut() {
        if served.request_path != original_path {
            entry.rewritten_path = Some(served.request_path.clone());
        }
        entry.served_path.clone_from(&served.served_path);
        finish_entry(entry, &served.response, started);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(served.response)
}

async fn serve_assets<B>(req: Request<B>, state: &AppState) -> Served {
    let request = AssetRequest {
        path: req.uri().path().to_string(),
        is_head: req.method() == Method::HEAD,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    match state.router.route(&request).await {
        Ok(routed) => Served {
            response: routed.response,
            request_path: request.path,
            served_path: Some(routed.served_path),
        },
        Err(e) => {
            logger::log_error(&format!("Asset store failure for {}: {e}", request.path));
            Served {
                response: http::build_502_response(),
                request_path: request.path,
                served_path: None,
            }
        }
    }
}

/// Non-GET/HEAD methods are answered here
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

fn finish_entry(entry: &mut AccessLogEntry, resp: &Response<Full<Bytes>>, started: Instant) {
    entry.status = resp.status().as_u16();
    entry.body_bytes = resp
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
}
