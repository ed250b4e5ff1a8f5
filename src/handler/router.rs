//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation,
//! download-rule dispatch, static fallback, access logging, and the
//! cross-origin headers every response carries.

use crate::config::ServerState;
use crate::handler::{download, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path.clone());
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version());
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let mut response = match check_http_method(&method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                is_head,
                if_none_match: header_value(&req, "if-none-match"),
            };
            dispatch(&ctx, Path::new(".")).await
        }
    };

    http::apply_cors_headers(&mut response);

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch a request path: download rules first, then static fallback
pub async fn dispatch(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    if let Some(rule) = download::matching_rule(ctx.path) {
        return download::serve_download(ctx, rule, root).await;
    }
    static_files::serve_fallback(ctx, root).await
}

/// Check HTTP method and return the response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::path::PathBuf;

    fn temp_root(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("test-plan-router-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn get_and_head_pass_the_method_gate() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());
    }

    #[test]
    fn options_and_post_are_answered_directly() {
        assert_eq!(check_http_method(&Method::OPTIONS).unwrap().status(), 204);
        assert_eq!(check_http_method(&Method::POST).unwrap().status(), 405);
        assert_eq!(check_http_method(&Method::DELETE).unwrap().status(), 405);
    }

    #[tokio::test]
    async fn csv_path_goes_to_download_branch() {
        let root = temp_root("csv-dispatch");
        std::fs::write(root.join("plan.csv"), b"a,b\n").unwrap();

        let ctx = RequestContext {
            path: "/plan.csv",
            is_head: false,
            if_none_match: None,
        };
        let response = dispatch(&ctx, &root).await;
        assert_eq!(response.headers()["Content-Disposition"], "attachment");
    }

    #[tokio::test]
    async fn html_path_goes_to_static_branch() {
        let root = temp_root("html-dispatch");
        std::fs::write(root.join("page.html"), b"<html></html>").unwrap();

        let ctx = RequestContext {
            path: "/page.html",
            is_head: false,
            if_none_match: None,
        };
        let response = dispatch(&ctx, &root).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/html");
        assert!(response.headers().get("Content-Disposition").is_none());
    }

    #[tokio::test]
    async fn missing_markdown_reports_file_not_found() {
        let root = temp_root("md-404");
        let ctx = RequestContext {
            path: "/missing.md",
            is_head: false,
            if_none_match: None,
        };
        let response = dispatch(&ctx, &root).await;
        assert_eq!(response.status(), 404);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"File not found");
    }
}
