//! Forced-download serving module
//!
//! The report extensions are served with an attachment disposition so
//! browsers save the response as a file instead of rendering it inline.

use crate::handler::router::RequestContext;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// A forced-download rule: requests whose path ends with `suffix` are
/// answered with `content_type` and an attachment disposition.
pub struct DownloadRule {
    pub suffix: &'static str,
    pub content_type: &'static str,
}

/// Ordered rule table. Covering another extension means adding a row.
pub const RULES: &[DownloadRule] = &[
    DownloadRule {
        suffix: ".csv",
        content_type: "text/csv",
    },
    DownloadRule {
        suffix: ".md",
        content_type: "text/markdown",
    },
];

/// Find the download rule matching a request path, if any
pub fn matching_rule(path: &str) -> Option<&'static DownloadRule> {
    RULES.iter().find(|rule| path.ends_with(rule.suffix))
}

/// Serve a file as a forced download
///
/// The request path is interpreted relative to the serving directory
/// with the leading `/` stripped; paths with `..` segments are
/// rejected the same way the static fallback rejects them. A missing
/// file yields 404 with a plain "File not found" body; any other read
/// error fails only this request.
pub async fn serve_download(
    ctx: &RequestContext<'_>,
    rule: &DownloadRule,
    root: &Path,
) -> Response<Full<Bytes>> {
    let Some(relative) = static_files::sanitize_request_path(ctx.path) else {
        return http::build_404_response("File not found");
    };
    let file_path = root.join(relative);

    match fs::read(&file_path).await {
        Ok(content) => http::response::build_attachment_response(
            content,
            rule.content_type,
            ctx.is_head,
        ),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            http::build_404_response("File not found")
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read '{}': {e}",
                file_path.display()
            ));
            http::build_500_response()
        }
    }
}
