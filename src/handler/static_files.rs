//! Static file fallback module
//!
//! Generic static serving for every path the download rules do not
//! claim: MIME-typed file responses, index file preference, and HTML
//! directory listings.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Index files tried before falling back to a directory listing
const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Serve a request path from the serving directory
pub async fn serve_fallback(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    let Some(mut target) = resolve_request_path(root, ctx.path) else {
        return http::build_404_response("404 Not Found");
    };

    if target.is_dir() {
        for index_file in INDEX_FILES {
            let candidate = target.join(index_file);
            if candidate.is_file() {
                target = candidate;
                break;
            }
        }
    }

    if target.is_dir() {
        return serve_directory_listing(ctx, &target).await;
    }

    serve_file(ctx, &target).await
}

/// Strip the leading `/` and reject any path with a `..` segment.
///
/// Rejection is per segment, so names that merely contain consecutive
/// dots (`notes..txt`) pass through untouched. Shared by the download
/// handler and the static fallback.
pub fn sanitize_request_path(request_path: &str) -> Option<&str> {
    let relative = request_path.trim_start_matches('/');
    let has_parent_dir = Path::new(relative)
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir));
    if has_parent_dir {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path}"
        ));
        return None;
    }
    Some(relative)
}

/// Map a request path onto the serving directory.
///
/// Sanitizes the path and verifies the canonicalized result still
/// lives under the serving directory. Returns None for absent paths
/// and traversal attempts alike.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let candidate = root.join(sanitize_request_path(request_path)?);

    let root_canonical = root.canonicalize().ok()?;
    let candidate_canonical = candidate.canonicalize().ok()?;
    if !candidate_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path escape blocked: {} -> {}",
            request_path,
            candidate_canonical.display()
        ));
        return None;
    }

    Some(candidate_canonical)
}

/// Serve a single file with inferred Content-Type
async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return http::build_404_response("404 Not Found");
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_500_response();
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(content, content_type, &etag, ctx.is_head)
}

/// Serve a generated HTML listing of a directory
async fn serve_directory_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    match list_directory(dir).await {
        Ok(entries) => {
            let page = render_directory_listing(ctx.path, &entries);
            http::response::build_html_response(page, ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_500_response()
        }
    }
}

/// Collect directory entry names, sorted, with `/` appended to
/// subdirectories
async fn list_directory(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }

    // Sorted so repeated requests render identically
    entries.sort();
    Ok(entries)
}

/// Render a minimal HTML directory index
pub fn render_directory_listing(display_path: &str, entries: &[String]) -> String {
    let mut page = format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Directory listing for {display_path}</title></head>\n<body>\n<h1>Directory listing for {display_path}</h1>\n<ul>\n"
    );
    for entry in entries {
        page.push_str(&format!("<li><a href=\"{entry}\">{entry}</a></li>\n"));
    }
    page.push_str("</ul>\n</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn test_ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("test-plan-static-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn resolves_existing_file() {
        let root = temp_root("resolve");
        std::fs::write(root.join("page.html"), b"<html></html>").unwrap();
        let resolved = resolve_request_path(&root, "/page.html").unwrap();
        assert!(resolved.ends_with("page.html"));
    }

    #[test]
    fn rejects_traversal_out_of_root() {
        let root = temp_root("traversal").join("inner");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.parent().unwrap().join("outside.txt"), b"secret").unwrap();

        assert!(resolve_request_path(&root, "/../outside.txt").is_none());
    }

    #[test]
    fn sanitize_rejects_parent_segments_only() {
        assert!(sanitize_request_path("/../outside.txt").is_none());
        assert!(sanitize_request_path("/sub/../../outside.txt").is_none());
        assert_eq!(sanitize_request_path("/notes..txt"), Some("notes..txt"));
        assert_eq!(sanitize_request_path("/a.b/c..d.txt"), Some("a.b/c..d.txt"));
    }

    #[test]
    fn consecutive_dots_in_names_are_not_rewritten() {
        let root = temp_root("dotted-names");
        std::fs::write(root.join("notes..txt"), b"dotted").unwrap();
        std::fs::write(root.join("notes.txt"), b"plain").unwrap();

        let resolved = resolve_request_path(&root, "/notes..txt").unwrap();
        assert!(resolved.ends_with("notes..txt"));
    }

    #[test]
    fn absent_path_resolves_to_none() {
        let root = temp_root("absent");
        assert!(resolve_request_path(&root, "/no-such-file.txt").is_none());
    }

    #[test]
    fn listing_links_every_entry() {
        let entries = vec!["TEST_PLAN.md".to_string(), "sub/".to_string()];
        let page = render_directory_listing("/", &entries);
        assert!(page.contains("<h1>Directory listing for /</h1>"));
        assert!(page.contains("<a href=\"TEST_PLAN.md\">TEST_PLAN.md</a>"));
        assert!(page.contains("<a href=\"sub/\">sub/</a>"));
    }

    #[tokio::test]
    async fn serves_html_file_bytes_exactly() {
        let root = temp_root("html");
        let payload = b"<html><body>download page</body></html>";
        std::fs::write(root.join("download.html"), payload).unwrap();

        let response = serve_fallback(&test_ctx("/download.html"), &root).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/html");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], payload);
    }

    #[tokio::test]
    async fn dotted_name_serves_its_own_bytes() {
        let root = temp_root("dotted-serve");
        std::fs::write(root.join("notes..txt"), b"dotted").unwrap();
        std::fs::write(root.join("notes.txt"), b"plain").unwrap();

        let response = serve_fallback(&test_ctx("/notes..txt"), &root).await;
        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"dotted");
    }

    #[tokio::test]
    async fn missing_path_is_404() {
        let root = temp_root("fallback-404");
        let response = serve_fallback(&test_ctx("/nothing-here.png"), &root).await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn directory_prefers_index_file() {
        let root = temp_root("index");
        std::fs::write(root.join("index.html"), b"<html>home</html>").unwrap();

        let response = serve_fallback(&test_ctx("/"), &root).await;
        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<html>home</html>");
    }

    #[tokio::test]
    async fn directory_without_index_gets_listing() {
        let root = temp_root("listing");
        std::fs::write(root.join("a.txt"), b"a").unwrap();
        std::fs::write(root.join("b.txt"), b"b").unwrap();

        let response = serve_fallback(&test_ctx("/"), &root).await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/html");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("a.txt"));
        assert!(page.contains("b.txt"));
    }

    #[tokio::test]
    async fn conditional_request_gets_304() {
        let root = temp_root("etag");
        std::fs::write(root.join("style.css"), b"body{}").unwrap();

        let first = serve_fallback(&test_ctx("/style.css"), &root).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let ctx = RequestContext {
            path: "/style.css",
            is_head: false,
            if_none_match: Some(etag),
        };
        let second = serve_fallback(&ctx, &root).await;
        assert_eq!(second.status(), 304);
    }
}
