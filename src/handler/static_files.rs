//! Static file serving module
//!
//! Serves the booking UI assets from the configured static root, with MIME
//! detection and a path traversal guard.

use crate::config::StaticConfig;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a static asset, or 404
pub async fn serve(path: &str, is_head: bool, config: &StaticConfig) -> Response<Full<Bytes>> {
    match load(path, config).await {
        Some((content, content_type)) => {
            http::build_static_response(content, content_type, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Resolve a request path inside the static root and read the file.
///
/// "/" and directory paths fall back to the configured index file. The
/// canonicalized result must stay inside the root; anything else is a
/// traversal attempt and resolves to nothing.
async fn load(path: &str, config: &StaticConfig) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and any parent-directory components
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let root = Path::new(&config.root);
    let mut file_path = root.join(&clean_path);

    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static root not found or inaccessible '{}': {e}",
                config.root
            ));
            return None;
        }
    };

    if clean_path.is_empty() || clean_path.ends_with('/') || file_path.is_dir() {
        file_path = file_path.join(&config.index_file);
    }

    // File not found is an ordinary 404, not worth a warning
    let Ok(file_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(
        file_canonical.extension().and_then(|e| e.to_str()),
    );

    Some((content, content_type))
}
