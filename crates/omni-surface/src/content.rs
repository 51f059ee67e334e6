//! Bundled host-UI assets served through the `omni://` custom protocol.
//!
//! The host-UI document and its scripts load from disk without a local
//! HTTP server. Embedded surfaces never use this protocol.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Custom protocol name registered on the host-UI webview.
pub const SCHEME: &str = "omni";

/// Entry document of the host UI.
pub const ENTRY_URL: &str = "omni://localhost/index.html";

/// Resolved asset: MIME type and bytes.
#[derive(Debug, PartialEq, Eq)]
pub struct Asset<'a> {
    pub mime: Cow<'a, str>,
    pub data: Cow<'a, [u8]>,
}

/// Serves files under a base directory.
pub struct ContentProvider {
    base_dir: PathBuf,
}

impl ContentProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve a request path. Paths escaping the base directory, including
    /// through symlinks, resolve to nothing.
    pub fn resolve(&self, path: &str) -> Option<Asset<'_>> {
        let clean = path.split(['?', '#']).next().unwrap_or_default();
        let clean = clean.trim_start_matches('/');
        let clean = if clean.is_empty() { "index.html" } else { clean };

        let file_path = self.base_dir.join(clean);
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) || !canonical_file.is_file() {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        Some(Asset {
            mime: Cow::Borrowed(mime_from_extension(&file_path)),
            data: Cow::Owned(data),
        })
    }

    /// Resolve a full request URI (`omni://localhost/app.js`, or the
    /// `http://omni.localhost/app.js` form WebView2 rewrites it to).
    pub fn resolve_uri(&self, uri: &str) -> Option<Asset<'_>> {
        self.resolve(request_path(uri)?)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Path component of a custom-protocol request URI.
pub fn request_path(uri: &str) -> Option<&str> {
    let rest = uri
        .strip_prefix("omni://localhost")
        .or_else(|| uri.strip_prefix("http://omni.localhost"))
        .or_else(|| uri.strip_prefix("https://omni.localhost"))?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
