//! Handing new-window requests to the system browser.

use tracing::{debug, warn};

/// Schemes that may leave the app. Everything else is denied silently.
const EXTERNAL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

pub(super) fn is_external_url(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, rest)| {
        !rest.is_empty()
            && EXTERNAL_SCHEMES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(scheme))
    })
}

/// Open `url` outside the app. The webview always denies the new window.
pub(super) fn open_external(url: &str) {
    if !is_external_url(url) {
        debug!(url, "new window request denied");
        return;
    }
    match open::that_detached(url) {
        Ok(()) => debug!(url, "opened in system browser"),
        Err(e) => warn!(url, error = %e, "could not open in system browser"),
    }
}
