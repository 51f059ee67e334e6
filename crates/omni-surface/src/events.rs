//! Event payloads relayed to the host UI.

use serde::{Deserialize, Serialize};

/// URL and title of a surface's current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

impl PageInfo {
    /// Build the page info worth publishing, if any.
    ///
    /// Returns `None` while the surface shows the blank placeholder page. A
    /// missing or blank title falls back to the URL.
    pub fn resolve(url: Option<&str>, title: Option<&str>) -> Option<Self> {
        let url = url.map(str::trim).filter(|u| !is_blank_url(u))?;
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(url);
        Some(Self {
            url: url.to_string(),
            title: title.to_string(),
        })
    }
}

/// True for the "nothing loaded yet" states.
pub fn is_blank_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == "about:blank" || url.starts_with("about:blank#") || url.starts_with("about:blank?")
}
