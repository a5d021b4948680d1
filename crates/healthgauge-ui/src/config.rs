//! Endpoint resolution from page metadata.

use healthgauge_core::HEALTH_SCORE_PATH;

/// `<meta name=...>` holding an alternate API origin.
pub const API_BASE_META: &str = "healthgauge-api-base";

/// Normalize the meta tag content into a base URL.
///
/// A missing or blank tag yields an empty base so requests stay same-origin.
#[must_use]
pub fn resolve_base_url(meta_content: Option<&str>) -> String {
    meta_content
        .map(str::trim)
        .map(|base| base.trim_end_matches('/'))
        .unwrap_or_default()
        .to_string()
}

/// Full URL of the score endpoint under `base`.
#[must_use]
pub fn score_url(base: &str) -> String {
    format!("{base}{HEALTH_SCORE_PATH}")
}
