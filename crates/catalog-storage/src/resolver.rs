//! Image reference resolution.
//!
//! Product rows may hold references in several shapes: managed-bucket
//! URLs, arbitrary external URLs, and legacy file-share links pasted from
//! Google Drive. Share links are rewritten into their direct-view form;
//! everything else passes through trimmed.

use std::sync::LazyLock;

use regex::Regex;

/// Direct-view URL template for a file-share id.
const DIRECT_VIEW_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

static SHARE_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?drive\.google\.com(?::\d+)?(?:[/?#]|$)")
        .expect("share host pattern is valid")
});

static FILE_PATH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/file/d/([A-Za-z0-9_-]+)").expect("file path pattern is valid"));

static QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").expect("query id pattern is valid"));

/// Resolve a stored image reference into a displayable URL.
///
/// Returns `None` for absent or blank input. Idempotent on its own output.
pub fn resolve(reference: Option<&str>) -> Option<String> {
    let reference = reference?.trim();
    if reference.is_empty() {
        return None;
    }
    if !is_share_link(reference) || is_direct_view(reference) {
        return Some(reference.to_string());
    }

    if let Some(id) = capture(&FILE_PATH_ID, reference).or_else(|| capture(&QUERY_ID, reference)) {
        return Some(format!("{DIRECT_VIEW_PREFIX}{id}"));
    }
    Some(reference.to_string())
}

/// Resolve every image of a product for display.
///
/// Gallery entries come first in order; when the gallery resolves to
/// nothing the single `image` is used. Duplicates are dropped.
pub fn resolve_gallery(image: Option<&str>, images: Option<&[String]>) -> Vec<String> {
    let mut gallery: Vec<String> = Vec::new();
    for url in images
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| resolve(Some(entry)))
    {
        if !gallery.contains(&url) {
            gallery.push(url);
        }
    }
    if gallery.is_empty() {
        gallery.extend(resolve(image));
    }
    gallery
}

/// Whether the reference points at the legacy file-share host.
pub fn is_share_link(reference: &str) -> bool {
    SHARE_HOST.is_match(reference.trim())
}

/// A `/uc?` link that already asks for `export=view`, kept with all its
/// parameters.
fn is_direct_view(reference: &str) -> bool {
    reference.contains("/uc?") && reference.contains("export=view")
}

fn capture<'a>(pattern: &Regex, haystack: &'a str) -> Option<&'a str> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
