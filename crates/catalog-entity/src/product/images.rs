//! Primary image / gallery normalization.
//!
//! A product stores both a legacy single `image` and an ordered `images`
//! gallery. Whenever the gallery is non-empty its head is the primary
//! image and is mirrored into `image`.

/// A product's image fields after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageSet {
    /// Primary image.
    pub image: Option<String>,
    /// Gallery; `None` when empty.
    pub images: Option<Vec<String>>,
}

impl ImageSet {
    /// Normalize raw form input.
    ///
    /// Blank references are dropped. A non-empty gallery wins and its first
    /// entry becomes the primary image; otherwise the single image is kept.
    pub fn normalize(image: Option<String>, images: Option<Vec<String>>) -> Self {
        let gallery = clean_gallery(images.unwrap_or_default());
        match gallery.first() {
            Some(primary) => Self {
                image: Some(primary.clone()),
                images: Some(gallery),
            },
            None => Self {
                image: clean_ref(image),
                images: None,
            },
        }
    }
}

/// Trim a reference, mapping blank input to `None`.
pub fn clean_ref(reference: Option<String>) -> Option<String> {
    reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

/// Trim every gallery entry and drop the blank ones.
pub fn clean_gallery(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .filter_map(|r| clean_ref(Some(r)))
        .collect()
}

/// Decode the `images` JSON column.
///
/// Accepts a JSON array of strings or a JSON-encoded string of one (older
/// rows). Non-string entries are skipped; undecodable or empty content is
/// treated as no gallery.
pub fn decode(value: Option<serde_json::Value>) -> Option<Vec<String>> {
    let entries = match value? {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::String(raw) => match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Array(entries)) => entries,
            _ => return None,
        },
        _ => return None,
    };

    let gallery: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect();

    if gallery.is_empty() { None } else { Some(gallery) }
}
