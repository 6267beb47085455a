//! Filename parsing for the `GALLERY_ORDER_name.ext` convention.
//!
//! Every linked media file encodes where it belongs in its own name: the
//! first `_`-delimited token is the gallery, the second is the item's
//! position within it. Anything after the second token is free-form.
//!
//! - `cats_1_sleepy.jpg` → gallery "cats", order 1
//! - `Road Trip_010_dawn_at_the_lake.mp4` → gallery "Road Trip", order 10
//! - `cats.jpg` → malformed (no order token)
//! - `cats_first_a.jpg` → malformed (order is not an integer)
//!
//! This module also owns the two other facts derived purely from names: the
//! media kind (from the extension) and the output page filename for a gallery.

use thiserror::Error;

/// Why a filename does not follow the gallery naming convention.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("no order token after the gallery name")]
    MissingOrder,
    #[error("gallery token is empty")]
    EmptyGallery,
    #[error("gallery token {0:?} contains a path separator")]
    PathSeparator(String),
    #[error("order token {0:?} is not an integer")]
    InvalidOrder(String),
}

/// Result of parsing a filename like `cats_2_b.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMediaName {
    /// First `_` token, verbatim (may contain spaces).
    pub gallery: String,
    /// Second `_` token as an integer.
    pub order: i64,
}

/// Return the last `/`-delimited segment of a URL.
///
/// A URL with no `/` is returned unchanged; a URL ending in `/` yields "".
pub fn filename_from_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(pos) => &url[pos + 1..],
        None => url,
    }
}

/// Parse a media filename following the `GALLERY_ORDER_*` convention.
pub fn parse_media_name(filename: &str) -> Result<ParsedMediaName, NameError> {
    let mut tokens = filename.split('_');
    // split always yields at least one item
    let gallery = tokens.next().unwrap_or_default();
    let order_token = tokens.next().ok_or(NameError::MissingOrder)?;

    if gallery.is_empty() {
        return Err(NameError::EmptyGallery);
    }
    // '/' cannot survive filename_from_url, but '\\' can
    if gallery.contains(['/', '\\']) {
        return Err(NameError::PathSeparator(gallery.to_string()));
    }
    let order = order_token
        .parse::<i64>()
        .map_err(|_| NameError::InvalidOrder(order_token.to_string()))?;

    Ok(ParsedMediaName {
        gallery: gallery.to_string(),
        order,
    })
}

/// How a media item is embedded in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];

impl MediaKind {
    /// Classify by the lower-cased suffix after the last `.`.
    ///
    /// Unknown extensions are images. A name with no `.` is matched whole.
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or(filename)
            .to_ascii_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Output filename for a gallery page: spaces become underscores.
pub fn page_filename(gallery: &str) -> String {
    format!("{}.html", gallery.replace(' ', "_"))
}
