//! Shared types passed between the index and render stages.
//!
//! [`MediaRecord`] is also the row type of the normalized CSV, so its serde
//! field names are the file's column headers.

use crate::naming::MediaKind;
use serde::{Deserialize, Serialize};

/// Header row of the normalized index, in column order.
pub const INDEX_HEADER: [&str; 4] = ["Gallery Name", "Order Number", "File Name", "Link"];

/// One linked media item placed in a gallery.
///
/// Invariant: `filename` is the last path segment of `url`, and `gallery`
/// and `order` are its first two `_` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "Gallery Name", alias = "galleryname")]
    pub gallery: String,
    #[serde(rename = "Order Number", alias = "ordernum")]
    pub order: i64,
    #[serde(rename = "File Name", alias = "filename")]
    pub filename: String,
    #[serde(rename = "Link", alias = "url")]
    pub url: String,
}

impl MediaRecord {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_filename(&self.filename)
    }
}

/// A gallery and its items, sorted by order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    pub name: String,
    pub items: Vec<MediaRecord>,
}
