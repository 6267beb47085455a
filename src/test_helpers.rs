//! Shared test utilities for the linkgal test suite.
//!
//! Record builders and fixture writers used by the `index` and `render`
//! unit tests.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let index = write_index_fixture(tmp.path(), &[
//!     record("cats", 1, "cats_1_a.png", "http://x/cats_1_a.png"),
//! ]);
//! ```

use std::path::{Path, PathBuf};

use crate::index::write_index;
use crate::types::MediaRecord;

/// Build a record without going through filename parsing.
pub fn record(gallery: &str, order: i64, filename: &str, url: &str) -> MediaRecord {
    MediaRecord {
        gallery: gallery.to_string(),
        order,
        filename: filename.to_string(),
        url: url.to_string(),
    }
}

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Write records as a normalized index at `dir/index.csv`, in the given
/// order (no sorting), and return the path.
pub fn write_index_fixture(dir: &Path, records: &[MediaRecord]) -> PathBuf {
    let path = dir.join("index.csv");
    write_index(&path, records).unwrap();
    path
}
