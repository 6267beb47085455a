//! CLI output formatting for both pipeline stages.
//!
//! Each stage has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Index
//!
//! ```text
//! 001 cats (2 items)
//! 002 Road Trip (5 items)
//! Index: 7 records → data/output.csv
//! ```
//!
//! ## Skipped summary
//!
//! ```text
//! Skipped 2 malformed filenames
//!     cats.jpg: no order token after the gallery name
//!     dogs_x_1.png: order token "x" is not an integer
//! ```
//!
//! ## Render
//!
//! ```text
//! 001 cats (2 items) → output_files/cats.html
//! 002 Road Trip (5 items) → output_files/Road_Trip.html
//! Generated 2 gallery pages
//! ```

use crate::index::{Index, SkippedEntry};
use crate::render::RenderedPage;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format a gallery header: positional index, name, and item count.
fn gallery_header(index: usize, name: &str, items: usize) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        name,
        plural(items, "item", "items")
    )
}

// ============================================================================
// Stage 1: Index output
// ============================================================================

/// Format index stage output: one line per gallery, then the CSV written.
pub fn format_index_output(index: &Index, csv_path: &Path) -> Vec<String> {
    let mut lines: Vec<String> = index
        .gallery_counts()
        .into_iter()
        .enumerate()
        .map(|(i, (name, count))| gallery_header(i + 1, name, count))
        .collect();
    lines.push(format!(
        "Index: {} \u{2192} {}",
        plural(index.records.len(), "record", "records"),
        csv_path.display()
    ));
    lines
}

/// Format the end-of-index summary of malformed filenames.
///
/// Empty when nothing was skipped.
pub fn format_skipped_summary(skipped: &[SkippedEntry]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "Skipped {}",
        plural(skipped.len(), "malformed filename", "malformed filenames")
    )];
    for entry in skipped {
        lines.push(format!("    {}: {}", entry.filename, entry.reason));
    }
    lines
}

pub fn print_index_output(index: &Index, csv_path: &Path) {
    for line in format_index_output(index, csv_path) {
        println!("{}", line);
    }
}

pub fn print_skipped_summary(skipped: &[SkippedEntry]) {
    for line in format_skipped_summary(skipped) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Render output
// ============================================================================

/// Format render stage output showing each generated page.
pub fn format_render_output(pages: &[RenderedPage]) -> Vec<String> {
    let mut lines: Vec<String> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            format!(
                "{} \u{2192} {}",
                gallery_header(i + 1, &page.gallery, page.item_count),
                page.path.display()
            )
        })
        .collect();
    lines.push(format!(
        "Generated {}",
        plural(pages.len(), "gallery page", "gallery pages")
    ));
    lines
}

pub fn print_render_output(pages: &[RenderedPage]) {
    for line in format_render_output(pages) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use crate::naming::NameError;
    use std::path::PathBuf;

    #[test]
    fn index_output_lists_galleries_and_path() {
        let index = build_index([
            "http://x/dogs_1_a.png",
            "http://x/cats_1_a.png",
            "http://x/cats_2_b.png",
        ]);
        let lines = format_index_output(&index, Path::new("data/output.csv"));
        assert_eq!(
            lines,
            vec![
                "001 cats (2 items)",
                "002 dogs (1 item)",
                "Index: 3 records \u{2192} data/output.csv",
            ]
        );
    }

    #[test]
    fn skipped_summary_empty_when_nothing_skipped() {
        assert!(format_skipped_summary(&[]).is_empty());
    }

    #[test]
    fn skipped_summary_lists_reasons() {
        let skipped = vec![
            SkippedEntry {
                filename: "cats.jpg".to_string(),
                reason: NameError::MissingOrder,
            },
            SkippedEntry {
                filename: "dogs_x_1.png".to_string(),
                reason: NameError::InvalidOrder("x".to_string()),
            },
        ];
        let lines = format_skipped_summary(&skipped);
        assert_eq!(lines[0], "Skipped 2 malformed filenames");
        assert_eq!(lines[1], "    cats.jpg: no order token after the gallery name");
        assert_eq!(lines[2], "    dogs_x_1.png: order token \"x\" is not an integer");
    }

    #[test]
    fn render_output_lines() {
        let pages = vec![RenderedPage {
            gallery: "Road Trip".to_string(),
            path: PathBuf::from("out/Road_Trip.html"),
            item_count: 1,
        }];
        let lines = format_render_output(&pages);
        assert_eq!(
            lines,
            vec![
                "001 Road Trip (1 item) \u{2192} out/Road_Trip.html",
                "Generated 1 gallery page",
            ]
        );
    }
}
