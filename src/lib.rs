//! # linkgal
//!
//! Turns a list of links to media files into ordered, per-gallery HTML pages.
//! The filenames carry all the structure: `cats_2_sleepy.jpg` is item 2 of
//! the gallery "cats".
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Index   input.html | input.csv  →  output.csv      (links → sorted records)
//! 2. Render  output.csv              →  output_files/   (one page per gallery)
//! ```
//!
//! The normalized CSV between the stages is a plain file on purpose: it can
//! be inspected, hand-edited (to reorder or drop items), and fed to the
//! render stage again without re-running the index stage.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`index`] | Stage 1: extracts links from HTML or CSV, parses names, writes the sorted index |
//! | [`render`] | Stage 2: groups the index by gallery and renders pages using Maud |
//! | [`naming`] | `GALLERY_ORDER_name.ext` parser, media kind, page filenames |
//! | [`config`] | `linkgal.toml` loading, CLI overlay merging, validation |
//! | [`types`] | `MediaRecord` (the index row) and `Gallery` |
//! | [`output`] | CLI output formatting for both stages |
//!
//! # Design Decisions
//!
//! ## Malformed Links Are Data, Not Errors
//!
//! A link whose filename does not follow the convention is dropped and
//! reported, never fatal. Source pages routinely contain navigation links
//! and stray assets; a run should produce every gallery it can. How loudly
//! drops are reported is the `skipped_report` option.
//!
//! ## Two Page Shapes
//!
//! Pages are rendered either as standalone documents (with styling and a
//! video sound toggle) or as bare fragments for pasting into a site that
//! already has both. Neither is privileged; `page_mode` picks one.
//!
//! ## Maud Over String Templates
//!
//! Gallery names and filenames come from arbitrary URLs. Maud escapes every
//! interpolation, so a `&` or `"` in a filename cannot break the markup.

pub mod config;
pub mod index;
pub mod naming;
pub mod output;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
