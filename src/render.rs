//! Gallery page rendering.
//!
//! Stage 2 of the pipeline. Reads the normalized index written by
//! [`index`](crate::index), groups rows by gallery, and writes one HTML file
//! per gallery with its media in ascending order.
//!
//! ## Page Modes
//!
//! - **Full document** ([`PageMode::FullDocument`]): a standalone page with a
//!   responsive viewport, embedded CSS for a horizontally scrolling,
//!   snap-aligned strip, and a script that mutes every video and gives it a
//!   sound-toggle button.
//! - **Fragment** ([`PageMode::Fragment`]): only the gallery block, meant to
//!   be pasted into a larger page that already provides styling.
//!
//! Both share the same block:
//!
//! ```text
//! <column-set gutter="1.3rem">
//!   <column-unit slot="0" span="4">   heading + description placeholder
//!   <column-unit slot="1" span="8">
//!     <div class="gallery-container"><div class="gallery">
//!       <div class="gallery-item"> <img> or <video> </div>
//!       ...
//! ```
//!
//! ## Output Structure
//!
//! ```text
//! output_files/
//! ├── cats.html
//! └── Road_Trip.html      # "Road Trip": spaces become underscores
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) so every gallery name, filename and
//! link is escaped on interpolation. Static assets are embedded at compile
//! time:
//! - `static/gallery.css`: strip layout (sizes injected from `[theme]`)
//! - `static/sound-toggle.js`: per-video mute toggle

use crate::config::{self, PageMode, PipelineConfig};
use crate::naming::{self, MediaKind};
use crate::types::{Gallery, MediaRecord};
use log::{debug, warn};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed index {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// One gallery page written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub gallery: String,
    pub path: PathBuf,
    pub item_count: usize,
}

const CSS_STATIC: &str = include_str!("../static/gallery.css");
const JS: &str = include_str!("../static/sound-toggle.js");

/// Read the normalized index.
///
/// Accepts the `Gallery Name,Order Number,File Name,Link` header as well as
/// the older `galleryname,ordernum,filename,url` one. A row with the wrong
/// number of columns or a non-integer order is an error.
pub fn read_index(path: &Path) -> Result<Vec<MediaRecord>, RenderError> {
    let file = File::open(path).map_err(|source| RenderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    csv::Reader::from_reader(file)
        .deserialize()
        .collect::<Result<Vec<MediaRecord>, _>>()
        .map_err(|source| RenderError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Group records by gallery name.
///
/// Galleries come out in order of first appearance; items within each are
/// stably sorted by order, so duplicate order numbers keep index order.
pub fn group_galleries(records: Vec<MediaRecord>) -> Vec<Gallery> {
    let mut galleries: Vec<Gallery> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        let idx = *positions.entry(record.gallery.clone()).or_insert_with(|| {
            galleries.push(Gallery {
                name: record.gallery.clone(),
                items: Vec::new(),
            });
            galleries.len() - 1
        });
        galleries[idx].items.push(record);
    }
    for gallery in &mut galleries {
        gallery.items.sort_by_key(|r| r.order);
    }
    galleries
}

/// Render every gallery in the index into `output_dir`.
///
/// The directory is created if absent and existing pages are overwritten.
/// A gallery whose name contains a path separator (only possible in a
/// hand-edited index) is skipped with a warning.
pub fn render(
    index_path: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
) -> Result<Vec<RenderedPage>, RenderError> {
    let galleries = group_galleries(read_index(index_path)?);

    fs::create_dir_all(output_dir).map_err(|source| RenderError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let mut pages = Vec::with_capacity(galleries.len());
    for gallery in &galleries {
        if gallery.name.contains(['/', '\\']) {
            warn!(
                "Skipping gallery {:?}: name contains a path separator",
                gallery.name
            );
            continue;
        }
        let filename = naming::page_filename(&gallery.name);
        if !seen.insert(filename.clone()) {
            warn!(
                "Gallery {:?} overwrites an earlier gallery's {}",
                gallery.name, filename
            );
        }
        let path = output_dir.join(&filename);
        let markup = render_page(gallery, config.page_mode, config);
        fs::write(&path, markup.into_string()).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {}", path.display());

        pages.push(RenderedPage {
            gallery: gallery.name.clone(),
            path,
            item_count: gallery.items.len(),
        });
    }
    Ok(pages)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders a single media item: `<video>` for mp4/mov, `<img>` otherwise.
pub fn render_item(record: &MediaRecord, video_width: u32) -> Markup {
    html! {
        div.gallery-item {
            @match record.kind() {
                MediaKind::Video => {
                    video autoplay controls loop muted width=(video_width) {
                        source src=(record.url) type="video/mp4";
                        "Your browser does not support the video tag."
                    }
                }
                MediaKind::Image => {
                    img alt=(record.filename) src=(record.url);
                }
            }
        }
    }
}

/// Renders the embeddable gallery block: heading column plus media strip.
pub fn render_fragment(gallery: &Gallery, config: &PipelineConfig) -> Markup {
    let page = &config.page;
    html! {
        column-set gutter=(page.gutter) {
            column-unit slot="0" span=(page.heading_span) {
                h1 { (gallery.name) }
                br;
                br;
                (page.description)
            }
            column-unit slot="1" span=(page.gallery_span) {
                div.gallery-container {
                    div.gallery {
                        @for record in &gallery.items {
                            (render_item(record, config.theme.video_width))
                        }
                    }
                }
            }
        }
    }
}

/// Renders a standalone HTML document around the gallery block.
pub fn render_document(gallery: &Gallery, config: &PipelineConfig) -> Markup {
    let css = format!(
        "{}\n\n{}",
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    );
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (gallery.name) }
                style { (PreEscaped(css)) }
            }
            body {
                (render_fragment(gallery, config))
                script { (PreEscaped(JS)) }
            }
        }
    }
}

pub fn render_page(gallery: &Gallery, mode: PageMode, config: &PipelineConfig) -> Markup {
    match mode {
        PageMode::FullDocument => render_document(gallery, config),
        PageMode::Fragment => render_fragment(gallery, config),
    }
}

// ============================================================================
// Tests
// ============================================================================
