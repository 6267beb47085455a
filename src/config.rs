//! Pipeline configuration.
//!
//! Handles loading, validating, and merging `linkgal.toml`. Configuration is
//! layered: stock defaults are overridden by the config file, which is in
//! turn overridden by command-line flags.
//!
//! ```text
//! stock defaults  →  linkgal.toml  →  CLI flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_path = "data/input.csv"       # HTML page or headerless URL list
//! csv_output_path = "data/output.csv" # Normalized index written by stage 1
//! output_dir = "output_files"         # Gallery pages written by stage 2
//! mode = "from_csv"                   # from_html | from_csv
//! page_mode = "full_document"         # full_document | fragment
//! skipped_report = "each"             # each | summary | silent
//!
//! [page]
//! description = "WRITE A DESCRIPTION" # Placeholder under each gallery heading
//! gutter = "1.3rem"                   # column-set gutter
//! heading_span = 4                    # Columns for the heading block
//! gallery_span = 8                    # Columns for the media strip
//!
//! [theme]
//! gallery_height = "75vh"             # Height of the scrolling strip
//! item_gap = "10px"                   # Gap between media items
//! video_width = 300                   # width attribute on <video>
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "linkgal.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Where the indexer reads its URLs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Every `<a href>` in an HTML document
    FromHtml,
    /// Column 0 of a headerless CSV
    #[default]
    FromCsv,
}

/// Shape of each rendered gallery file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// Standalone HTML document with embedded styles and sound toggles
    #[default]
    FullDocument,
    /// Embeddable block for inclusion in a larger page
    Fragment,
}

/// How records with malformed filenames are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SkippedReport {
    /// Warn about every skipped filename as it is encountered
    #[default]
    Each,
    /// Print one summary after indexing
    Summary,
    /// Drop malformed records without comment
    Silent,
}

/// Pipeline configuration loaded from `linkgal.toml`.
///
/// All fields have defaults; user config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Source document: an HTML page or a headerless CSV of URLs.
    pub input_path: PathBuf,
    /// Normalized index written by the indexer and read by the renderer.
    pub csv_output_path: PathBuf,
    /// Directory for rendered gallery pages. Created if absent.
    pub output_dir: PathBuf,
    pub mode: InputMode,
    pub page_mode: PageMode,
    pub skipped_report: SkippedReport,
    /// Gallery page layout.
    pub page: PageConfig,
    /// Media strip styling.
    pub theme: ThemeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/input.csv"),
            csv_output_path: PathBuf::from("data/output.csv"),
            output_dir: PathBuf::from("output_files"),
            mode: InputMode::default(),
            page_mode: PageMode::default(),
            skipped_report: SkippedReport::default(),
            page: PageConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, path) in [
            ("input_path", &self.input_path),
            ("csv_output_path", &self.csv_output_path),
            ("output_dir", &self.output_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.page.heading_span == 0 || self.page.gallery_span == 0 {
            return Err(ConfigError::Validation(
                "page.heading_span and page.gallery_span must be non-zero".into(),
            ));
        }
        if self.theme.video_width == 0 {
            return Err(ConfigError::Validation(
                "theme.video_width must be non-zero".into(),
            ));
        }
        // theme values are written unescaped into the <style> block
        for (key, value) in [
            ("theme.gallery_height", &self.theme.gallery_height),
            ("theme.item_gap", &self.theme.item_gap),
        ] {
            if value.contains('<') {
                return Err(ConfigError::Validation(format!(
                    "{key} must not contain '<': {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Two-column `column-set` layout around each gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Placeholder text under the gallery heading, meant to be edited by hand.
    pub description: String,
    /// `gutter` attribute of the `column-set` element.
    pub gutter: String,
    /// Column span of the heading block.
    pub heading_span: u32,
    /// Column span of the media strip.
    pub gallery_span: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            description: "WRITE A DESCRIPTION".to_string(),
            gutter: "1.3rem".to_string(),
            heading_span: 4,
            gallery_span: 8,
        }
    }
}

/// Styling of the horizontally scrolling media strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Height of the strip (CSS value).
    pub gallery_height: String,
    /// Gap between items (CSS value).
    pub item_gap: String,
    /// `width` attribute of embedded `<video>` elements, in pixels.
    pub video_width: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            gallery_height: "75vh".to_string(),
            item_gap: "10px".to_string(),
            video_width: 300,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that file and CLI overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge each present overlay onto a base value in order, then deserialize
/// and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = Option<toml::Value>>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = overlays.into_iter().flatten().fold(base, merge_toml);
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file, merged on top of stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    resolve_config(stock_defaults_value(), [load_raw_config(path)?])
}

/// Returns a fully-commented stock `linkgal.toml` with all keys and explanations.
///
/// Printed by `linkgal --print-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# linkgal Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override this file.
# Unknown keys will cause an error.

# Source document. An HTML page (mode = "from_html") or a headerless CSV
# whose first column is a URL (mode = "from_csv").
input_path = "data/input.csv"

# Normalized index: Gallery Name, Order Number, File Name, Link.
csv_output_path = "data/output.csv"

# Directory for the per-gallery HTML files. Created if missing.
output_dir = "output_files"

# from_html | from_csv
mode = "from_csv"

# full_document: standalone page with styles and sound toggles.
# fragment: just the gallery block, for pasting into another page.
page_mode = "full_document"

# What to say about links whose filename is not GALLERY_ORDER_name.ext.
# each | summary | silent
skipped_report = "each"

# ---------------------------------------------------------------------------
# Page layout
# ---------------------------------------------------------------------------
[page]
# Placeholder shown under each gallery heading.
description = "WRITE A DESCRIPTION"

# column-set gutter and the spans of its two columns.
gutter = "1.3rem"
heading_span = 4
gallery_span = 8

# ---------------------------------------------------------------------------
# Media strip
# ---------------------------------------------------------------------------
[theme]
# Height of the horizontally scrolling strip (CSS value).
gallery_height = "75vh"

# Gap between media items (CSS value).
item_gap = "10px"

# width attribute on embedded videos, in pixels.
video_width = 300
"##
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --gallery-height: {gallery_height};
    --item-gap: {item_gap};
}}"#,
        gallery_height = theme.gallery_height,
        item_gap = theme.item_gap,
    )
}
