//! Link extraction and normalized index generation.
//!
//! Stage 1 of the pipeline. Reads the configured source, derives a
//! [`MediaRecord`] from every link whose filename follows the
//! `GALLERY_ORDER_name.ext` convention, sorts them, and writes the normalized
//! CSV that the render stage consumes.
//!
//! ## Sources
//!
//! - **HTML** ([`InputMode::FromHtml`]): every `<a href>` in document order.
//! - **CSV** ([`InputMode::FromCsv`]): column 0 of each row, no header.
//!   Extra columns are ignored.
//!
//! ## Output
//!
//! ```text
//! Gallery Name,Order Number,File Name,Link
//! cats,1,cats_1_a.png,http://x/cats_1_a.png
//! cats,2,cats_2_b.jpg,http://x/cats_2_b.jpg
//! ```
//!
//! Rows are sorted by gallery (byte-wise), then order (numeric). The sort is
//! stable, so duplicate keys keep their input order.
//!
//! Links with malformed filenames are not fatal: they are collected as
//! [`SkippedEntry`] values and reported according to
//! [`SkippedReport`](crate::config::SkippedReport).

use crate::config::{InputMode, PipelineConfig, SkippedReport};
use crate::naming::{self, NameError};
use crate::types::{INDEX_HEADER, MediaRecord};
use log::{debug, warn};
use scraper::{Html, Selector};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
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
    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// A link dropped because its filename does not follow the convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub filename: String,
    pub reason: NameError,
}

/// Sorted records plus everything that was dropped on the way.
#[derive(Debug, Default)]
pub struct Index {
    pub records: Vec<MediaRecord>,
    pub skipped: Vec<SkippedEntry>,
}

impl Index {
    /// Distinct gallery names with their item counts, in record order.
    pub fn gallery_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for record in &self.records {
            match counts.last_mut() {
                Some((name, n)) if *name == record.gallery => *n += 1,
                _ => counts.push((record.gallery.as_str(), 1)),
            }
        }
        counts
    }
}

/// Extract every `href` of an `<a>` element, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Read column 0 of every row of a headerless CSV.
pub fn read_url_csv(path: &Path) -> Result<Vec<String>, IndexError> {
    let csv_err = |source| IndexError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut urls = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        // Blank lines never reach here, so every row has a column 0.
        urls.push(row.get(0).unwrap_or_default().to_string());
    }
    Ok(urls)
}

/// Parse every URL into a record and sort by `(gallery, order)`.
///
/// URLs whose filename is malformed end up in [`Index::skipped`] in input
/// order; they never abort the build.
pub fn build_index<I, S>(urls: I) -> Index
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = Index::default();
    for url in urls {
        let url = url.as_ref();
        let filename = naming::filename_from_url(url);
        match naming::parse_media_name(filename) {
            Ok(parsed) => index.records.push(MediaRecord {
                gallery: parsed.gallery,
                order: parsed.order,
                filename: filename.to_string(),
                url: url.to_string(),
            }),
            Err(reason) => index.skipped.push(SkippedEntry {
                filename: filename.to_string(),
                reason,
            }),
        }
    }
    // sort_by is stable: equal (gallery, order) keys keep input order
    index
        .records
        .sort_by(|a, b| a.gallery.cmp(&b.gallery).then(a.order.cmp(&b.order)));
    index
}

/// Write records as the normalized CSV, replacing any existing file.
///
/// Missing parent directories are created.
pub fn write_index(path: &Path, records: &[MediaRecord]) -> Result<(), IndexError> {
    let write_err = |source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| IndexError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let file = File::create(path).map_err(write_err)?;
    let mut writer = csv::Writer::from_writer(file);

    // Written explicitly so an empty index still carries the header.
    writer.write_record(INDEX_HEADER).map_err(csv_err)?;
    for record in records {
        writer
            .write_record([
                record.gallery.as_str(),
                record.order.to_string().as_str(),
                record.filename.as_str(),
                record.url.as_str(),
            ])
            .map_err(csv_err)?;
    }
    writer.flush().map_err(write_err)?;
    debug!("Wrote {} ({} rows)", path.display(), records.len());
    Ok(())
}

/// Run the whole index stage for a config: read, parse, sort, write.
pub fn run_index(config: &PipelineConfig) -> Result<Index, IndexError> {
    let input = &config.input_path;
    let urls = match config.mode {
        InputMode::FromHtml => {
            let html = fs::read_to_string(input).map_err(|source| IndexError::Read {
                path: input.clone(),
                source,
            })?;
            extract_links(&html)
        }
        InputMode::FromCsv => read_url_csv(input)?,
    };
    debug!("Read {} links from {}", urls.len(), input.display());

    let index = build_index(&urls);
    if config.skipped_report == SkippedReport::Each {
        for entry in &index.skipped {
            warn!(
                "Skipping malformed filename: {} ({})",
                entry.filename, entry.reason
            );
        }
    }

    write_index(&config.csv_output_path, &index.records)?;
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    // =========================================================================
    // extract_links
    // =========================================================================

    #[test]
    fn extracts_hrefs_in_document_order() {
        let html = r#"<html><body>
            <p><a href="http://x/cats_2_b.jpg">b</a></p>
            <a href="http://x/cats_1_a.png">a</a>
            <a name="anchor-without-href">nope</a>
            <img src="http://x/dogs_1_a.png">
        </body></html>"#;
        assert_eq!(
            extract_links(html),
            vec!["http://x/cats_2_b.jpg", "http://x/cats_1_a.png"]
        );
    }

    #[test]
    fn decodes_entities_in_href() {
        let html = r#"<a href="http://x/a&amp;b_1_c.jpg">x</a>"#;
        assert_eq!(extract_links(html), vec!["http://x/a&b_1_c.jpg"]);
    }

    #[test]
    fn tolerates_malformed_html() {
        let html = r#"<div><a href="http://x/cats_1_a.png">unclosed"#;
        assert_eq!(extract_links(html), vec!["http://x/cats_1_a.png"]);
    }

    // =========================================================================
    // read_url_csv
    // =========================================================================

    #[test]
    fn reads_first_column_only() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "urls.csv",
            "http://x/cats_1_a.png,ignored\nhttp://x/cats_2_b.jpg\n\n\"http://x/dogs_1_a,b.png\",x,y\n",
        );
        let urls = read_url_csv(&path).unwrap();
        assert_eq!(
            urls,
            vec![
                "http://x/cats_1_a.png",
                "http://x/cats_2_b.jpg",
                "http://x/dogs_1_a,b.png",
            ]
        );
    }

    #[test]
    fn missing_csv_is_read_error_naming_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.csv");
        let err = read_url_csv(&path).unwrap_err();
        assert!(matches!(err, IndexError::Read { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    // =========================================================================
    // build_index
    // =========================================================================

    #[test]
    fn conforming_url_yields_one_record() {
        let index = build_index(["http://x/cats_2_b.jpg"]);
        assert_eq!(
            index.records,
            vec![record("cats", 2, "cats_2_b.jpg", "http://x/cats_2_b.jpg")]
        );
        assert!(index.skipped.is_empty());
    }

    #[test]
    fn malformed_names_are_skipped_not_fatal() {
        let index = build_index([
            "http://x/cats.jpg",
            "http://x/cats_1_a.png",
            "http://x/cats_one_b.png",
            "http://x/",
        ]);
        assert_eq!(index.records.len(), 1);
        let skipped: Vec<&str> = index.skipped.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(skipped, vec!["cats.jpg", "cats_one_b.png", ""]);
        assert_eq!(index.skipped[0].reason, NameError::MissingOrder);
        assert_eq!(
            index.skipped[1].reason,
            NameError::InvalidOrder("one".to_string())
        );
    }

    #[test]
    fn sorted_by_gallery_then_numeric_order() {
        let index = build_index([
            "http://x/dogs_1_a.png",
            "http://x/cats_10_c.png",
            "http://x/cats_2_b.png",
            "http://x/Cats_5_z.png",
        ]);
        let keys: Vec<(&str, i64)> = index
            .records
            .iter()
            .map(|r| (r.gallery.as_str(), r.order))
            .collect();
        // byte-wise: uppercase sorts before lowercase
        assert_eq!(keys, vec![("Cats", 5), ("cats", 2), ("cats", 10), ("dogs", 1)]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let index = build_index([
            "http://x/cats_1_second.png",
            "http://a/cats_0_first.png",
            "http://y/cats_1_third.png",
            "http://z/cats_1_fourth.png",
        ]);
        let names: Vec<&str> = index.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "cats_0_first.png",
                "cats_1_second.png",
                "cats_1_third.png",
                "cats_1_fourth.png",
            ]
        );
    }

    #[test]
    fn gallery_counts_follow_sorted_records() {
        let index = build_index([
            "http://x/dogs_1_a.png",
            "http://x/cats_1_a.png",
            "http://x/cats_2_b.png",
        ]);
        assert_eq!(index.gallery_counts(), vec![("cats", 2), ("dogs", 1)]);
    }

    // =========================================================================
    // write_index
    // =========================================================================

    #[test]
    fn writes_header_and_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        let records = vec![record("cats", 1, "cats_1_a.png", "http://x/cats_1_a.png")];
        write_index(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Gallery Name,Order Number,File Name,Link\ncats,1,cats_1_a.png,http://x/cats_1_a.png\n"
        );
    }

    #[test]
    fn quotes_embedded_commas() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        let records = vec![record("a,b", 1, "a,b_1_c.png", "http://x/a,b_1_c.png")];
        write_index(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""a,b",1,"a,b_1_c.png","http://x/a,b_1_c.png""#));
    }

    #[test]
    fn empty_index_still_has_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        write_index(&path, &[]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Gallery Name,Order Number,File Name,Link\n"
        );
    }

    #[test]
    fn creates_parent_dirs_and_truncates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/nested/out.csv");
        let many: Vec<MediaRecord> = (1..=5)
            .map(|i| {
                let name = format!("cats_{i}_x.png");
                record("cats", i, &name, &format!("http://x/{name}"))
            })
            .collect();
        write_index(&path, &many).unwrap();
        write_index(&path, &many[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    // =========================================================================
    // run_index
    // =========================================================================

    #[test]
    fn run_index_from_html() {
        let tmp = TempDir::new().unwrap();
        let input = write_file(
            tmp.path(),
            "page.html",
            r#"<a href="http://x/cats_2_b.jpg"></a><a href="http://x/bad.jpg"></a><a href="http://x/cats_1_a.png"></a>"#,
        );
        let config = PipelineConfig {
            input_path: input,
            csv_output_path: tmp.path().join("index.csv"),
            mode: InputMode::FromHtml,
            ..PipelineConfig::default()
        };

        let index = run_index(&config).unwrap();
        assert_eq!(index.records.len(), 2);
        assert_eq!(index.skipped.len(), 1);

        let content = fs::read_to_string(tmp.path().join("index.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "cats,1,cats_1_a.png,http://x/cats_1_a.png");
        assert_eq!(lines[2], "cats,2,cats_2_b.jpg,http://x/cats_2_b.jpg");
    }

    #[test]
    fn run_index_missing_input_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = PipelineConfig {
            input_path: tmp.path().join("missing.html"),
            csv_output_path: tmp.path().join("index.csv"),
            mode: InputMode::FromHtml,
            ..PipelineConfig::default()
        };
        let err = run_index(&config).unwrap_err();
        assert!(err.to_string().contains("missing.html"));
        assert!(!tmp.path().join("index.csv").exists());
    }
}
