//! Directory scanning and filename classification.
//!
//! Walks the configured source directories, extracts a code from every
//! filename, and groups the matching files into [`MediaItem`]s. Files whose
//! name yields no code are counted but otherwise ignored.

mod codes;
mod settings;

pub use codes::{CodeExtractor, FileVariant};
pub use settings::ScanSettings;

use std::collections::BTreeMap;
use std::path::Path;

use shelfmark_model::MediaItem;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::Result;

/// Outcome of one scan pass over all source directories.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ScanReport {
    /// Items keyed by code; `BTreeMap` keeps output deterministic.
    pub items: BTreeMap<String, MediaItem>,
    pub total_files: usize,
    pub matched_files: usize,
    pub skipped_files: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MediaScanner {
    settings: ScanSettings,
    extractor: CodeExtractor,
}

impl MediaScanner {
    pub fn new(settings: ScanSettings) -> Result<Self> {
        let extractor = CodeExtractor::new(&settings.code_patterns)?;
        Ok(Self {
            settings,
            extractor,
        })
    }

    /// Scan every configured source directory and group files by code.
    ///
    /// A missing source directory is reported in [`ScanReport::errors`]
    /// rather than failing the run; the original tree may live on
    /// removable or network storage.
    pub fn scan(&self) -> ScanReport {
        let mut report = ScanReport::default();

        for source in &self.settings.source_directories {
            if !source.is_dir() {
                warn!("source directory missing, skipping: {}", source.display());
                report
                    .errors
                    .push(format!("missing source directory: {}", source.display()));
                continue;
            }
            info!("scanning {}", source.display());
            self.scan_source(source, &mut report);
        }

        info!(
            "scan complete: {} files seen, {} grouped into {} items, {} skipped, {} errors",
            report.total_files,
            report.matched_files,
            report.items.len(),
            report.skipped_files,
            report.errors.len()
        );
        report
    }

    fn scan_source(&self, source: &Path, report: &mut ScanReport) {
        let mut walker = WalkDir::new(source).follow_links(false);
        if !self.settings.recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("error walking {}: {err}", source.display());
                    report.errors.push(format!("walk error: {err}"));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            report.total_files += 1;

            let Some(name) = entry.file_name().to_str() else {
                report.skipped_files += 1;
                continue;
            };
            let Some(code) = self.extractor.extract(name) else {
                debug!("no code in filename, skipping: {name}");
                report.skipped_files += 1;
                continue;
            };

            report.matched_files += 1;
            let item = report
                .items
                .entry(code.clone())
                .or_insert_with(|| MediaItem::new(code));
            self.classify(entry.path(), item);
        }
    }

    /// Slot a file into its item based on extension, variant suffix, and
    /// filename keywords.
    fn classify(&self, path: &Path, item: &mut MediaItem) {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let variant = self.extractor.variant(
            path.file_name().and_then(|n| n.to_str()).unwrap_or_default(),
            &self.settings,
        );

        if self.settings.video_extensions.iter().any(|e| *e == ext)
            || self.settings.stream_extensions.iter().any(|e| *e == ext)
        {
            match variant {
                None | Some(FileVariant::Main) => item.video = Some(path.to_path_buf()),
                Some(FileVariant::Trailer) => item.trailer = Some(path.to_path_buf()),
                // Alternate cuts (CODE-F and friends) are not catalogued.
                Some(other) => debug!("ignoring {other:?} variant: {}", path.display()),
            }
        } else if ext == "nfo" {
            item.nfo = Some(path.to_path_buf());
        } else if self.settings.image_extensions.iter().any(|e| *e == ext) {
            let has_keyword = |keywords: &[String]| keywords.iter().any(|k| name.contains(k));
            if matches!(variant, Some(FileVariant::Thumb)) {
                // Thumbnails only stand in for a missing poster.
                if item.poster.is_none() {
                    item.poster = Some(path.to_path_buf());
                }
            } else if matches!(variant, Some(FileVariant::Poster))
                || has_keyword(&self.settings.poster_keywords)
            {
                item.poster = Some(path.to_path_buf());
            } else if matches!(variant, Some(FileVariant::Fanart))
                || has_keyword(&self.settings.fanart_keywords)
            {
                item.fanart = Some(path.to_path_buf());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner_for(dir: &TempDir) -> MediaScanner {
        let settings = ScanSettings {
            source_directories: vec![dir.path().to_path_buf()],
            ..ScanSettings::default()
        };
        MediaScanner::new(settings).unwrap()
    }

    #[test]
    fn groups_files_by_code() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ABCD-123.mp4"), b"video").unwrap();
        fs::write(dir.path().join("ABCD-123.nfo"), b"<movie/>").unwrap();
        fs::write(dir.path().join("ABCD-123-poster.jpg"), b"img").unwrap();
        fs::write(dir.path().join("EFGH-456.mkv"), b"video").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let report = scanner_for(&dir).scan();

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.total_files, 5);
        assert_eq!(report.skipped_files, 1);

        let item = &report.items["ABCD-123"];
        assert!(item.video.is_some());
        assert!(item.nfo.is_some());
        assert!(item.poster.is_some());
        assert!(item.trailer.is_none());
    }

    #[test]
    fn trailer_suffix_fills_trailer_slot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ABCD-123.mp4"), b"video").unwrap();
        fs::write(dir.path().join("ABCD-123-trailer.mp4"), b"clip").unwrap();

        let report = scanner_for(&dir).scan();
        let item = &report.items["ABCD-123"];
        assert!(item.video.is_some());
        assert!(
            item.trailer
                .as_deref()
                .is_some_and(|p| p.ends_with("ABCD-123-trailer.mp4"))
        );
    }

    #[test]
    fn thumb_only_fills_missing_poster() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ABCD-123-thumb.jpg"), b"img").unwrap();

        let report = scanner_for(&dir).scan();
        assert!(report.items["ABCD-123"].poster.is_some());

        fs::write(dir.path().join("ABCD-123-poster.jpg"), b"img").unwrap();
        let report = scanner_for(&dir).scan();
        assert!(
            report.items["ABCD-123"]
                .poster
                .as_deref()
                .is_some_and(|p| p.ends_with("ABCD-123-poster.jpg"))
        );
    }

    #[test]
    fn missing_source_directory_is_an_error_entry() {
        let settings = ScanSettings {
            source_directories: vec!["/nonexistent/shelfmark".into()],
            ..ScanSettings::default()
        };
        let report = MediaScanner::new(settings).unwrap().scan();
        assert!(report.items.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn non_recursive_scan_stays_at_top_level() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("ABCD-123.mp4"), b"video").unwrap();

        let settings = ScanSettings {
            source_directories: vec![dir.path().to_path_buf()],
            recursive: false,
            ..ScanSettings::default()
        };
        let report = MediaScanner::new(settings).unwrap().scan();
        assert!(report.items.is_empty());
    }
}
