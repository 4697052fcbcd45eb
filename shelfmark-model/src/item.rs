//! One catalogued media item: the files grouped under a single code.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Files belonging to one media item, grouped by the code extracted
/// from their filenames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub code: String,
    pub video: Option<PathBuf>,
    pub trailer: Option<PathBuf>,
    pub nfo: Option<PathBuf>,
    pub poster: Option<PathBuf>,
    pub fanart: Option<PathBuf>,
}

impl MediaItem {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// True when the item points at a `.strm` stream rather than a
    /// local video file.
    pub fn is_stream(&self) -> bool {
        self.video
            .as_deref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("strm"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_detection_is_case_insensitive() {
        let mut item = MediaItem::new("ABCD-123");
        assert!(!item.is_stream());

        item.video = Some(PathBuf::from("/media/ABCD-123.STRM"));
        assert!(item.is_stream());

        item.video = Some(PathBuf::from("/media/ABCD-123.mp4"));
        assert!(!item.is_stream());
    }
}
