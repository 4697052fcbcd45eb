use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_recursive() -> bool {
    true
}

fn default_video_extensions() -> Vec<String> {
    ["mp4", "mkv", "avi", "mov", "wmv", "webm", "flv", "m4v", "ts"]
        .map(str::to_string)
        .to_vec()
}

fn default_stream_extensions() -> Vec<String> {
    vec!["strm".to_string()]
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "webp"].map(str::to_string).to_vec()
}

fn default_poster_keywords() -> Vec<String> {
    ["poster", "cover", "thumb"].map(str::to_string).to_vec()
}

fn default_fanart_keywords() -> Vec<String> {
    ["fanart", "backdrop", "background"]
        .map(str::to_string)
        .to_vec()
}

fn default_trailer_keywords() -> Vec<String> {
    ["trailer", "preview", "sample"].map(str::to_string).to_vec()
}

fn default_code_patterns() -> Vec<String> {
    vec![
        // Standard hyphenated codes, with an optional variant letter:
        // ABCD-123, ABCD-123-F.
        r"([A-Z]+-\d+)(?:-[A-Z])?".to_string(),
        // No separator: ABC123.
        r"([A-Z]{2,}\d{3,})".to_string(),
        // Seven-digit FC2 releases.
        r"(FC2-\d{7})".to_string(),
    ]
}

/// Filesystem scan tuning: where to look and how filenames are
/// recognized. All fields have defaults so a partial config file loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub source_directories: Vec<PathBuf>,
    pub recursive: bool,
    pub video_extensions: Vec<String>,
    pub stream_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    pub poster_keywords: Vec<String>,
    pub fanart_keywords: Vec<String>,
    pub trailer_keywords: Vec<String>,
    /// Ordered regex alternatives; the first capture group of the first
    /// match is taken as the item code.
    pub code_patterns: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            source_directories: Vec::new(),
            recursive: default_recursive(),
            video_extensions: default_video_extensions(),
            stream_extensions: default_stream_extensions(),
            image_extensions: default_image_extensions(),
            poster_keywords: default_poster_keywords(),
            fanart_keywords: default_fanart_keywords(),
            trailer_keywords: default_trailer_keywords(),
            code_patterns: default_code_patterns(),
        }
    }
}
