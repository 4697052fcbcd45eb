use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_output_directory() -> PathBuf {
    PathBuf::from("vault/films")
}

fn default_root_dir() -> String {
    "vault/source".to_string()
}

fn default_actors_dir() -> String {
    "vault/actor".to_string()
}

fn default_years_dir() -> String {
    "vault/years".to_string()
}

fn default_ranks_dir() -> String {
    "vault/ranks".to_string()
}

fn default_series_dir() -> String {
    "vault/series".to_string()
}

fn default_keywords_dir() -> String {
    "vault/keywords".to_string()
}

fn default_max_keywords() -> usize {
    20
}

fn default_min_trailer_bytes() -> u64 {
    512_000
}

fn default_datetime_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

/// Note emission tuning: where notes land, which vault directories the
/// embedded links point at, and frontmatter list limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub output_directory: PathBuf,
    /// Vault-relative directory holding the media files themselves.
    pub root_dir: String,
    pub actors_dir: String,
    pub years_dir: String,
    pub ranks_dir: String,
    pub series_dir: String,
    pub keywords_dir: String,
    pub max_keywords: usize,
    pub exclude_keywords: Vec<String>,
    /// Trailers smaller than this are treated as junk and not embedded.
    pub min_trailer_bytes: u64,
    pub datetime_format: String,
    /// Filesystem prefix stripped when turning media paths into
    /// vault-relative links. Empty means paths are used as-is.
    pub absolute_path_prefix: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            root_dir: default_root_dir(),
            actors_dir: default_actors_dir(),
            years_dir: default_years_dir(),
            ranks_dir: default_ranks_dir(),
            series_dir: default_series_dir(),
            keywords_dir: default_keywords_dir(),
            max_keywords: default_max_keywords(),
            exclude_keywords: Vec::new(),
            min_trailer_bytes: default_min_trailer_bytes(),
            datetime_format: default_datetime_format(),
            absolute_path_prefix: String::new(),
        }
    }
}
