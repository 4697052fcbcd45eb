//! Normalized sidecar metadata and its configured defaults.

use serde::{Deserialize, Serialize};

/// Fallback values used to pre-populate an [`NfoRecord`] before any
/// extraction runs. Loaded from the `[nfo.defaults]` section of the
/// configuration file; any omitted key falls back to the hardcoded
/// value in the `Default` impl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfoDefaults {
    pub rating: f32,
    pub studio: String,
    pub director: String,
    pub maker: String,
    pub publisher: String,
    pub series: String,
    pub plot: String,
}

impl Default for NfoDefaults {
    fn default() -> Self {
        Self {
            rating: 0.0,
            studio: "unknown".to_string(),
            director: "unknown".to_string(),
            maker: "unknown".to_string(),
            publisher: "unknown".to_string(),
            series: String::new(),
            plot: "no information available".to_string(),
        }
    }
}

/// Normalized output of parsing one sidecar file.
///
/// A record is always fully populated with defaults before extraction;
/// strategies only overwrite fields they successfully recovered, so no
/// field is ever absent. Text fields hold entity-decoded text with
/// control characters stripped. `rating` is rounded to one decimal
/// place on extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfoRecord {
    pub title: String,
    pub original_title: String,
    /// Insertion order matches document order.
    pub actors: Vec<String>,
    pub genre: Vec<String>,
    /// Free-form date text, not parsed into a calendar type.
    pub release_date: String,
    pub rating: f32,
    pub plot: String,
    pub studio: String,
    pub director: String,
    pub maker: String,
    pub publisher: String,
    pub series: String,
    /// Duration expressed as free text (usually minutes).
    pub runtime: String,
}

impl NfoRecord {
    /// Create a record with every field set to its configured default.
    pub fn with_defaults(defaults: &NfoDefaults) -> Self {
        Self {
            title: String::new(),
            original_title: String::new(),
            actors: Vec::new(),
            genre: Vec::new(),
            release_date: String::new(),
            rating: defaults.rating,
            plot: defaults.plot.clone(),
            studio: defaults.studio.clone(),
            director: defaults.director.clone(),
            maker: defaults.maker.clone(),
            publisher: defaults.publisher.clone(),
            series: defaults.series.clone(),
            runtime: String::new(),
        }
    }

    /// Original title, falling back to the main title when absent.
    pub fn original_title_or_title(&self) -> &str {
        if self.original_title.is_empty() {
            &self.title
        } else {
            &self.original_title
        }
    }
}
