//! Typed configuration for the shelfmark pipeline.
//!
//! Every section carries `#[serde(default)]` so a partial file loads;
//! a missing file is not an error, an unreadable or invalid one is.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use shelfmark_core::{RenderSettings, ScanSettings};
use shelfmark_model::NfoDefaults;
use tracing::warn;

/// Source that produced the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    Explicit(PathBuf),
    EnvPath(PathBuf),
    File(PathBuf),
}

/// Sidecar parsing defaults, nested so the file reads
/// `[nfo.defaults]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NfoSection {
    pub defaults: NfoDefaults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanSettings,
    pub nfo: NfoSection,
    pub render: RenderSettings,
}

impl Config {
    /// Load configuration. Evaluation order:
    /// 1) the explicitly given path (must exist),
    /// 2) `$SHELFMARK_CONFIG_PATH`,
    /// 3) `shelfmark.toml` / `shelfmark.json` in the working directory,
    /// 4) built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Ok(path_str) = env::var("SHELFMARK_CONFIG_PATH")
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)
                .with_context(|| format!("invalid config {}", path.display())),
            Some("toml") | Some("tml") => toml::from_str(&contents)
                .map_err(|err| anyhow!("invalid config {}: {}", path.display(), err)),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "shelfmark.toml",
            "shelfmark.json",
            "config/shelfmark.toml",
            "config/shelfmark.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }

    /// Sanity-check the loaded values. Problems are warnings, not
    /// errors; the pipeline still runs with whatever was given.
    pub fn validate(&self) {
        if self.scan.source_directories.is_empty() {
            warn!("no source directories configured; the scan will find nothing");
        }
        for dir in &self.scan.source_directories {
            if !dir.exists() {
                warn!("source directory {} does not exist", dir.display());
            }
        }
        if self.scan.code_patterns.is_empty() {
            warn!("no code patterns configured; no filenames will match");
        }
        if self.render.max_keywords == 0 {
            warn!("render.max_keywords is 0; keyword frontmatter will always be empty");
        }
    }
}
