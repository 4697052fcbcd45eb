//! Tolerant recovery of structured metadata from sidecar files.
//!
//! Sidecars are nominally XML but arrive with invalid control bytes,
//! unescaped entities, and truncated tags. [`NfoParser::parse`] tries a
//! fixed chain of extraction strategies and accepts the first result
//! that carries meaningful data. Nothing here ever raises past the
//! parse boundary: the worst case is a record full of configured
//! defaults, which callers treat as "no metadata found".

pub mod clean;
mod dom;
mod regex_scan;
mod sanitize;
mod strict;

pub use dom::DomFallback;
pub use regex_scan::RegexScan;
pub use sanitize::SanitizedXml;
pub use strict::StrictXml;

use std::path::Path;

use shelfmark_model::{NfoDefaults, NfoRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure internal to one extraction attempt. Never escapes the
/// parser; it only moves the chain to the next strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("structural parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One attempt at pulling a record out of a sidecar file.
///
/// A strategy never mutates `prior`: it clones it, overlays whatever it
/// managed to extract, and returns the candidate. The orchestrator
/// decides whether the candidate is good enough to commit.
pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;
    fn attempt(&self, path: &Path, prior: &NfoRecord) -> Result<NfoRecord, StrategyError>;
}

/// A strategy's result is worth accepting when it recovered at least
/// one field beyond the configured defaults.
pub fn is_meaningful(record: &NfoRecord, defaults: &NfoDefaults) -> bool {
    !record.title.trim().is_empty()
        || record.studio.trim() != defaults.studio
        || record.director.trim() != defaults.director
        || record.plot.trim() != defaults.plot
        || record.rating != defaults.rating
        || !record.actors.is_empty()
        || !record.genre.is_empty()
        || !record.release_date.trim().is_empty()
}

pub struct NfoParser {
    defaults: NfoDefaults,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl std::fmt::Debug for NfoParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NfoParser")
            .field("defaults", &self.defaults)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl NfoParser {
    pub fn new(defaults: NfoDefaults) -> Self {
        Self {
            defaults,
            strategies: vec![
                Box::new(StrictXml),
                Box::new(SanitizedXml::default()),
                Box::new(RegexScan::default()),
                Box::new(DomFallback),
            ],
        }
    }

    pub fn defaults(&self) -> &NfoDefaults {
        &self.defaults
    }

    /// Best-effort parse. Total over arbitrary input: missing files,
    /// binary garbage, and truncated markup all come back as a record,
    /// at minimum one full of defaults.
    pub fn parse(&self, path: &Path) -> NfoRecord {
        self.parse_with_trace(path).0
    }

    /// Like [`parse`](Self::parse), additionally reporting which
    /// strategy was accepted (`None` when every attempt came up empty).
    pub fn parse_with_trace(&self, path: &Path) -> (NfoRecord, Option<&'static str>) {
        debug!("parsing sidecar {}", path.display());
        let baseline = NfoRecord::with_defaults(&self.defaults);

        for strategy in &self.strategies {
            match strategy.attempt(path, &baseline) {
                Ok(candidate) if is_meaningful(&candidate, &self.defaults) => {
                    info!(
                        strategy = strategy.name(),
                        "accepted sidecar parse for {}",
                        path.display()
                    );
                    return (candidate, Some(strategy.name()));
                }
                Ok(_) => {
                    debug!(
                        strategy = strategy.name(),
                        "no meaningful data in {}",
                        path.display()
                    );
                }
                Err(err) => {
                    warn!(
                        strategy = strategy.name(),
                        "attempt failed for {}: {err}",
                        path.display()
                    );
                }
            }
        }

        warn!("no strategy recovered metadata from {}", path.display());
        (baseline, None)
    }
}
