//! Strategy 2: sanitize common corruption, then reparse strictly.
//!
//! Sidecars produced by scrapers routinely contain raw control bytes
//! and unescaped ampersands that a conforming parser must reject. This
//! strategy rewrites the obvious defects into a scratch file and runs
//! the strict extraction against that. The scratch file is a
//! [`tempfile::NamedTempFile`], so it is unlinked on every exit path
//! when the handle drops.

use std::fs;
use std::io::Write;
use std::path::Path;

use regex::Regex;
use shelfmark_model::NfoRecord;
use tracing::debug;

use super::strict::extract_from_str;
use super::{ExtractionStrategy, StrategyError};

#[derive(Debug)]
pub struct SanitizedXml {
    entity: Regex,
}

impl Default for SanitizedXml {
    fn default() -> Self {
        // Matches every `&`, capturing a following well-formed entity
        // body when there is one. The replacement keeps recognized
        // entities and escapes the rest.
        let entity = Regex::new(r"&(?:(amp|lt|gt|quot|apos|#[0-9]+|#x[0-9a-fA-F]+);)?")
            .expect("static pattern");
        Self { entity }
    }
}

impl SanitizedXml {
    fn sanitize(&self, content: &str) -> String {
        // Control characters in the ranges XML 1.0 forbids.
        let stripped: String = content
            .chars()
            .filter(|c| {
                !matches!(c, '\u{00}'..='\u{08}' | '\u{0b}' | '\u{0c}' | '\u{0e}'..='\u{1f}')
            })
            .collect();
        self.entity
            .replace_all(&stripped, |caps: &regex::Captures<'_>| match caps.get(1) {
                Some(body) => format!("&{};", body.as_str()),
                None => "&amp;".to_string(),
            })
            .into_owned()
    }
}

impl ExtractionStrategy for SanitizedXml {
    fn name(&self) -> &'static str {
        "sanitized-xml"
    }

    fn attempt(&self, path: &Path, prior: &NfoRecord) -> Result<NfoRecord, StrategyError> {
        let raw = fs::read(path)?;
        let sanitized = self.sanitize(&String::from_utf8_lossy(&raw));

        let mut scratch = tempfile::Builder::new()
            .prefix("shelfmark-nfo-")
            .suffix(".xml")
            .tempfile()?;
        scratch.write_all(sanitized.as_bytes())?;
        scratch.flush()?;
        debug!("sanitized copy written to {}", scratch.path().display());

        let reread = fs::read_to_string(scratch.path())?;
        extract_from_str(&reread, prior)
        // `scratch` drops here, removing the file whether or not the
        // reparse succeeded.
    }
}
