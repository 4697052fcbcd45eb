//! Strategy 4: last-resort parse with an independent DOM parser.
//!
//! roxmltree has its own recovery characteristics, so a document the
//! quick-xml strategies rejected occasionally still parses here. Only
//! the small field subset reachable through a flat descendant walk is
//! recovered.

use std::fs;
use std::path::Path;

use shelfmark_model::NfoRecord;

use super::clean::tidy_text;
use super::{ExtractionStrategy, StrategyError};

#[derive(Debug, Default)]
pub struct DomFallback;

fn first_text(doc: &roxmltree::Document<'_>, tag: &str) -> Option<String> {
    doc.descendants()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(tidy_text)
        .filter(|v| !v.is_empty())
}

impl ExtractionStrategy for DomFallback {
    fn name(&self) -> &'static str {
        "dom-fallback"
    }

    fn attempt(&self, path: &Path, prior: &NfoRecord) -> Result<NfoRecord, StrategyError> {
        let content = fs::read_to_string(path)?;
        let doc = roxmltree::Document::parse(&content)
            .map_err(|e| StrategyError::Parse(e.to_string()))?;

        let mut record = prior.clone();
        if let Some(v) = first_text(&doc, "title") {
            record.title = v;
        }
        if let Some(v) = first_text(&doc, "studio") {
            record.studio = v;
        }
        if let Some(v) = first_text(&doc, "series") {
            record.series = v;
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_model::NfoDefaults;

    #[test]
    fn recovers_reduced_field_set() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dom.nfo");
        std::fs::write(
            &path,
            "<movie><title>T</title><studio>S</studio><series>Line</series><rating>9</rating></movie>",
        )
        .unwrap();

        let prior = NfoRecord::with_defaults(&NfoDefaults::default());
        let record = DomFallback.attempt(&path, &prior).unwrap();
        assert_eq!(record.title, "T");
        assert_eq!(record.studio, "S");
        assert_eq!(record.series, "Line");
        // Rating is outside this strategy's reduced subset.
        assert_eq!(record.rating, 0.0);
    }
}
