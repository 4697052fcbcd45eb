//! Strategy 1: strict structured parse via quick-xml's serde support.
//!
//! The document model below is deliberately tolerant of attributes and
//! unknown elements, but any structural defect (mismatched tags, bad
//! entities, truncation) is a hard error that moves the chain on.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use shelfmark_model::NfoRecord;

use super::clean::{parse_rating, tidy_text};
use super::{ExtractionStrategy, StrategyError};

/// Text content of a simple element, ignoring its attributes.
#[derive(Debug, Default, Deserialize)]
pub(super) struct TextNode {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ActorNode {
    name: Option<TextNode>,
}

/// Known fields of a sidecar document, keyed by tag name. The root
/// element's own name (`movie`, `tvshow`, ...) is irrelevant.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct NfoDocument {
    title: Option<TextNode>,
    originaltitle: Option<TextNode>,
    rating: Option<TextNode>,
    studio: Option<TextNode>,
    director: Option<TextNode>,
    maker: Option<TextNode>,
    publisher: Option<TextNode>,
    plot: Option<TextNode>,
    series: Option<TextNode>,
    runtime: Option<TextNode>,
    releasedate: Option<TextNode>,
    premiered: Option<TextNode>,
    release: Option<TextNode>,
    genre: Vec<TextNode>,
    actor: Vec<ActorNode>,
}

fn text_of(node: Option<TextNode>) -> Option<String> {
    node.and_then(|n| n.value)
        .map(|v| tidy_text(&v))
        .filter(|v| !v.is_empty())
}

/// Overlay a parsed document onto the prior record. Scalar fields are
/// only overwritten when non-empty; the list fields are replaced with
/// whatever the document holds, in document order.
pub(super) fn apply_document(doc: NfoDocument, prior: &NfoRecord) -> NfoRecord {
    let mut record = prior.clone();

    if let Some(v) = text_of(doc.title) {
        record.title = v;
    }
    if let Some(v) = text_of(doc.originaltitle) {
        record.original_title = v;
    }
    if let Some(v) = text_of(doc.studio) {
        record.studio = v;
    }
    if let Some(v) = text_of(doc.director) {
        record.director = v;
    }
    if let Some(v) = text_of(doc.maker) {
        record.maker = v;
    }
    if let Some(v) = text_of(doc.publisher) {
        record.publisher = v;
    }
    if let Some(v) = text_of(doc.plot) {
        record.plot = v;
    }
    if let Some(v) = text_of(doc.series) {
        record.series = v;
    }
    if let Some(v) = text_of(doc.runtime) {
        record.runtime = v;
    }
    // Coercion failure keeps the prior rating; it is not a strategy
    // failure.
    if let Some(raw) = text_of(doc.rating)
        && let Some(rating) = parse_rating(&raw)
    {
        record.rating = rating;
    }
    // First non-empty of the recognized date tags wins.
    if let Some(v) = text_of(doc.releasedate)
        .or_else(|| text_of(doc.premiered))
        .or_else(|| text_of(doc.release))
    {
        record.release_date = v;
    }

    record.genre = doc
        .genre
        .into_iter()
        .filter_map(|n| text_of(Some(n)))
        .collect();
    // Bare <actor/> without a <name> child is skipped.
    record.actors = doc
        .actor
        .into_iter()
        .filter_map(|a| text_of(a.name))
        .collect();

    record
}

/// Parse a document string strictly and overlay it onto `prior`.
/// Shared with the sanitize-and-reparse strategy.
pub(super) fn extract_from_str(
    content: &str,
    prior: &NfoRecord,
) -> Result<NfoRecord, StrategyError> {
    let doc: NfoDocument =
        quick_xml::de::from_str(content).map_err(|e| StrategyError::Parse(e.to_string()))?;
    Ok(apply_document(doc, prior))
}

#[derive(Debug, Default)]
pub struct StrictXml;

impl ExtractionStrategy for StrictXml {
    fn name(&self) -> &'static str {
        "strict-xml"
    }

    fn attempt(&self, path: &Path, prior: &NfoRecord) -> Result<NfoRecord, StrategyError> {
        let content = fs::read_to_string(path)?;
        extract_from_str(&content, prior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_model::NfoDefaults;

    fn prior() -> NfoRecord {
        NfoRecord::with_defaults(&NfoDefaults::default())
    }

    #[test]
    fn extracts_known_fields() {
        let doc = r#"<movie>
            <title>Sample &amp; Title</title>
            <originaltitle>Orig</originaltitle>
            <rating>6.55</rating>
            <studio>Acme</studio>
            <premiered>2024-03-01</premiered>
            <genre>Drama</genre>
            <genre>Action</genre>
            <actor><name>Jane Doe</name></actor>
            <actor/>
            <actor><name>John Roe</name></actor>
        </movie>"#;

        let record = extract_from_str(doc, &prior()).unwrap();
        assert_eq!(record.title, "Sample & Title");
        assert_eq!(record.original_title, "Orig");
        assert_eq!(record.rating, 6.6);
        assert_eq!(record.studio, "Acme");
        assert_eq!(record.release_date, "2024-03-01");
        assert_eq!(record.genre, vec!["Drama", "Action"]);
        assert_eq!(record.actors, vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn releasedate_outranks_premiered() {
        let doc = r#"<movie>
            <releasedate>2024-01-01</releasedate>
            <premiered>2023-01-01</premiered>
        </movie>"#;
        let record = extract_from_str(doc, &prior()).unwrap();
        assert_eq!(record.release_date, "2024-01-01");
    }

    #[test]
    fn bad_rating_keeps_prior_value() {
        let doc = "<movie><title>T</title><rating>n/a</rating></movie>";
        let record = extract_from_str(doc, &prior()).unwrap();
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.title, "T");
    }

    #[test]
    fn bare_ampersand_is_a_parse_error() {
        let doc = "<movie><title>Tom & Jerry</title></movie>";
        assert!(matches!(
            extract_from_str(doc, &prior()),
            Err(StrategyError::Parse(_))
        ));
    }

    #[test]
    fn truncated_document_is_a_parse_error() {
        let doc = "<movie><title>Half";
        assert!(extract_from_str(doc, &prior()).is_err());
    }

    #[test]
    fn unknown_tags_and_attributes_are_ignored() {
        let doc = r#"<movie>
            <title aspect="main">T</title>
            <mysterytag>whatever</mysterytag>
        </movie>"#;
        let record = extract_from_str(doc, &prior()).unwrap();
        assert_eq!(record.title, "T");
    }
}
