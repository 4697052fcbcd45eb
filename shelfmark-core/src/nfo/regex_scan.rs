//! Strategy 3: structure-blind line extraction.
//!
//! Treats the file as plain text and pulls each field with an
//! independent `<tag>...</tag>` regex, case-insensitive and spanning
//! newlines. It cannot fail structurally; an unreadable file is simply
//! empty content, so the prior record comes back unchanged.

use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use shelfmark_model::NfoRecord;

use super::clean::{clean_text, parse_rating};
use super::{ExtractionStrategy, StrategyError};

fn tag_pattern(tag: &str) -> Regex {
    RegexBuilder::new(&format!(r"<{tag}[^>]*>(.*?)</{tag}>"))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("static tag pattern")
}

#[derive(Debug)]
pub struct RegexScan {
    title: Regex,
    originaltitle: Regex,
    studio: Regex,
    director: Regex,
    maker: Regex,
    publisher: Regex,
    plot: Regex,
    series: Regex,
    runtime: Regex,
    rating: Regex,
    dates: [Regex; 3],
    genre: Regex,
    actor: Regex,
}

impl Default for RegexScan {
    fn default() -> Self {
        Self {
            title: tag_pattern("title"),
            originaltitle: tag_pattern("originaltitle"),
            studio: tag_pattern("studio"),
            director: tag_pattern("director"),
            maker: tag_pattern("maker"),
            publisher: tag_pattern("publisher"),
            plot: tag_pattern("plot"),
            series: tag_pattern("series"),
            runtime: tag_pattern("runtime"),
            rating: tag_pattern("rating"),
            dates: [
                tag_pattern("releasedate"),
                tag_pattern("premiered"),
                tag_pattern("release"),
            ],
            genre: tag_pattern("genre"),
            actor: RegexBuilder::new(r"<actor[^>]*>.*?<name[^>]*>(.*?)</name>.*?</actor>")
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()
                .expect("static actor pattern"),
        }
    }
}

impl RegexScan {
    fn field(&self, pattern: &Regex, content: &str) -> Option<String> {
        pattern
            .captures(content)
            .and_then(|c| c.get(1))
            .map(|m| clean_text(m.as_str()))
            .filter(|v| !v.is_empty())
    }
}

impl ExtractionStrategy for RegexScan {
    fn name(&self) -> &'static str {
        "regex-scan"
    }

    fn attempt(&self, path: &Path, prior: &NfoRecord) -> Result<NfoRecord, StrategyError> {
        // Read failure degrades to empty content; this strategy always
        // produces a record.
        let raw = fs::read(path).unwrap_or_default();
        let content = String::from_utf8_lossy(&raw);
        let mut record = prior.clone();

        if let Some(v) = self.field(&self.title, &content) {
            record.title = v;
        }
        if let Some(v) = self.field(&self.originaltitle, &content) {
            record.original_title = v;
        }
        if let Some(v) = self.field(&self.studio, &content) {
            record.studio = v;
        }
        if let Some(v) = self.field(&self.director, &content) {
            record.director = v;
        }
        if let Some(v) = self.field(&self.maker, &content) {
            record.maker = v;
        }
        if let Some(v) = self.field(&self.publisher, &content) {
            record.publisher = v;
        }
        if let Some(v) = self.field(&self.plot, &content) {
            record.plot = v;
        }
        if let Some(v) = self.field(&self.series, &content) {
            record.series = v;
        }
        if let Some(v) = self.field(&self.runtime, &content) {
            record.runtime = v;
        }
        if let Some(raw) = self.field(&self.rating, &content)
            && let Some(rating) = parse_rating(&raw)
        {
            record.rating = rating;
        }
        if let Some(v) = self
            .dates
            .iter()
            .find_map(|pattern| self.field(pattern, &content))
        {
            record.release_date = v;
        }

        record.genre = self
            .genre
            .captures_iter(&content)
            .filter_map(|c| c.get(1))
            .map(|m| clean_text(m.as_str()))
            .filter(|v| !v.is_empty())
            .collect();
        record.actors = self
            .actor
            .captures_iter(&content)
            .filter_map(|c| c.get(1))
            .map(|m| clean_text(m.as_str()))
            .filter(|v| !v.is_empty())
            .collect();

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_model::NfoDefaults;

    fn scan(content: &str) -> NfoRecord {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scan.nfo");
        std::fs::write(&path, content).unwrap();
        let prior = NfoRecord::with_defaults(&NfoDefaults::default());
        RegexScan::default().attempt(&path, &prior).unwrap()
    }

    #[test]
    fn extracts_fields_from_hopelessly_broken_markup() {
        // Mismatched root and a stray open tag; the tree parsers choke
        // on this, the line scan does not.
        let record = scan(
            "<movie><title>Broken &amp; Fine</title>\n<genre>Drama</genre><genre>Action</genre>\n\
             <actor><name>Jane Doe</name><role>x</role></actor>\n<rating>8.25</rating></tvshow>\n<oops>",
        );
        assert_eq!(record.title, "Broken & Fine");
        assert_eq!(record.genre, vec!["Drama", "Action"]);
        assert_eq!(record.actors, vec!["Jane Doe"]);
        assert_eq!(record.rating, 8.3);
    }

    #[test]
    fn unreadable_file_returns_prior_record() {
        let prior = NfoRecord::with_defaults(&NfoDefaults::default());
        let record = RegexScan::default()
            .attempt(Path::new("/nonexistent/shelfmark.nfo"), &prior)
            .unwrap();
        assert_eq!(record, prior);
    }

    #[test]
    fn actor_without_name_is_skipped() {
        let record = scan("<movie><actor>anon</actor><actor><name>Ada</name></actor></movie>");
        assert_eq!(record.actors, vec!["Ada"]);
    }
}
