//! Code and variant-suffix extraction from filenames.

use regex::{Regex, RegexBuilder};

use super::ScanSettings;
use crate::Result;

/// Role suffix recognized in a filename, e.g. `ABCD-123-trailer.mp4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileVariant {
    Main,
    Trailer,
    Poster,
    Fanart,
    Thumb,
    /// Single-letter alternate cut markers and anything else.
    Other(String),
}

/// Extracts the base item code from filenames using an ordered list of
/// case-insensitive patterns; variant suffixes are ignored so
/// `ABCD-123-F.mp4` and `ABCD-123.nfo` group together.
#[derive(Debug, Clone)]
pub struct CodeExtractor {
    patterns: Vec<Regex>,
    suffix: Regex,
}

impl CodeExtractor {
    pub fn new(code_patterns: &[String]) -> Result<Self> {
        let patterns = code_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(Into::into)
            })
            .collect::<Result<Vec<_>>>()?;
        // Trailing role token between the code and the extension.
        let suffix = RegexBuilder::new(r"[A-Z]+-\d+-([A-Z]+)\.")
            .case_insensitive(true)
            .build()?;
        Ok(Self { patterns, suffix })
    }

    /// First capture group of the first matching pattern, uppercased.
    pub fn extract(&self, filename: &str) -> Option<String> {
        for pattern in &self.patterns {
            if let Some(captures) = pattern.captures(filename)
                && let Some(code) = captures.get(1)
            {
                return Some(code.as_str().to_uppercase());
            }
        }
        None
    }

    /// Classify the variant suffix of a filename, falling back to the
    /// configured filename keywords when no structured suffix matches.
    pub fn variant(&self, filename: &str, settings: &ScanSettings) -> Option<FileVariant> {
        if let Some(captures) = self.suffix.captures(filename) {
            let token = captures.get(1)?.as_str().to_uppercase();
            return Some(match token.as_str() {
                "MAIN" | "VIDEO" => FileVariant::Main,
                "TRAILER" => FileVariant::Trailer,
                "POSTER" => FileVariant::Poster,
                "FANART" => FileVariant::Fanart,
                "THUMB" => FileVariant::Thumb,
                _ => FileVariant::Other(token),
            });
        }

        let lower = filename.to_lowercase();
        let hit = |keywords: &[String]| keywords.iter().any(|k| lower.contains(k));
        if hit(&settings.trailer_keywords) {
            Some(FileVariant::Trailer)
        } else if lower.contains("thumb") {
            Some(FileVariant::Thumb)
        } else if hit(&settings.poster_keywords) {
            Some(FileVariant::Poster)
        } else if hit(&settings.fanart_keywords) {
            Some(FileVariant::Fanart)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> CodeExtractor {
        CodeExtractor::new(&ScanSettings::default().code_patterns).unwrap()
    }

    #[test]
    fn extracts_hyphenated_codes() {
        let ex = extractor();
        assert_eq!(ex.extract("EDRG-009.mp4"), Some("EDRG-009".to_string()));
        assert_eq!(ex.extract("edrg-009.nfo"), Some("EDRG-009".to_string()));
        // Variant suffix is dropped from the grouping key.
        assert_eq!(ex.extract("EDRG-009-F.mp4"), Some("EDRG-009".to_string()));
        assert_eq!(ex.extract("readme.txt"), None);
    }

    #[test]
    fn extracts_compact_and_fc2_codes() {
        let ex = extractor();
        assert_eq!(ex.extract("ABC123.mkv"), Some("ABC123".to_string()));
        assert_eq!(
            ex.extract("FC2-1234567.mp4"),
            Some("FC2-1234567".to_string())
        );
    }

    #[test]
    fn variant_suffix_beats_keywords() {
        let ex = extractor();
        let settings = ScanSettings::default();
        assert_eq!(
            ex.variant("ABCD-123-trailer.mp4", &settings),
            Some(FileVariant::Trailer)
        );
        assert_eq!(
            ex.variant("ABCD-123-F.mp4", &settings),
            Some(FileVariant::Other("F".to_string()))
        );
        assert_eq!(
            ex.variant("ABCD-123-poster.jpg", &settings),
            Some(FileVariant::Poster)
        );
        assert_eq!(ex.variant("ABCD-123.mp4", &settings), None);
    }

    #[test]
    fn keyword_fallback_classifies_images() {
        let ex = extractor();
        let settings = ScanSettings::default();
        assert_eq!(
            ex.variant("ABCD-123 backdrop.jpg", &settings),
            Some(FileVariant::Fanart)
        );
        assert_eq!(
            ex.variant("cover ABCD-123.jpg", &settings),
            Some(FileVariant::Poster)
        );
    }
}
