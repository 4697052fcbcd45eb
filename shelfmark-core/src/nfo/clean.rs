//! Text normalization applied to every extracted field.

/// Strip control characters, collapse whitespace runs, and trim.
///
/// Used for text that has already had its character entities resolved
/// (by the XML parser) so it is never decoded a second time.
pub fn tidy_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !c.is_control()).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode XML/HTML character entities once, then [`tidy_text`].
///
/// Used for raw text pulled straight out of the file (the regex
/// strategy). Undecodable input keeps its literal text rather than
/// failing the extraction.
pub fn clean_text(raw: &str) -> String {
    let decoded = match quick_xml::escape::unescape(raw) {
        Ok(cow) => cow.into_owned(),
        Err(_) => raw.to_string(),
    };
    tidy_text(&decoded)
}

/// Round a rating to one decimal place, half away from zero.
pub fn round_rating(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Parse and normalize a rating; `None` when the text is not numeric.
pub fn parse_rating(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().map(round_rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entities_exactly_once() {
        assert_eq!(clean_text("Sample &amp; Title"), "Sample & Title");
        // Already-decoded ampersands survive untouched.
        assert_eq!(clean_text("A & B"), "A & B");
        // A double-escaped entity yields the single-escaped form.
        assert_eq!(clean_text("&amp;amp;"), "&amp;");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(tidy_text("Ti\u{0}tle"), "Title");
        assert_eq!(tidy_text("A\u{1b}B\u{7f}C"), "ABC");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(tidy_text("  a \t b\n\nc  "), "a b c");
    }

    #[test]
    fn rating_rounds_half_away_from_zero() {
        assert_eq!(parse_rating("7"), Some(7.0));
        assert_eq!(parse_rating("8.25"), Some(8.3));
        assert_eq!(parse_rating("6.44"), Some(6.4));
        assert_eq!(parse_rating("not-a-number"), None);
    }
}
