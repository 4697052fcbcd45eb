//! Line-oriented readback of note frontmatter. Category pages can be
//! rebuilt from notes that were hand-edited after generation, so this
//! has to tolerate both the inline (`Actor: name`) and the nested list
//! (`  - - - name`) shapes the emitter writes.

/// The text between the opening `---` and the closing `---`, or `None`
/// when the content has no frontmatter block.
pub fn frontmatter_block(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let end = rest.find("---")?;
    Some(&rest[..end])
}

fn is_new_key(line: &str) -> bool {
    !line.starts_with('-') && !line.is_empty() && line.contains(':')
}

/// Values of a list-shaped key. Accepts an inline scalar on the key
/// line, `- - -` nested entries, and for single-nesting keys `- -`
/// entries.
pub fn extract_list(frontmatter: &str, key: &str) -> Vec<String> {
    let prefix = format!("{key}:");
    let mut values = Vec::new();
    let mut in_section = false;

    for line in frontmatter.lines() {
        let line = line.trim();
        if let Some(inline) = line.strip_prefix(&prefix) {
            in_section = true;
            let inline = inline.trim();
            if !inline.is_empty() && inline != "-" && inline != "[]" {
                values.push(inline.to_string());
            }
        } else if in_section && (line.starts_with("- - -") || line.starts_with("- -")) {
            let value = line
                .trim_start_matches("- - -")
                .trim_start_matches("- -")
                .trim();
            if !value.is_empty() && value != "[]" {
                values.push(value.to_string());
            }
        } else if in_section && is_new_key(line) {
            in_section = false;
        }
    }

    values
}

/// Value of a scalar key, empty string when absent.
pub fn extract_scalar(frontmatter: &str, key: &str) -> String {
    let prefix = format!("{key}:");
    frontmatter
        .lines()
        .find_map(|line| line.trim().strip_prefix(&prefix))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// `VideoRank` readback, reformatted to one decimal when numeric so
/// `7` and `7.0` group onto the same rank page.
pub fn extract_rank(frontmatter: &str) -> String {
    let raw = extract_scalar(frontmatter, "VideoRank");
    match raw.parse::<f32>() {
        Ok(v) => format!("{:.1}", (v * 10.0).round() / 10.0),
        Err(_) => raw,
    }
}
