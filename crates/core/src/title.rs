//! Document title selection.

use crate::config::OutlineConfig;
use crate::merge::MergedLine;
use crate::text::{char_len, clean_text, title_case};

/// Pick the most prominent early line of the first page.
///
/// Only page-1 lines starting above `title_top_fraction` of the page and at
/// least `min_title_chars` long qualify. The largest size wins; between equal
/// sizes the line met first wins.
pub fn select_title(lines: &[MergedLine], config: &OutlineConfig) -> Option<String> {
    let mut best: Option<(f32, String)> = None;

    for line in lines.iter().filter(|l| l.page == 1) {
        if line.relative_y >= config.title_top_fraction {
            continue;
        }
        let text = clean_text(&line.text);
        if char_len(&text) < config.min_title_chars {
            continue;
        }
        if best.as_ref().map_or(true, |(size, _)| line.size > *size) {
            best = Some((line.size, text));
        }
    }

    best.map(|(_, text)| text)
}

/// Title derived from a document identifier: underscores become spaces and
/// every word is capitalized.
pub fn fallback_title(identifier: &str) -> String {
    let title = title_case(identifier.replace('_', " ").trim());
    if title.is_empty() {
        "Untitled".to_string()
    } else {
        title
    }
}
