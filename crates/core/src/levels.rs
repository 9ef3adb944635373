//! Heading level assignment and deduplication.

use std::collections::HashSet;

use crate::config::OutlineConfig;
use crate::merge::MergedLine;
use crate::outline::{Heading, HeadingLevel};
use crate::stats::FontStatistics;
use crate::text::{char_len, clean_text};

/// Map a candidate size to its level: the largest significant size is H1,
/// the next H2, the third H3. Sizes outside the significant list are H3.
pub fn level_for_size(size: f32, stats: &FontStatistics) -> HeadingLevel {
    stats
        .rank(size)
        .map(HeadingLevel::from_rank)
        .unwrap_or(HeadingLevel::H3)
}

/// Turn candidates into headings, keeping their document order.
pub fn assign_levels(candidates: &[&MergedLine], stats: &FontStatistics) -> Vec<Heading> {
    candidates
        .iter()
        .map(|line| Heading {
            level: level_for_size(line.size, stats),
            text: clean_text(&line.text),
            page: line.page,
        })
        .collect()
}

/// Keep the first occurrence of every `(level, text)` pair and drop headings
/// shorter than `min_heading_chars`. Order of first occurrence is preserved.
pub fn dedup_headings(headings: Vec<Heading>, config: &OutlineConfig) -> Vec<Heading> {
    let mut seen: HashSet<(HeadingLevel, String)> = HashSet::new();
    headings
        .into_iter()
        .filter(|h| char_len(&h.text) >= config.min_heading_chars)
        .filter(|h| seen.insert((h.level, h.text.clone())))
        .collect()
}
