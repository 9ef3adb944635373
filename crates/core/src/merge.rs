//! Fragment -> visual line clustering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::OutlineConfig;
use crate::fragment::TextFragment;
use crate::text::clean_text;

/// One visual line assembled from one or more [`TextFragment`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedLine {
    pub text: String,
    /// Largest font size among the contributing fragments.
    pub size: f32,
    /// True if any contributing fragment is bold.
    pub has_bold: bool,
    pub page: u32,
    pub relative_x: f32,
    pub relative_y: f32,
    /// Quantized line origin; the clustering key within the page.
    pub line_y: f32,
}

/// Round `y` to the nearest multiple of `tolerance`.
fn quantize(y: f32, tolerance: f32) -> f32 {
    (y / tolerance).round() * tolerance
}

/// Group fragments into lines.
///
/// Fragments are ordered by page and line origin. A line is anchored at its
/// first fragment and takes every following fragment of the same page whose
/// origin lies less than `line_tolerance` below the anchor. Pages never share
/// a line.
///
/// Within a line, fragments are read left to right. Lines whose text is empty
/// after whitespace normalization are skipped. The output is ordered by page,
/// then by quantized line origin.
pub fn merge_lines(fragments: &[TextFragment], config: &OutlineConfig) -> Vec<MergedLine> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let tolerance = config.line_tolerance;

    let mut ordered: Vec<&TextFragment> = fragments.iter().collect();
    ordered.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(a.line_y.partial_cmp(&b.line_y).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<MergedLine> = Vec::new();
    let mut current: Vec<&TextFragment> = vec![ordered[0]];

    for fragment in ordered.into_iter().skip(1) {
        let anchor = current[0];
        if fragment.page == anchor.page && fragment.line_y - anchor.line_y < tolerance {
            current.push(fragment);
        } else {
            lines.extend(assemble_line(std::mem::take(&mut current), tolerance));
            current.push(fragment);
        }
    }
    lines.extend(assemble_line(current, tolerance));

    lines
}

/// Reduce a cluster of fragments to a single [`MergedLine`].
fn assemble_line(mut group: Vec<&TextFragment>, tolerance: f32) -> Option<MergedLine> {
    let key = quantize(group.first()?.line_y, tolerance);

    group.sort_by(|a, b| a.x().partial_cmp(&b.x()).unwrap_or(Ordering::Equal));

    let joined = group
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let text = clean_text(&joined);
    if text.is_empty() {
        return None;
    }

    let size = group.iter().map(|f| f.size).fold(f32::MIN, f32::max);
    let has_bold = group.iter().any(|f| f.is_bold());
    let first = group[0];

    Some(MergedLine {
        text,
        size,
        has_bold,
        page: first.page,
        relative_x: first.relative_x,
        relative_y: first.relative_y,
        line_y: key,
    })
}
