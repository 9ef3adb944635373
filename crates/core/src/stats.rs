//! Document-wide font size statistics.

use serde::{Deserialize, Serialize};

use crate::config::OutlineConfig;
use crate::merge::MergedLine;

/// Body size and the sizes likely to mark heading tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStatistics {
    /// The most frequent line size.
    pub base_size: f32,
    /// Distinct sizes above `base_size`, rare enough to be headings, largest first.
    pub significant_sizes: Vec<f32>,
}

impl FontStatistics {
    /// Statistics for a document without any usable size.
    pub fn fallback(config: &OutlineConfig) -> Self {
        FontStatistics {
            base_size: config.default_base_size,
            significant_sizes: Vec::new(),
        }
    }

    pub fn is_significant(&self, size: f32) -> bool {
        self.significant_sizes.contains(&size)
    }

    /// Position of `size` among the significant sizes (0 = largest).
    pub fn rank(&self, size: f32) -> Option<usize> {
        self.significant_sizes.iter().position(|&s| s == size)
    }
}

/// Count line sizes in first-encounter order.
///
/// Non-positive and NaN sizes are skipped.
fn size_histogram(lines: &[MergedLine]) -> Vec<(f32, usize)> {
    let mut histogram: Vec<(f32, usize)> = Vec::new();
    for line in lines {
        if line.size.is_nan() || line.size <= 0.0 {
            continue;
        }
        match histogram.iter_mut().find(|(size, _)| *size == line.size) {
            Some((_, count)) => *count += 1,
            None => histogram.push((line.size, 1)),
        }
    }
    histogram
}

/// Derive the body size and significant heading sizes from merged lines.
///
/// The body size is the most frequent size; on a tie the size seen first in
/// document order wins. A size is significant when it is larger than the body
/// size and appears in fewer than `frequency_cap` of all lines. At most
/// `max_significant_sizes` are kept, largest first.
pub fn analyze(lines: &[MergedLine], config: &OutlineConfig) -> FontStatistics {
    let histogram = size_histogram(lines);

    let mut base: Option<(f32, usize)> = None;
    for &(size, count) in &histogram {
        if base.map_or(true, |(_, best)| count > best) {
            base = Some((size, count));
        }
    }
    let Some((base_size, _)) = base else {
        log::debug!(
            "no usable font sizes, falling back to base size {}",
            config.default_base_size
        );
        return FontStatistics::fallback(config);
    };

    let limit = lines.len() as f32 * config.frequency_cap;
    let mut significant_sizes: Vec<f32> = histogram
        .iter()
        .filter(|&&(size, count)| size > base_size && (count as f32) < limit)
        .map(|&(size, _)| size)
        .collect();
    significant_sizes.sort_by(|a, b| b.total_cmp(a));
    significant_sizes.dedup();
    significant_sizes.truncate(config.max_significant_sizes);

    log::debug!(
        "base font size: {}, significant sizes: {:?}",
        base_size,
        significant_sizes
    );

    FontStatistics {
        base_size,
        significant_sizes,
    }
}
