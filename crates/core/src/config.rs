use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Thresholds used by every stage of the outline pipeline.
///
/// All fields have defaults, so a partial TOML table only overrides what it
/// names. Call [`OutlineConfig::validate`] after deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutlineConfig {
    /// Fragments whose line origins are closer than this share a line.
    pub line_tolerance: f32,
    /// Maximum number of heading tiers derived from font sizes.
    pub max_significant_sizes: usize,
    /// A size is significant only if it appears in fewer than this share of lines.
    pub frequency_cap: f32,
    /// Body size used when a document has no usable font sizes.
    pub default_base_size: f32,
    /// Lines shorter than this are never candidates.
    pub min_candidate_chars: usize,
    /// Minimum length for the all-caps rule.
    pub min_upper_case_chars: usize,
    /// Lines starting above this fraction of the page height are candidates.
    pub heading_top_fraction: f32,
    /// Headings shorter than this are dropped after level assignment.
    pub min_heading_chars: usize,
    /// Minimum length for a title candidate.
    pub min_title_chars: usize,
    /// Title candidates must start above this fraction of the first page.
    pub title_top_fraction: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        OutlineConfig {
            line_tolerance: 3.0,
            max_significant_sizes: 3,
            frequency_cap: 0.4,
            default_base_size: 12.0,
            min_candidate_chars: 3,
            min_upper_case_chars: 7,
            heading_top_fraction: 0.2,
            min_heading_chars: 4,
            min_title_chars: 11,
            title_top_fraction: 0.3,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("line_tolerance must be a positive number, got {0}")]
    Tolerance(f32),
    #[error("max_significant_sizes must be between 1 and 3, got {0}")]
    SignificantSizes(usize),
    #[error("default_base_size must be a positive number, got {0}")]
    BaseSize(f32),
    #[error("{name} must be within (0, 1], got {value}")]
    Fraction { name: &'static str, value: f32 },
}

impl OutlineConfig {
    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.line_tolerance > 0.0 && self.line_tolerance.is_finite()) {
            return Err(ConfigError::Tolerance(self.line_tolerance));
        }
        if !(1..=3).contains(&self.max_significant_sizes) {
            return Err(ConfigError::SignificantSizes(self.max_significant_sizes));
        }
        if !(self.default_base_size > 0.0 && self.default_base_size.is_finite()) {
            return Err(ConfigError::BaseSize(self.default_base_size));
        }

        let fractions = [
            ("frequency_cap", self.frequency_cap),
            ("heading_top_fraction", self.heading_top_fraction),
            ("title_top_fraction", self.title_top_fraction),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Fraction { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(OutlineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_tolerance() {
        let config = OutlineConfig {
            line_tolerance: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Tolerance(0.0)));
    }

    #[test]
    fn test_rejects_too_many_tiers() {
        let config = OutlineConfig {
            max_significant_sizes: 4,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SignificantSizes(4)));
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        let config = OutlineConfig {
            title_top_fraction: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Fraction {
                name: "title_top_fraction",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: OutlineConfig = toml::from_str("line_tolerance = 5.0").unwrap();
        assert_eq!(config.line_tolerance, 5.0);
        assert_eq!(config.max_significant_sizes, 3);
        assert_eq!(config.title_top_fraction, 0.3);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<OutlineConfig, _> = toml::from_str("tolerance = 5.0");
        assert!(result.is_err());
    }
}
