//! Heading candidate rule cascade.
//!
//! The rules are recall-biased: false positives are expected and trimmed by
//! deduplication later on, false negatives cannot be recovered.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::OutlineConfig;
use crate::merge::MergedLine;
use crate::stats::FontStatistics;
use crate::text::{char_len, clean_text, is_numeric, is_upper_case};

static NUMBERED_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]").unwrap());

/// The rule that made a line a heading candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    SignificantSize,
    BoldAtBodySize,
    UpperCase,
    NumberedList,
    TopOfPage,
}

/// Why a line was ruled out before any acceptance rule ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rejection {
    TooShort,
    Numeric,
}

/// Outcome of classifying one merged line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "kebab-case")]
pub enum Classification {
    Rejected(Rejection),
    Accepted(Rule),
    NotHeading,
}

impl Classification {
    pub fn is_candidate(&self) -> bool {
        matches!(self, Classification::Accepted(_))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Rejected(Rejection::TooShort) => write!(f, "rejected: too short"),
            Classification::Rejected(Rejection::Numeric) => write!(f, "rejected: numeric"),
            Classification::Accepted(Rule::SignificantSize) => write!(f, "significant size"),
            Classification::Accepted(Rule::BoldAtBodySize) => write!(f, "bold"),
            Classification::Accepted(Rule::UpperCase) => write!(f, "upper case"),
            Classification::Accepted(Rule::NumberedList) => write!(f, "numbered"),
            Classification::Accepted(Rule::TopOfPage) => write!(f, "top of page"),
            Classification::NotHeading => write!(f, "body"),
        }
    }
}

/// Run the rule cascade on one line. The first rule that decides wins.
pub fn classify(
    line: &MergedLine,
    stats: &FontStatistics,
    config: &OutlineConfig,
) -> Classification {
    let text = clean_text(&line.text);
    let len = char_len(&text);

    if len < config.min_candidate_chars {
        return Classification::Rejected(Rejection::TooShort);
    }
    if is_numeric(&text) {
        return Classification::Rejected(Rejection::Numeric);
    }

    if stats.is_significant(line.size) {
        return Classification::Accepted(Rule::SignificantSize);
    }
    if line.has_bold && line.size >= stats.base_size {
        return Classification::Accepted(Rule::BoldAtBodySize);
    }
    if is_upper_case(&text) && len >= config.min_upper_case_chars {
        return Classification::Accepted(Rule::UpperCase);
    }
    if NUMBERED_PREFIX.is_match(&text) {
        return Classification::Accepted(Rule::NumberedList);
    }
    if line.relative_y < config.heading_top_fraction {
        return Classification::Accepted(Rule::TopOfPage);
    }

    Classification::NotHeading
}

/// Boolean view of [`classify`].
pub fn is_heading_candidate(
    line: &MergedLine,
    stats: &FontStatistics,
    config: &OutlineConfig,
) -> bool {
    classify(line, stats, config).is_candidate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> FontStatistics {
        FontStatistics {
            base_size: 10.0,
            significant_sizes: vec![24.0, 18.0],
        }
    }

    fn body_line(text: &str) -> MergedLine {
        MergedLine {
            text: text.to_string(),
            size: 10.0,
            has_bold: false,
            page: 1,
            relative_x: 0.1,
            relative_y: 0.5,
            line_y: 400.0,
        }
    }

    fn run(line: &MergedLine) -> Classification {
        classify(line, &stats(), &OutlineConfig::default())
    }

    #[test]
    fn test_rejects_short_text() {
        let mut line = body_line("Hi");
        line.size = 24.0;
        assert_eq!(
            run(&line),
            Classification::Rejected(Rejection::TooShort)
        );
    }

    #[test]
    fn test_rejects_numeric_text() {
        let mut line = body_line("2024");
        line.size = 24.0;
        assert_eq!(run(&line), Classification::Rejected(Rejection::Numeric));
    }

    #[test]
    fn test_fraction_symbols_are_not_numeric() {
        let mut line = body_line("½½½");
        line.size = 24.0;
        assert_eq!(run(&line), Classification::Accepted(Rule::SignificantSize));
    }

    #[test]
    fn test_accepts_significant_size() {
        let mut line = body_line("Overview");
        line.size = 18.0;
        assert_eq!(run(&line), Classification::Accepted(Rule::SignificantSize));
    }

    #[test]
    fn test_accepts_bold_at_body_size() {
        let mut line = body_line("Background");
        line.has_bold = true;
        assert_eq!(run(&line), Classification::Accepted(Rule::BoldAtBodySize));
    }

    #[test]
    fn test_bold_below_body_size_is_not_enough() {
        let mut line = body_line("footnote text");
        line.has_bold = true;
        line.size = 8.0;
        assert_eq!(run(&line), Classification::NotHeading);
    }

    #[test]
    fn test_accepts_upper_case() {
        assert_eq!(
            run(&body_line("REFERENCES")),
            Classification::Accepted(Rule::UpperCase)
        );
        // Six characters is not longer than six.
        assert_eq!(run(&body_line("ABSTRA")), Classification::NotHeading);
    }

    #[test]
    fn test_accepts_numbered_prefix_at_body_size() {
        assert_eq!(
            run(&body_line("1. Introduction")),
            Classification::Accepted(Rule::NumberedList)
        );
        assert_eq!(
            run(&body_line("12) Appendix")),
            Classification::Accepted(Rule::NumberedList)
        );
        assert_eq!(run(&body_line("Version 1. notes")), Classification::NotHeading);
    }

    #[test]
    fn test_accepts_top_of_page() {
        let mut line = body_line("Running header");
        line.relative_y = 0.05;
        assert_eq!(run(&line), Classification::Accepted(Rule::TopOfPage));
    }

    #[test]
    fn test_plain_body_text_is_not_a_heading() {
        let line = body_line("This is an ordinary sentence.");
        assert_eq!(run(&line), Classification::NotHeading);
        assert!(!is_heading_candidate(
            &line,
            &stats(),
            &OutlineConfig::default()
        ));
    }

    #[test]
    fn test_cleans_text_before_length_check() {
        assert_eq!(
            run(&body_line("  a   ")),
            Classification::Rejected(Rejection::TooShort)
        );
    }

    #[test]
    fn test_classification_serializes_with_rule() {
        let json = serde_json::to_string(&Classification::Accepted(Rule::NumberedList)).unwrap();
        assert_eq!(json, r#"{"outcome":"accepted","reason":"numbered-list"}"#);
    }
}
