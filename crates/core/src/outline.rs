use std::fmt;

use serde::{Deserialize, Serialize};

/// Heading tier of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Level for the n-th significant size (0 = largest). Anything past the
    /// third tier is folded into H3.
    pub fn from_rank(rank: usize) -> Self {
        match rank {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.as_u8())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// Title plus ordered heading list. One per input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub outline: Vec<Heading>,
}

impl Outline {
    /// The outline recorded for a document that could not be processed.
    pub fn degraded(identifier: &str) -> Self {
        Outline {
            title: identifier.to_string(),
            outline: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_rank() {
        assert_eq!(HeadingLevel::from_rank(0), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_rank(1), HeadingLevel::H2);
        assert_eq!(HeadingLevel::from_rank(2), HeadingLevel::H3);
        assert_eq!(HeadingLevel::from_rank(7), HeadingLevel::H3);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(HeadingLevel::H2.to_string(), "H2");
    }

    #[test]
    fn test_outline_record_shape() {
        let outline = Outline {
            title: "Report".to_string(),
            outline: vec![Heading {
                level: HeadingLevel::H1,
                text: "Overview".to_string(),
                page: 1,
            }],
        };
        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Report",
                "outline": [{"level": "H1", "text": "Overview", "page": 1}]
            })
        );
    }

    #[test]
    fn test_degraded_outline() {
        let outline = Outline::degraded("broken_file");
        assert_eq!(outline.title, "broken_file");
        assert!(outline.outline.is_empty());
    }
}
