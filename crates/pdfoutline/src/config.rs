use std::path::{Path, PathBuf};

use pdfoutline_core::OutlineConfig;
use serde::Deserialize;

use crate::prelude::*;

/// Settings read from the `--config` TOML file.
///
/// ```toml
/// [outline]
/// line_tolerance = 2.5
///
/// [batch]
/// extensions = ["pdf"]
/// output_prefix = "output_"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub outline: OutlineConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// File extensions picked up by `batch`, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Prepended to the document stem to name its output file.
    pub output_prefix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["pdf".to_string()],
            output_prefix: "output_".to_string(),
        }
    }
}

impl BatchConfig {
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    pub fn output_path(&self, output_dir: &Path, identifier: &str) -> PathBuf {
        output_dir.join(f!("{}{}.json", self.output_prefix, identifier))
    }
}

impl Config {
    /// Read the config file if one was given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| f!("Failed to read config file {}", path.display()))?;

        Self::from_toml(&contents)
            .wrap_err_with(|| f!("Failed to load config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        let config: Config =
            toml::from_str(contents).map_err(|e| Error::ConfigFile(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        self.outline.validate()?;
        if self.batch.extensions.is_empty() {
            return Err(Error::NoExtensions);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pdfoutline_core::ConfigError;

    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.outline, OutlineConfig::default());
        assert_eq!(config.batch.extensions, vec!["pdf"]);
        assert_eq!(config.batch.output_prefix, "output_");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [outline]
            line_tolerance = 5.0

            [batch]
            extensions = ["pdf", "PDFA"]
            "#,
        )
        .unwrap();

        assert_eq!(config.outline.line_tolerance, 5.0);
        assert_eq!(config.outline.min_title_chars, 11);
        assert_eq!(config.batch.extensions, vec!["pdf", "PDFA"]);
        assert_eq!(config.batch.output_prefix, "output_");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml("[outline]\nline_tolerence = 2.0\n").unwrap_err();
        assert!(matches!(err, Error::ConfigFile(_)));
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let err = Config::from_toml("[outline]\nline_tolerance = 0.0\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Tolerance(_))));
    }

    #[test]
    fn test_empty_extensions_are_rejected() {
        let err = Config::from_toml("[batch]\nextensions = []\n").unwrap_err();
        assert!(matches!(err, Error::NoExtensions));
    }

    #[test]
    fn test_load_without_path() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.outline, OutlineConfig::default());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Config::load(Some(Path::new("/nonexistent/pdfoutline.toml"))).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdfoutline.toml");
        std::fs::write(&path, "[batch]\noutput_prefix = \"outline-\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.batch.output_prefix, "outline-");
    }

    #[test]
    fn test_extension_matching_ignores_case() {
        let batch = BatchConfig::default();
        assert!(batch.matches(Path::new("report.pdf")));
        assert!(batch.matches(Path::new("REPORT.PDF")));
        assert!(!batch.matches(Path::new("report.txt")));
        assert!(!batch.matches(Path::new("pdf")));
    }

    #[test]
    fn test_output_path() {
        let batch = BatchConfig::default();
        assert_eq!(
            batch.output_path(Path::new("out"), "file01"),
            PathBuf::from("out/output_file01.json")
        );
    }
}
