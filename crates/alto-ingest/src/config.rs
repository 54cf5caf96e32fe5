//! Configuration for collection conversion
//!
//! Defaults, then `ALTO_*` environment variables, then command-line flags.

use crate::error::{IngestError, Result};
use crate::export::DEFAULT_DELIMITER;
use std::path::PathBuf;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default root holding the `metadata/` and `plaintext/` archive directories
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default directory for generated CSV files
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Conversion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Directory containing `metadata/` and `plaintext/`
    pub data_dir: PathBuf,

    /// Directory the CSV files are written to
    pub output_dir: PathBuf,

    /// Attach the plain text of every article
    pub include_text: bool,

    /// Field delimiter of the output file
    pub delimiter: u8,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            include_text: true,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl IngestConfig {
    /// Load config from environment variables
    ///
    /// - `ALTO_DATA_DIR`: data directory
    /// - `ALTO_OUTPUT_DIR`: output directory
    /// - `ALTO_INCLUDE_TEXT`: `true`/`false`
    /// - `ALTO_DELIMITER`: single character, or `tab`
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `ALTO_*` overrides looked up through `var` on top of `self`
    pub fn with_overrides<F>(mut self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var("ALTO_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(dir) = var("ALTO_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(value) = var("ALTO_INCLUDE_TEXT") {
            self.include_text = value.trim().parse().map_err(|_| {
                IngestError::config(format!(
                    "ALTO_INCLUDE_TEXT must be 'true' or 'false', got '{}'",
                    value
                ))
            })?;
        }

        if let Some(value) = var("ALTO_DELIMITER") {
            self.delimiter = parse_delimiter(&value)?;
        }

        Ok(self)
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.data_dir = dir;
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) {
        self.output_dir = dir;
    }

    pub fn set_include_text(&mut self, include: bool) {
        self.include_text = include;
    }

    pub fn set_delimiter(&mut self, delimiter: u8) {
        self.delimiter = delimiter;
    }
}

/// Parse a delimiter given as a single ASCII character or `tab`
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' => Ok(*byte),
            _ => Err(IngestError::config(format!(
                "Delimiter must be a single ASCII character other than a quote or newline, \
                 got '{}'",
                value
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.include_text);
        assert_eq!(config.delimiter, b',');
    }

    #[test]
    fn test_overrides() {
        let config = IngestConfig::default()
            .with_overrides(vars(&[
                ("ALTO_DATA_DIR", "/mnt/alto2txt"),
                ("ALTO_OUTPUT_DIR", "/tmp/csv"),
                ("ALTO_INCLUDE_TEXT", "false"),
                ("ALTO_DELIMITER", "tab"),
            ]))
            .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/mnt/alto2txt"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/csv"));
        assert!(!config.include_text);
        assert_eq!(config.delimiter, b'\t');
    }

    #[test]
    fn test_invalid_include_text() {
        let err = IngestConfig::default()
            .with_overrides(vars(&[("ALTO_INCLUDE_TEXT", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, IngestError::Config(_)));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_setters() {
        let mut config = IngestConfig::default();
        config.set_data_dir(PathBuf::from("/data"));
        config.set_output_dir(PathBuf::from("/out"));
        config.set_include_text(false);
        config.set_delimiter(b';');

        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.output_dir, PathBuf::from("/out"));
        assert!(!config.include_text);
        assert_eq!(config.delimiter, b';');
    }
}
