//! Error types for text reconstruction operations.
//!
//! This module defines the error types that can occur while loading corpus
//! profiles, reading raw OCR dumps, and emitting chapter JSON.

use thiserror::Error;

/// Error types that can occur during text reconstruction.
///
/// Normal cleaning never fails: unparseable lines degrade to the `Noise`
/// category and boundary uncertainty produces warnings. The variants here
/// cover the genuinely fatal conditions (unreadable input, broken profile,
/// a pipeline that produced nothing at all) plus serialization failures at
/// the output boundary.
///
/// # Examples
///
/// ```
/// use recensio_core::{RecensioError, Result};
///
/// fn read_dump(path: &str) -> Result<String> {
///     Ok(std::fs::read_to_string(path)?)
/// }
///
/// match read_dump("missing.txt") {
///     Err(RecensioError::IoError(e)) => eprintln!("file error: {e}"),
///     other => drop(other),
/// }
/// ```
#[derive(Error, Debug)]
pub enum RecensioError {
    /// File I/O error reading the raw dump or writing chapter output.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error at the output boundary.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Corpus profile could not be parsed.
    #[error("profile error: {0}")]
    ProfileError(#[from] toml::de::Error),

    /// A pattern in a profile or rule table failed to compile.
    #[error("invalid pattern '{name}': {source}")]
    PatternError {
        /// Name of the offending rule or signature.
        name: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A profile is structurally invalid (empty siglum alphabet, overlapping
    /// boundary ranges, etc.).
    #[error("invalid profile '{0}': {1}")]
    InvalidProfile(String, String),

    /// The pipeline produced zero chapters or zero paragraphs for an entire
    /// document. This signals a total misconfiguration (wrong corpus
    /// profile), not a quality problem.
    #[error("empty output for document '{0}': wrong corpus profile?")]
    EmptyOutput(String),
}

/// Type alias for [`Result<T, RecensioError>`].
pub type Result<T> = std::result::Result<T, RecensioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RecensioError = io_err.into();

        match err {
            RecensioError::IoError(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("expected IoError variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ not json }").unwrap_err();
        let err: RecensioError = json_err.into();
        assert!(matches!(err, RecensioError::JsonError(_)));
    }

    #[test]
    fn test_pattern_error_display() {
        let bad = regex::Regex::new("(").unwrap_err();
        let err = RecensioError::PatternError {
            name: "strip_folio".to_string(),
            source: bad,
        };
        let display = format!("{err}");
        assert!(display.contains("strip_folio"));
    }

    #[test]
    fn test_empty_output_display() {
        let err = RecensioError::EmptyOutput("diarium-vol1".to_string());
        assert_eq!(
            format!("{err}"),
            "empty output for document 'diarium-vol1': wrong corpus profile?"
        );
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<()> {
            Err(RecensioError::InvalidProfile(
                "epitome".to_string(),
                "empty siglum alphabet".to_string(),
            ))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        match outer() {
            Err(RecensioError::InvalidProfile(name, _)) => assert_eq!(name, "epitome"),
            _ => panic!("expected InvalidProfile to propagate"),
        }
    }
}
