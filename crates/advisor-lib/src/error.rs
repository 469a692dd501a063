//! Error types for the migration advisor

use thiserror::Error;

/// Errors surfaced by the advisor library
///
/// Malformed numeric fields are not errors: they are recovered to zero by
/// the normalizer and reported as [`crate::inventory::FieldParseFailure`]
/// diagnostics instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No inventory was supplied to analyze
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The inventory document could not be parsed
    #[error("Failed to parse inventory: {0}")]
    Parse(#[from] serde_json::Error),

    /// Engine lookup tables were rejected
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The narrative generator failed to produce an answer
    #[error("Narrative generation failed: {0}")]
    Narrative(String),
}

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Narrative(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::InvalidInput("inventory is missing".to_string());
        assert_eq!(err.to_string(), "Invalid input: inventory is missing");

        let err = AnalysisError::InvalidConfig("tier table is empty".to_string());
        assert!(err.to_string().contains("tier table is empty"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AnalysisError = json_err.into();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }
}
