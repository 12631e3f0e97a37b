//! Error types for version parsing and schema selection

use thiserror::Error;

/// Result type for version operations
pub type VersionResult<T> = Result<T, VersionError>;

/// Errors raised while parsing versions or selecting a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Version string is not a dotted numeric version
    #[error("Invalid version '{0}'")]
    Parse(String),

    /// Constraint string could not be parsed
    #[error("Invalid version constraint '{0}'")]
    InvalidConstraint(String),

    /// No rule in the rule set matched the version
    #[error("No schema rule matches version {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VersionError::Parse("abc".to_string());
        assert_eq!(err.to_string(), "Invalid version 'abc'");

        let err = VersionError::Unsupported("1.0".to_string());
        assert_eq!(err.to_string(), "No schema rule matches version 1.0");
    }
}
