use thiserror::Error;

/// Top-level error type for the Genesis client.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for GenesisError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenesisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<toml::de::Error> for GenesisError {
    fn from(err: toml::de::Error) -> Self {
        GenesisError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GenesisError {
    fn from(err: toml::ser::Error) -> Self {
        GenesisError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GenesisError {
    fn from(err: serde_json::Error) -> Self {
        GenesisError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Genesis operations.
pub type Result<T> = std::result::Result<T, GenesisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GenesisError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = GenesisError::Backend("connection refused".to_string());
        assert_eq!(err.to_string(), "Backend error: connection refused");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GenesisError = io_err.into();
        assert!(matches!(err, GenesisError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: GenesisError = toml_err.into();
        assert!(matches!(err, GenesisError::Config(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GenesisError = json_err.into();
        assert!(matches!(err, GenesisError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let err = GenesisError::Serialization("bad".into());
        assert!(format!("{:?}", err).contains("Serialization"));
    }
}
