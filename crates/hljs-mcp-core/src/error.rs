//! Error types for hljs-mcp.

use thiserror::Error;

/// Main error type for hljs-mcp operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The script execution context could not be constructed
    #[error("Context creation failed: {0}")]
    ContextCreationFailed(String),

    /// Engine payload missing from the resource bundle
    #[error("Resource not found: {name}.{extension}")]
    ResourceNotFound {
        /// Logical resource name
        name: String,
        /// Resource extension
        extension: String,
    },

    /// Payload evaluated but did not expose the expected global object
    #[error("Entry point not found: {0}")]
    EntryPointNotFound(String),

    /// Engine returned a value missing required fields
    #[error("Malformed engine response: {0}")]
    MalformedEngineResponse(String),

    /// Failure raised inside the engine (unknown grammar, thrown exception)
    #[error("Engine error: {0}")]
    Engine(String),

    /// Initialization failed earlier and the loader is not retrying
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Alias does not name a known language
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error comes from engine initialization rather than a call.
    pub fn is_initialization(&self) -> bool {
        matches!(
            self,
            Error::ContextCreationFailed(_)
                | Error::ResourceNotFound { .. }
                | Error::EntryPointNotFound(_)
                | Error::EngineUnavailable(_)
                | Error::Io(_)
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation_failed_error() {
        let err = Error::ContextCreationFailed("out of memory".to_string());
        assert_eq!(err.to_string(), "Context creation failed: out of memory");
    }

    #[test]
    fn test_resource_not_found_error() {
        let err = Error::ResourceNotFound {
            name: "highlight.min".to_string(),
            extension: "js".to_string(),
        };
        assert_eq!(err.to_string(), "Resource not found: highlight.min.js");
    }

    #[test]
    fn test_entry_point_not_found_error() {
        let err = Error::EntryPointNotFound("hljs".to_string());
        assert_eq!(err.to_string(), "Entry point not found: hljs");
    }

    #[test]
    fn test_malformed_response_error() {
        let err = Error::MalformedEngineResponse("missing field `value`".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed engine response: missing field `value`"
        );
    }

    #[test]
    fn test_engine_error() {
        let err = Error::Engine("Unknown language: \"foo\"".to_string());
        assert_eq!(err.to_string(), "Engine error: Unknown language: \"foo\"");
    }

    #[test]
    fn test_unknown_language_error() {
        let err = Error::UnknownLanguage("cobol".to_string());
        assert_eq!(err.to_string(), "Unknown language: cobol");
    }

    #[test]
    fn test_config_error() {
        let err = Error::Config("engine.entry_point cannot be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: engine.entry_point cannot be empty"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_initialization_classification() {
        assert!(Error::ContextCreationFailed(String::new()).is_initialization());
        assert!(Error::EntryPointNotFound("hljs".into()).is_initialization());
        assert!(Error::EngineUnavailable("gone".into()).is_initialization());
        assert!(!Error::Engine("boom".into()).is_initialization());
        assert!(!Error::MalformedEngineResponse("x".into()).is_initialization());
    }
}
