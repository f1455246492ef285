use crate::config::ConfigError;
use std::fmt;
use std::io;

/// Unified error type for the crate.
///
/// Import runs never abort on these: the planner and runner catch them at
/// file or title granularity and turn them into
/// [`ImportError`](crate::import::ImportError) entries. They propagate
/// normally everywhere else (schema lookups, editor bootstrap, CLI setup).
#[derive(Debug)]
pub enum JsonFormsError {
    /// Errors related to configuration
    Config(ConfigError),

    /// Errors raised by a page store backend
    Storage(String),

    /// Errors related to IO operations
    Io(io::Error),

    /// Errors related to JSON encoding/decoding
    Serialization(String),

    /// A page name that cannot be turned into a valid title
    Title(String),

    /// A page or schema that does not exist
    NotFound(String),
}

impl fmt::Display for JsonFormsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "Configuration error: {}", err),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Self::Title(msg) => write!(f, "Invalid title: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for JsonFormsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Conversion from ConfigError to JsonFormsError
impl From<ConfigError> for JsonFormsError {
    fn from(error: ConfigError) -> Self {
        JsonFormsError::Config(error)
    }
}

/// Conversion from io::Error to JsonFormsError
impl From<io::Error> for JsonFormsError {
    fn from(error: io::Error) -> Self {
        JsonFormsError::Io(error)
    }
}

/// Conversion from serde_json::Error to JsonFormsError
impl From<serde_json::Error> for JsonFormsError {
    fn from(error: serde_json::Error) -> Self {
        JsonFormsError::Serialization(error.to_string())
    }
}

/// Conversion from sled::Error to JsonFormsError
impl From<sled::Error> for JsonFormsError {
    fn from(error: sled::Error) -> Self {
        JsonFormsError::Storage(error.to_string())
    }
}

/// Result type alias for operations that can result in a JsonFormsError
pub type JsonFormsResult<T> = Result<T, JsonFormsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = JsonFormsError::Title("Foo#Bar".to_string());
        assert_eq!(err.to_string(), "Invalid title: Foo#Bar");

        let err = JsonFormsError::NotFound("JsonSchema:Missing".to_string());
        assert_eq!(err.to_string(), "Not found: JsonSchema:Missing");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: JsonFormsError = parse_err.into();
        assert!(matches!(err, JsonFormsError::Serialization(_)));
    }
}
