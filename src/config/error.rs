//! Configuration error types

/// Errors raised while loading or validating [`JsonFormsConfig`](super::JsonFormsConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO-related errors (file access, permissions, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation errors
    #[error("Configuration validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Create a validation error with context
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io(e) => format!("Failed to access configuration file: {}", e),
            ConfigError::Toml(e) => format!("Configuration file format error: {}", e),
            ConfigError::Validation(msg) => format!("Configuration validation failed: {}", msg),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
