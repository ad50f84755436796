/// Unified error type for the string replacer task
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplacerError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Glob resolution errors
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    // Content stream errors
    #[error("Invalid UTF-8 in content stream at byte {offset}: {reason}")]
    Encoding { offset: usize, reason: String },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Host workspace errors
    #[error("Workspace error: {0}")]
    Workspace(String),

    // Generic error for compatibility
    #[error("{0}")]
    Other(String),
}

/// Result type alias using ReplacerError
pub type Result<T> = std::result::Result<T, ReplacerError>;

impl ReplacerError {
    /// Create a glob error for the pattern that failed to compile
    pub fn glob(pattern: impl Into<String>, source: globset::Error) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create an encoding error at the given stream offset
    pub fn encoding(offset: usize, reason: impl Into<String>) -> Self {
        Self::Encoding {
            offset,
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a workspace error
    pub fn workspace(msg: impl Into<String>) -> Self {
        Self::Workspace(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

// Conversion from String for convenience
impl From<String> for ReplacerError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

// Conversion from &str for convenience
impl From<&str> for ReplacerError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}
