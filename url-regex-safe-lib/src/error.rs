//! Error handling for pattern building and TLD list generation.
//!
//! Assembling a pattern cannot fail; the only run-time failure of the core is
//! the regex engine rejecting the assembled source. The remaining variants
//! belong to the ambient layers (configuration files, the TLD generator).

use std::fmt;

/// Main error type for the library.
#[derive(Debug, Clone)]
pub enum UrlRegexError {
    /// The regex engine rejected the assembled pattern
    PatternCompile {
        pattern: String,
        message: String,
    },

    /// Network-related errors while fetching the TLD registry
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// A registry entry could not be IDNA-decoded
    DecodeError {
        tld: String,
        message: String,
    },

    /// Configuration errors (invalid settings, bad TOML, etc.)
    ConfigError {
        message: String,
    },

    /// File I/O errors when reading configuration, input or TLD lists
    FileError {
        path: String,
        message: String,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl UrlRegexError {
    /// Create a new pattern compile error.
    pub fn pattern_compile<P: Into<String>, M: Into<String>>(pattern: P, message: M) -> Self {
        Self::PatternCompile {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new decode error for a single registry entry.
    pub fn decode<T: Into<String>, M: Into<String>>(tld: T, message: M) -> Self {
        Self::DecodeError {
            tld: tld.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The offending pattern, for compile errors.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::PatternCompile { pattern, .. } => Some(pattern),
            _ => None,
        }
    }

    /// Check if this error suggests the operation should be retried.
    ///
    /// Only transient network failures of the generator qualify; a rejected
    /// pattern is deterministic and will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError { .. })
    }
}

impl fmt::Display for UrlRegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternCompile { pattern, message } => {
                write!(
                    f,
                    "Pattern compile error ({} byte pattern): {}",
                    pattern.len(),
                    message
                )
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::DecodeError { tld, message } => {
                write!(f, "Decode error for TLD '{}': {}", tld, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for UrlRegexError {}

#[cfg(feature = "generator")]
impl From<reqwest::Error> for UrlRegexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("HTTP request timed out", err.to_string())
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<std::io::Error> for UrlRegexError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
