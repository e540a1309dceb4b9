//! Error types for adaptive-pager
//!
//! Two layers live here. [`Error`] covers configuration, record loading and
//! the CLI. [`PageError`] is what a single pull on a paginator can fail with:
//! either the source call failed, or the caller pulled past the end.

use thiserror::Error;

/// The main error type for adaptive-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Record Errors
    // ============================================================================
    #[error("Failed to extract parameter from path '{path}': {message}")]
    RecordExtraction { path: String, message: String },

    #[error("Pagination failed: {message}")]
    Pagination { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a record extraction error
    pub fn record_extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordExtraction {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for adaptive-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single pull on a paginator
///
/// `E` is the error type of the underlying source and is carried verbatim.
#[derive(Error, Debug)]
pub enum PageError<E> {
    /// The source call failed. Paginator state is unchanged; the pull may be retried.
    #[error("Source fetch failed: {0}")]
    Fetch(#[source] E),

    /// The caller pulled after exhaustion was established.
    #[error("Paginator is exhausted")]
    Exhausted,
}

impl<E> PageError<E> {
    /// Check if repeating the same pull can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Check if this is the usage error raised after exhaustion
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Take the source error out, if this is a fetch failure
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Exhausted => None,
        }
    }
}

impl<E: std::fmt::Display> From<PageError<E>> for Error {
    fn from(err: PageError<E>) -> Self {
        Self::Pagination {
            message: err.to_string(),
        }
    }
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
