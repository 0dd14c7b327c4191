//! Error types for Katalog.
//!
//! Every failure is classified by [`ErrorKind`]:
//!
//! | Kind | When | Recovery |
//! |------|------|----------|
//! | `Configuration` | startup validation | refuse to start |
//! | `NotFound` | unknown brand, record, search field, sort | caller decides fallback or 404 |
//! | `Upstream` | index or holdings service failure | propagated, no retry here |
//! | `Data` | malformed holdings entry, bad JSON | detail view degrades |
//! | `Io` | reading config or data files | reported by the CLI |

use std::path::{Path, PathBuf};

/// Result type alias for Katalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fatal, startup-time configuration problem.
    Configuration,
    /// A lookup key did not match anything.
    NotFound,
    /// An external collaborator failed.
    Upstream,
    /// Input data violated a mandatory shape.
    Data,
    /// Local file access failed.
    Io,
}

/// Errors that can occur in Katalog.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Generic configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Two search fields were registered under the same key.
    #[error("Configuration error: duplicate search field key '{key}'")]
    DuplicateSearchField {
        /// The colliding key
        key: String,
    },

    /// Two facets were registered for the same index field.
    #[error("Configuration error: duplicate facet field '{field}'")]
    DuplicateFacetField {
        /// The colliding field key
        field: String,
    },

    /// The brand table has no entry for its default key.
    #[error("Configuration error: brand table has no entry for default brand '{key}'")]
    MissingDefaultBrand {
        /// The configured default key
        key: String,
    },

    /// A lookup key did not match anything.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// What was being looked up ("brand", "record", ...)
        kind: &'static str,
        /// The key that failed to match
        key: String,
    },

    /// An external service (index, holdings) failed.
    #[error("Upstream error from {service}: {message}")]
    Upstream {
        /// Name of the failing collaborator
        service: String,
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A holdings entry lacks its mandatory location.
    #[error("Data error: holdings entry {index} has no location")]
    MalformedHolding {
        /// Position of the entry in the input sequence
        index: usize,
    },

    /// I/O error with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("Configuration error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. }
            | Error::DuplicateSearchField { .. }
            | Error::DuplicateFacetField { .. }
            | Error::MissingDefaultBrand { .. }
            | Error::Toml(_) => ErrorKind::Configuration,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Upstream { .. } => ErrorKind::Upstream,
            Error::MalformedHolding { .. } | Error::Json(_) => ErrorKind::Data,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Returns `true` for startup-time configuration errors.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Returns `true` for failed lookups.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns `true` for collaborator failures.
    pub fn is_upstream(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }

    /// Returns `true` for malformed input data.
    pub fn is_data(&self) -> bool {
        self.kind() == ErrorKind::Data
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new not-found error.
    pub fn not_found<K: Into<String>>(kind: &'static str, key: K) -> Self {
        Error::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Creates a new upstream error.
    pub fn upstream<S, M>(service: S, message: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Error::Upstream {
            service: service.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new upstream error wrapping its cause.
    pub fn upstream_with_source<S, M, E>(service: S, message: M, source: E) -> Self
    where
        S: Into<String>,
        M: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Upstream {
            service: service.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an I/O error tagged with the path involved.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
