//! Error types for credential extraction
//!
//! Wrapping variants (`Secret`, `Field`, `Store`) keep the failing secret
//! name, field key, and output path as fields. Use [`Error::root`] or
//! [`Error::is_not_found`] to classify the innermost cause.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the extraction Error
pub type Result<T> = std::result::Result<T, Error>;

/// Credential extraction error
#[derive(Debug, Error)]
pub enum Error {
    /// The named secret does not exist
    #[error("secret {namespace}/{name} not found")]
    NotFound {
        /// Secret name
        name: String,
        /// Namespace that was searched
        namespace: String,
    },

    /// Fetching a secret failed for a reason other than absence
    #[error("unable to fetch secret {namespace}/{name}: {source}")]
    Store {
        /// Secret name
        name: String,
        /// Namespace of the secret
        namespace: String,
        /// Underlying store failure
        source: Box<Error>,
    },

    /// Writing a credential file failed
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Target file
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Extracting one field of a secret failed
    #[error("failed to extract key {key} to {path}: {source}")]
    Field {
        /// Secret data key
        key: String,
        /// Output filename relative to the working directory
        path: String,
        /// Cause
        source: Box<Error>,
    },

    /// Extracting a catalog entry failed
    #[error("failed to extract secret {name}: {source}")]
    Secret {
        /// Secret name
        name: String,
        /// Cause
        source: Box<Error>,
    },

    /// Kubernetes API error
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Invalid configuration or catalog
    #[error("{0}")]
    Common(#[from] kibana_common::Error),
}

impl Error {
    /// Create a not-found error for a secret
    pub fn not_found(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Common(kibana_common::Error::config(msg))
    }

    /// The innermost error, unwrapping secret, field, and store context
    pub fn root(&self) -> &Error {
        match self {
            Self::Secret { source, .. }
            | Self::Field { source, .. }
            | Self::Store { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the root cause is a missing secret
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound { .. })
    }

    /// Name of the catalog secret whose extraction failed, if known
    pub fn secret_name(&self) -> Option<&str> {
        match self {
            Self::Secret { name, .. } | Self::Store { name, .. } | Self::NotFound { name, .. } => {
                Some(name)
            }
            Self::Field { source, .. } => source.secret_name(),
            _ => None,
        }
    }
}
