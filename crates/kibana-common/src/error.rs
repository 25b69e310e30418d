//! Error types shared across the Kibana credential crates
//!
//! Crate-specific errors wrap this type; it only covers concerns every
//! crate has in common (client setup and configuration).

use thiserror::Error;

/// Common error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("configuration error: {message}")]
    Config {
        /// Description of what's invalid
        message: String,
    },

    /// Internal/operational error
    #[error("internal error [{context}]: {message}")]
    Internal {
        /// Description of what failed
        message: String,
        /// Context where the error occurred (e.g., "create_client")
        context: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an internal error with the operation it occurred in
    pub fn internal_with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: context.into(),
        }
    }
}
