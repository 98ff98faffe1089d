//! Error types for collaborator failures.
//!
//! Provider errors are **non-fatal** inside a session: the navigator catches
//! them at the fetch call site and turns them into a one-line error document
//! (see [`crate::state::Navigator`]). Only the initial catalog listing can
//! surface a `ProviderError` to the binary.

use thiserror::Error;

/// Failure reported by a [`Catalog`](crate::provider::Catalog) or
/// [`ContentProvider`](crate::provider::ContentProvider).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The helper process could not be started (executable missing, permissions).
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// Program that failed to launch.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The helper process ran but reported failure.
    #[error("{command} failed{}: {stderr}", .status.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    CommandFailed {
        /// Short description of what was run.
        command: String,
        /// Exit code, if the process exited normally.
        status: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// Provider output could not be decoded.
    #[error("Could not decode {context}: {source}")]
    Decode {
        /// What was being decoded.
        context: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A name cannot be passed safely to the provider.
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// The requested item or document does not exist.
    #[error("{what} not found")]
    Missing {
        /// Human-readable description of the missing item.
        what: String,
    },

    /// Other I/O failure (reading a catalog file, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Shorthand for [`ProviderError::Missing`].
    pub fn missing(what: impl Into<String>) -> Self {
        Self::Missing { what: what.into() }
    }
}
