//! Top-level server error definitions.

use thiserror::Error;

/// Errors that can abort the server process
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listen address
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while serving
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
