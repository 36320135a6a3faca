//! Error types for the stream reader

use thiserror::Error;

/// Errors that end a reader task
#[derive(Debug, Error)]
pub enum StreamError {
    /// The underlying byte stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
