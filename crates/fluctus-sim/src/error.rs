//! Error types for simulation and flight-log conversion

use fluctus_protocol::{EncodeError, ScaleError};
use thiserror::Error;

/// Errors that can occur while producing telemetry
#[derive(Debug, Error)]
pub enum SimError {
    /// The flight log could not be read or parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A physical value cannot be represented in its fixed-point field
    #[error("{field}: {source}")]
    Scale {
        field: &'static str,
        #[source]
        source: ScaleError,
    },

    /// An integer field is out of range for its wire width
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: f64 },

    /// A produced record could not be encoded
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}
