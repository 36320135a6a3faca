//! Error types for Fluctus frame decoding and encoding

use thiserror::Error;

/// Errors from fixed-width integer reads and writes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WidthError {
    /// The field extends past the end of the byte sequence
    #[error("field of {width} bytes at offset {offset} is out of range for {len} bytes")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// Only 1, 2, 3 and 4 byte fields exist on the wire
    #[error("unsupported field width: {0} bytes")]
    UnsupportedWidth(usize),
}

/// Errors that can occur while decoding a telemetry line
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The packet-type character is not `B`/`b`; the line belongs on the generic log path
    #[error("not a binary telemetry packet (type {packet_type:?})")]
    NotBinaryPacket { packet_type: Option<char> },

    /// The hex payload contains a character that is not a hex digit
    #[error("malformed hex payload: {0}")]
    MalformedHex(String),

    /// The payload is shorter than the region it claims to carry
    #[error("incomplete frame: {len} bytes, expected {expected}")]
    IncompleteFrame { len: usize, expected: usize },

    /// The payload is longer than the mandatory region plus tail
    #[error("oversized frame: {len} bytes")]
    Oversized { len: usize },

    /// A field read failed
    #[error("field read failed: {0}")]
    Width(#[from] WidthError),
}

/// Errors that can occur while encoding a telemetry record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A field value does not fit its wire width
    #[error("{field} value {value} does not fit its wire width")]
    FieldOutOfRange { field: &'static str, value: i64 },

    /// The callsign cannot be written as a single header character
    #[error("invalid callsign character {0:?}")]
    InvalidCallsign(char),

    /// A field write failed
    #[error("field write failed: {0}")]
    Width(#[from] WidthError),
}

/// Errors converting a physical value into a fixed-point field
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ScaleError {
    /// NaN or infinite input
    #[error("value is not finite")]
    NonFinite,

    /// The scaled value does not fit the field's integer type
    #[error("value {0} is out of range for the field")]
    OutOfRange(f64),
}

/// Errors building or parsing uplink commands
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Radio band must be 0 or 1
    #[error("invalid band {0}: must be 0 or 1")]
    InvalidBand(u8),

    /// Radio channel must be 0 to 25
    #[error("invalid channel {0}: must be between 0 and 25")]
    InvalidChannel(u8),

    /// Device names are exactly 7 ASCII letters
    #[error("invalid device name {0:?}: must be exactly 7 ASCII letters")]
    InvalidDevice(String),
}
