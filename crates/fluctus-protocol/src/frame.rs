//! Line tokenizer
//!
//! # Format
//! ```text
//! <callsign><packet type><hex payload>|Grssi<n>/Gsnr<n>
//! ```
//!
//! - `callsign`: one character
//! - `packet type`: `B`/`b` for binary telemetry; anything else is a text
//!   line for the generic log path
//! - `hex payload`: 76 or 88 hex digits
//! - everything after the first `|` is the diagnostics suffix (optional)

use crate::error::DecodeError;

/// Separator between the binary frame and the diagnostics suffix
pub const DIAGNOSTICS_SEPARATOR: char = '|';

/// Packet-type character written by the encoder
pub const BINARY_PACKET_TYPE: char = 'B';

/// A binary telemetry line split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Header callsign character
    pub callsign: char,
    /// Packet-type character as received (`B` or `b`)
    pub packet_type: char,
    /// Hex digits of the payload
    pub hex_payload: &'a str,
    /// Text after the first `|`, possibly empty
    pub diagnostics: &'a str,
}

/// Split a line into header, payload and diagnostics
///
/// Surrounding whitespace (including a `\r` left by serial line endings) is
/// ignored. Lines whose packet type is not `B`/`b` are rejected with
/// [`DecodeError::NotBinaryPacket`].
pub fn tokenize(line: &str) -> Result<Frame<'_>, DecodeError> {
    let line = line.trim();
    let (data, diagnostics) = line
        .split_once(DIAGNOSTICS_SEPARATOR)
        .unwrap_or((line, ""));

    let mut chars = data.chars();
    match (chars.next(), chars.next()) {
        (Some(callsign), Some(packet_type)) if packet_type.eq_ignore_ascii_case(&'b') => {
            Ok(Frame {
                callsign,
                packet_type,
                hex_payload: chars.as_str(),
                diagnostics,
            })
        }
        (_, packet_type) => Err(DecodeError::NotBinaryPacket { packet_type }),
    }
}
