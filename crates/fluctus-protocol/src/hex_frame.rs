//! ASCII hex payload conversion
//!
//! No protocol knowledge lives here: two hex digits per byte in, two
//! uppercase hex digits per byte out.

use crate::error::DecodeError;

/// Decode a hex payload
///
/// An odd-length payload silently drops its trailing nibble, so
/// `"3E0"` decodes exactly like `"3E"`. Radio links occasionally cut the last
/// character of a line and the mandatory region is unaffected by it.
pub fn hex_to_bytes(hex_payload: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = hex_payload.as_bytes();
    let even = digits.len() & !1;
    if even != digits.len() {
        tracing::trace!("Dropping trailing nibble of odd-length payload");
    }

    hex::decode(&digits[..even]).map_err(|e| DecodeError::MalformedHex(e.to_string()))
}

/// Encode bytes as uppercase hex
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}
