//! Fixed-width integer fields
//!
//! Telemetry fields are 1, 2, 3 or 4 bytes wide. Three-byte fields have no
//! native Rust integer type, so every width is assembled byte by byte and sign
//! extended by hand. Writes are two's complement: the value is reduced modulo
//! `2^(8 * width)` before its bytes are emitted.
//!
//! Reading past the end of the byte sequence returns
//! [`WidthError::OutOfRange`], which is how truncated payloads surface.

use crate::error::WidthError;

/// Widest field on the wire, in bytes
pub const MAX_WIDTH: usize = 4;

/// Mask for the 24-bit message value
pub const U24_MASK: u32 = 0x00FF_FFFF;

const U24_SIGN_BIT: u32 = 0x0080_0000;

/// Byte order of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Least significant byte first (every mandatory field)
    Little,
    /// Most significant byte first (the optional user-input tail)
    Big,
}

fn check_width(width: usize) -> Result<(), WidthError> {
    if (1..=MAX_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(WidthError::UnsupportedWidth(width))
    }
}

/// Read a `width`-byte integer at `offset`
///
/// Signed reads sign extend from the top bit of the field, so a 3-byte
/// `FF FF FF` reads as `-1`.
pub fn read_int(
    bytes: &[u8],
    offset: usize,
    width: usize,
    signed: bool,
    order: ByteOrder,
) -> Result<i64, WidthError> {
    check_width(width)?;

    let field = offset
        .checked_add(width)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(WidthError::OutOfRange {
            offset,
            width,
            len: bytes.len(),
        })?;

    let raw = match order {
        ByteOrder::Little => field
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
        ByteOrder::Big => field.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
    };

    let bits = 8 * width as u32;
    let value = raw as i64;
    if signed && raw & (1 << (bits - 1)) != 0 {
        Ok(value - (1i64 << bits))
    } else {
        Ok(value)
    }
}

/// Write `value` as a `width`-byte integer into `buf` at `offset`
pub fn write_int_into(
    buf: &mut [u8],
    offset: usize,
    value: i64,
    width: usize,
    order: ByteOrder,
) -> Result<(), WidthError> {
    check_width(width)?;

    let len = buf.len();
    let field = offset
        .checked_add(width)
        .and_then(|end| buf.get_mut(offset..end))
        .ok_or(WidthError::OutOfRange { offset, width, len })?;

    let raw = value.rem_euclid(1i64 << (8 * width)) as u64;
    for (i, slot) in field.iter_mut().enumerate() {
        let shift = match order {
            ByteOrder::Little => 8 * i,
            ByteOrder::Big => 8 * (width - 1 - i),
        };
        *slot = (raw >> shift) as u8;
    }

    Ok(())
}

/// Encode `value` as a fresh `width`-byte sequence
///
/// Signedness does not change the bytes produced: negative inputs are
/// reduced modulo `2^(8 * width)`, which is their two's complement form.
pub fn write_int(value: i64, width: usize, order: ByteOrder) -> Result<Vec<u8>, WidthError> {
    check_width(width)?;
    let mut out = vec![0u8; width];
    write_int_into(&mut out, 0, value, width, order)?;
    Ok(out)
}

/// The message-value transform of the flight computer's ground tooling
///
/// The 24-bit field is taken as an unsigned magnitude and, when bit 23 is
/// set, that magnitude is negated. This is not two's complement: `0xFFFFFF`
/// becomes `-16777215` rather than `-1`, and `0x800001` becomes `-8388609`
/// rather than `-8388607`. Use [`sign_extend_24`] for the ordinary reading.
pub fn negate_if_high_bit_set(raw: u32) -> i32 {
    let magnitude = (raw & U24_MASK) as i32;
    if raw & U24_SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Inverse of [`negate_if_high_bit_set`]
///
/// Returns `None` for values that transform cannot produce: negatives whose
/// magnitude lacks bit 23 (`-1..=-8388607`) and anything wider than 24 bits.
pub fn unnegate(value: i32) -> Option<u32> {
    let magnitude = value.unsigned_abs();
    if magnitude > U24_MASK {
        return None;
    }
    let high_bit = magnitude & U24_SIGN_BIT != 0;
    match (value < 0, high_bit) {
        (false, false) | (true, true) => Some(magnitude),
        _ => None,
    }
}

/// Standard two's complement reading of a 24-bit field
pub fn sign_extend_24(raw: u32) -> i32 {
    let raw = raw & U24_MASK;
    if raw & U24_SIGN_BIT != 0 {
        (raw | 0xFF00_0000) as i32
    } else {
        raw as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_little_endian_widths() {
        let bytes = [0x3E, 0x00, 0xBE, 0xDD, 0x01, 0x00];
        assert_eq!(read_int(&bytes, 0, 2, true, ByteOrder::Little), Ok(62));
        assert_eq!(read_int(&bytes, 2, 4, false, ByteOrder::Little), Ok(0x01DDBE));
        assert_eq!(read_int(&bytes, 2, 1, false, ByteOrder::Little), Ok(0xBE));
        assert_eq!(read_int(&bytes, 2, 1, true, ByteOrder::Little), Ok(-66));
    }

    #[test]
    fn test_read_big_endian() {
        let bytes = [0x00, 0x00, 0x01, 0x02];
        assert_eq!(read_int(&bytes, 0, 4, false, ByteOrder::Big), Ok(0x0102));
        assert_eq!(read_int(&bytes, 2, 2, false, ByteOrder::Little), Ok(0x0201));
    }

    #[test]
    fn test_read_24_bit_sign_extension() {
        assert_eq!(read_int(&[0xFF, 0xFF, 0xFF], 0, 3, true, ByteOrder::Little), Ok(-1));
        assert_eq!(
            read_int(&[0x00, 0x00, 0x80], 0, 3, true, ByteOrder::Little),
            Ok(-8_388_608)
        );
        assert_eq!(
            read_int(&[0xFF, 0xFF, 0x7F], 0, 3, true, ByteOrder::Little),
            Ok(8_388_607)
        );
        assert_eq!(
            read_int(&[0xFF, 0xFF, 0xFF], 0, 3, false, ByteOrder::Little),
            Ok(0xFF_FFFF)
        );
    }

    #[test]
    fn test_read_past_end_is_out_of_range() {
        let bytes = [0u8; 3];
        assert_eq!(
            read_int(&bytes, 2, 2, false, ByteOrder::Little),
            Err(WidthError::OutOfRange {
                offset: 2,
                width: 2,
                len: 3
            })
        );
        assert!(read_int(&bytes, usize::MAX, 1, false, ByteOrder::Little).is_err());
    }

    #[test]
    fn test_unsupported_width() {
        assert_eq!(
            read_int(&[0u8; 8], 0, 5, false, ByteOrder::Little),
            Err(WidthError::UnsupportedWidth(5))
        );
        assert_eq!(
            write_int(0, 0, ByteOrder::Little),
            Err(WidthError::UnsupportedWidth(0))
        );
    }

    #[test]
    fn test_write_twos_complement() {
        assert_eq!(write_int(-1, 3, ByteOrder::Little), Ok(vec![0xFF, 0xFF, 0xFF]));
        assert_eq!(write_int(-2, 2, ByteOrder::Little), Ok(vec![0xFE, 0xFF]));
        assert_eq!(write_int(-8_388_608, 3, ByteOrder::Little), Ok(vec![0x00, 0x00, 0x80]));
        assert_eq!(write_int(263, 2, ByteOrder::Little), Ok(vec![0x07, 0x01]));
        assert_eq!(write_int(263, 2, ByteOrder::Big), Ok(vec![0x01, 0x07]));
    }

    #[test]
    fn test_write_into_bounds() {
        let mut buf = [0u8; 4];
        write_int_into(&mut buf, 1, 0x0A0B0C, 3, ByteOrder::Little).unwrap();
        assert_eq!(buf, [0x00, 0x0C, 0x0B, 0x0A]);
        assert!(write_int_into(&mut buf, 2, 0, 3, ByteOrder::Little).is_err());
    }

    #[test]
    fn test_negate_differs_from_sign_extension() {
        assert_eq!(negate_if_high_bit_set(0x00_0005), 5);
        assert_eq!(sign_extend_24(0x00_0005), 5);

        assert_eq!(negate_if_high_bit_set(0xFF_FFFF), -16_777_215);
        assert_eq!(sign_extend_24(0xFF_FFFF), -1);

        assert_eq!(negate_if_high_bit_set(0x80_0001), -8_388_609);
        assert_eq!(sign_extend_24(0x80_0001), -8_388_607);

        // The only point where the two agree on a set high bit
        assert_eq!(negate_if_high_bit_set(0x80_0000), -8_388_608);
        assert_eq!(sign_extend_24(0x80_0000), -8_388_608);
    }

    #[test]
    fn test_unnegate_inverts_negate() {
        for raw in [0, 1, 0x7F_FFFF, 0x80_0000, 0x80_0001, 0xFF_FFFF] {
            assert_eq!(unnegate(negate_if_high_bit_set(raw)), Some(raw));
        }
        assert_eq!(unnegate(-1), None);
        assert_eq!(unnegate(-8_388_607), None);
        assert_eq!(unnegate(0x80_0000), None);
        assert_eq!(unnegate(-16_777_216), None);
    }
}
