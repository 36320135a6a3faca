//! Payload field layout (protocol 1.7b)
//!
//! The single table of byte offsets, widths, signedness, byte order and
//! scale factors for the binary payload. Both [`crate::codec::decode_payload`]
//! and [`crate::codec::encode_payload`] walk this table, so the two
//! directions cannot drift apart.
//!
//! # Format
//! ```text
//! offset  width  field
//!      0      2  uid               i16
//!      2      2  firmware version  i16
//!      4      1  rx channel        i8
//!      5      4  time MPU          u32  ms
//!      9      1  status            u8
//!     10      3  altitude          i24  m
//!     13      2  vertical speed    u16  m/s
//!     15      2  acceleration      i16  /10 m/s²
//!     17      1  angle             u8   deg
//!     18      2  battery voltage   u16  /1000 V
//!     20      2  flight time       u16  /10 s
//!     22      1  pyro states       u8   (A bits 0-1, B bits 2-3, C bits 4-5)
//!     23      1  log status        u8
//!     24      4  GPS latitude      i32  /1e6 deg
//!     28      4  GPS longitude     i32  /1e6 deg
//!     32      1  GPS state         u8
//!     33      1  warning code      u8
//!     34      1  message kind      u8
//!     35      3  message value     u24
//!   ---- optional tail ----
//!     38      4  user input 1      u32  big-endian
//!     42      2  user input 2      u16  big-endian
//! ```
//!
//! Every mandatory field is little-endian. The tail fields are read and
//! written most-significant byte first. The existing ground tools send and
//! read the tail little-endian; big-endian here is a deliberate choice that
//! has not been confirmed against the flight computer firmware. The order is
//! kept per field so it can be changed in one place.

use crate::error::WidthError;
use crate::width::{self, ByteOrder};

/// Length of the mandatory region in bytes
pub const MANDATORY_LEN: usize = 38;
/// Length of the optional user-input tail in bytes
pub const TAIL_LEN: usize = 6;
/// Length of a payload carrying the tail
pub const FULL_LEN: usize = MANDATORY_LEN + TAIL_LEN;

/// A payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Uid,
    FirmwareVersion,
    RxChannel,
    TimeMpu,
    Status,
    Altitude,
    SpeedVert,
    Acceleration,
    Angle,
    BattVoltage,
    FlightTime,
    Pyro,
    LogStatus,
    GpsLat,
    GpsLng,
    GpsState,
    WarnCode,
    MessageKind,
    MessageValue,
    UserIn1,
    UserIn2,
}

/// Placement and encoding of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Which field this is
    pub field: Field,
    /// Name used in errors and logs
    pub name: &'static str,
    /// Byte offset within the payload
    pub offset: usize,
    /// Width in bytes (1 to 4)
    pub width: usize,
    /// Two's complement field
    pub signed: bool,
    /// Byte order on the wire
    pub order: ByteOrder,
    /// Divisor from wire integer to physical unit (1 for unscaled fields)
    pub scale: u32,
}

impl FieldSpec {
    const fn le(
        field: Field,
        name: &'static str,
        offset: usize,
        width: usize,
        signed: bool,
        scale: u32,
    ) -> Self {
        Self {
            field,
            name,
            offset,
            width,
            signed,
            order: ByteOrder::Little,
            scale,
        }
    }

    const fn be(field: Field, name: &'static str, offset: usize, width: usize) -> Self {
        Self {
            field,
            name,
            offset,
            width,
            signed: false,
            order: ByteOrder::Big,
            scale: 1,
        }
    }

    /// First byte past the field
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Smallest and largest integers the field can carry
    pub fn range(&self) -> (i64, i64) {
        let bits = 8 * self.width as u32;
        if self.signed {
            (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
        } else {
            (0, (1i64 << bits) - 1)
        }
    }

    /// Returns whether `value` fits without wrapping
    pub fn fits(&self, value: i64) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }

    /// Read this field from a payload
    pub fn read(&self, payload: &[u8]) -> Result<i64, WidthError> {
        width::read_int(payload, self.offset, self.width, self.signed, self.order)
    }

    /// Write this field into a payload buffer
    pub fn write(&self, payload: &mut [u8], value: i64) -> Result<(), WidthError> {
        width::write_int_into(payload, self.offset, value, self.width, self.order)
    }
}

/// The mandatory region, in wire order
pub static MANDATORY_FIELDS: [FieldSpec; 19] = [
    FieldSpec::le(Field::Uid, "uid", 0, 2, true, 1),
    FieldSpec::le(Field::FirmwareVersion, "firmware_version", 2, 2, true, 1),
    FieldSpec::le(Field::RxChannel, "rx_channel", 4, 1, true, 1),
    FieldSpec::le(Field::TimeMpu, "time_mpu", 5, 4, false, 1),
    FieldSpec::le(Field::Status, "status", 9, 1, false, 1),
    FieldSpec::le(Field::Altitude, "altitude", 10, 3, true, 1),
    FieldSpec::le(Field::SpeedVert, "speed_vert", 13, 2, false, 1),
    FieldSpec::le(Field::Acceleration, "acceleration", 15, 2, true, 10),
    FieldSpec::le(Field::Angle, "angle", 17, 1, false, 1),
    FieldSpec::le(Field::BattVoltage, "batt_voltage", 18, 2, false, 1_000),
    FieldSpec::le(Field::FlightTime, "flight_time", 20, 2, false, 10),
    FieldSpec::le(Field::Pyro, "pyro", 22, 1, false, 1),
    FieldSpec::le(Field::LogStatus, "log_status", 23, 1, false, 1),
    FieldSpec::le(Field::GpsLat, "gps_lat", 24, 4, true, 1_000_000),
    FieldSpec::le(Field::GpsLng, "gps_lng", 28, 4, true, 1_000_000),
    FieldSpec::le(Field::GpsState, "gps_state", 32, 1, false, 1),
    FieldSpec::le(Field::WarnCode, "warn_code", 33, 1, false, 1),
    FieldSpec::le(Field::MessageKind, "message_kind", 34, 1, false, 1),
    FieldSpec::le(Field::MessageValue, "message_value", 35, 3, false, 1),
];

/// The optional tail, in wire order
pub static TAIL_FIELDS: [FieldSpec; 2] = [
    FieldSpec::be(Field::UserIn1, "user_in1", 38, 4),
    FieldSpec::be(Field::UserIn2, "user_in2", 42, 2),
];

/// Fields present in a payload, with or without the tail
pub fn fields(with_tail: bool) -> impl Iterator<Item = &'static FieldSpec> {
    let tail: &'static [FieldSpec] = if with_tail { &TAIL_FIELDS } else { &[] };
    MANDATORY_FIELDS.iter().chain(tail.iter())
}

/// Look up a field's spec
pub fn spec(field: Field) -> &'static FieldSpec {
    // Field variants are declared in wire order
    match field {
        Field::UserIn1 => &TAIL_FIELDS[0],
        Field::UserIn2 => &TAIL_FIELDS[1],
        mandatory => &MANDATORY_FIELDS[mandatory as usize],
    }
}
