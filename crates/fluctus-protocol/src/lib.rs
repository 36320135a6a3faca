//! Fluctus Telemetry Protocol Library
//!
//! This crate decodes and encodes the telemetry lines a Fluctus flight
//! computer sends to its ground station over LoRa:
//!
//! ```text
//! FB3E0007...0E53000000|Grssi-65/Gsnr6
//! ^^                    ^^^^^^^^^^^^^^ receiver diagnostics
//! |+ packet type (B = binary telemetry)
//! + callsign
//! ```
//!
//! # Architecture
//!
//! - [`frame`] splits a line into header, hex payload and diagnostics suffix
//! - [`hex_frame`] converts the hex payload to bytes and back
//! - [`layout`] is the one table of field offsets, widths and byte orders
//! - [`width`] reads and writes 1 to 4 byte integers in either byte order
//! - [`codec`] walks the layout to build a [`TelemetryRecord`] and back
//! - [`command`] covers the short ASCII uplink commands and their replies
//!
//! Decoding is stateless: every line is handled on its own and an error on
//! one line has no effect on the next.
//!
//! # Example
//!
//! ```rust
//! use fluctus_protocol::{decode, encode, FlightStatus, MessageKind};
//!
//! let line = "FB3E00070100BEDD01000000000000006C00AA89109CFF00650000000000000000000E53000000|Grssi-65/Gsnr6";
//! let record = decode(line).unwrap();
//!
//! assert_eq!(record.uid, 62);
//! assert_eq!(record.status, FlightStatus::Idle);
//! assert_eq!(record.batt_voltage.value(), 4.233);
//! assert_eq!(record.message.kind(), MessageKind::MaxSpeed);
//! assert_eq!(record.rssi, Some(-65));
//!
//! assert_eq!(encode(&record).unwrap(), line);
//! ```

pub mod codec;
pub mod command;
pub mod diagnostics;
pub mod error;
pub mod frame;
pub mod hex_frame;
pub mod layout;
pub mod record;
pub mod scaled;
pub mod width;

pub use codec::{decode, decode_payload, encode, encode_payload};
pub use command::{parse_reply, DownlinkReply, UplinkCommand};
pub use diagnostics::Diagnostics;
pub use error::{CommandError, DecodeError, EncodeError, ScaleError, WidthError};
pub use record::{
    FlightStatus, Message, MessageKind, PyroState, PyroStates, TelemetryRecord, DEFAULT_CALLSIGN,
};
pub use scaled::{Deci, Micro, Milli, Scaled};
pub use width::ByteOrder;
