//! Telemetry line decoding and encoding
//!
//! `decode` = tokenize → hex → layout-driven field reads → record.
//! `encode` is the mirror. Both are pure functions with no state between
//! calls, so one bad line never affects the next.
//!
//! # Payload length policy
//! - exactly 38 bytes: mandatory region only
//! - exactly 44 bytes: mandatory region plus user-input tail
//! - fewer than 38, or 39 to 43: [`DecodeError::IncompleteFrame`]
//! - more than 44: [`DecodeError::Oversized`]

use std::str::FromStr;

use crate::diagnostics::Diagnostics;
use crate::error::{DecodeError, EncodeError};
use crate::frame::{self, BINARY_PACKET_TYPE, DIAGNOSTICS_SEPARATOR};
use crate::hex_frame::{bytes_to_hex, hex_to_bytes};
use crate::layout::{self, Field, FULL_LEN, MANDATORY_LEN};
use crate::record::{FlightStatus, Message, MessageKind, PyroStates, TelemetryRecord};
use crate::scaled::Scaled;

/// Decode one line into a record
pub fn decode(line: &str) -> Result<TelemetryRecord, DecodeError> {
    let frame = frame::tokenize(line)?;
    let payload = hex_to_bytes(frame.hex_payload)?;

    let mut record = decode_payload(&payload)?;
    record.callsign = frame.callsign;

    let diagnostics = Diagnostics::parse(frame.diagnostics);
    record.rssi = diagnostics.rssi;
    record.snr = diagnostics.snr;

    Ok(record)
}

/// Decode a binary payload (without header or diagnostics)
pub fn decode_payload(payload: &[u8]) -> Result<TelemetryRecord, DecodeError> {
    let with_tail = tail_present(payload.len())?;

    let mut record = TelemetryRecord::default();
    for spec in layout::fields(with_tail) {
        let value = spec.read(payload)?;
        apply_field(&mut record, spec.field, value);
    }

    Ok(record)
}

/// Encode a record as a complete line (without newline)
pub fn encode(record: &TelemetryRecord) -> Result<String, EncodeError> {
    if !record.callsign.is_ascii_graphic() || record.callsign == DIAGNOSTICS_SEPARATOR {
        return Err(EncodeError::InvalidCallsign(record.callsign));
    }

    let payload = encode_payload(record)?;
    let diagnostics = Diagnostics {
        rssi: record.rssi,
        snr: record.snr,
    };

    let mut line = String::with_capacity(2 + 2 * payload.len() + 24);
    line.push(record.callsign);
    line.push(BINARY_PACKET_TYPE);
    line.push_str(&bytes_to_hex(&payload));
    if let Some(suffix) = diagnostics.to_suffix() {
        line.push_str(&suffix);
    }

    Ok(line)
}

/// Encode a record's binary payload
///
/// The tail is written only when both user inputs are present.
pub fn encode_payload(record: &TelemetryRecord) -> Result<Vec<u8>, EncodeError> {
    let with_tail = match (record.user_in1, record.user_in2) {
        (Some(_), Some(_)) => true,
        (None, None) => false,
        (in1, in2) => {
            tracing::warn!(
                "Dropping partial user-input tail (in1={:?}, in2={:?})",
                in1,
                in2
            );
            false
        }
    };

    let mut payload = vec![0u8; if with_tail { FULL_LEN } else { MANDATORY_LEN }];
    for spec in layout::fields(with_tail) {
        let value = field_value(record, spec.field);
        if !spec.fits(value) {
            return Err(EncodeError::FieldOutOfRange {
                field: spec.name,
                value,
            });
        }
        spec.write(&mut payload, value)?;
    }

    Ok(payload)
}

fn tail_present(len: usize) -> Result<bool, DecodeError> {
    match len {
        MANDATORY_LEN => Ok(false),
        FULL_LEN => Ok(true),
        len if len < MANDATORY_LEN => Err(DecodeError::IncompleteFrame {
            len,
            expected: MANDATORY_LEN,
        }),
        len if len < FULL_LEN => Err(DecodeError::IncompleteFrame {
            len,
            expected: FULL_LEN,
        }),
        len => Err(DecodeError::Oversized { len }),
    }
}

// Values come from reads bounded by the layout width and signedness, so
// each cast below is lossless.
fn apply_field(record: &mut TelemetryRecord, field: Field, value: i64) {
    match field {
        Field::Uid => record.uid = value as i16,
        Field::FirmwareVersion => record.firmware_version = value as i16,
        Field::RxChannel => record.rx_channel = value as i8,
        Field::TimeMpu => record.time_mpu = value as u32,
        Field::Status => record.status = FlightStatus::from_code(value as u8),
        Field::Altitude => record.altitude = value as i32,
        Field::SpeedVert => record.speed_vert = value as u16,
        Field::Acceleration => record.acceleration = Scaled::from_raw(value as i16),
        Field::Angle => record.angle = value as u8,
        Field::BattVoltage => record.batt_voltage = Scaled::from_raw(value as u16),
        Field::FlightTime => record.flight_time = Scaled::from_raw(value as u16),
        Field::Pyro => record.pyro = PyroStates::from_raw(value as u8),
        Field::LogStatus => record.log_status = value as u8,
        Field::GpsLat => record.gps_lat = Scaled::from_raw(value as i32),
        Field::GpsLng => record.gps_lng = Scaled::from_raw(value as i32),
        Field::GpsState => record.gps_state = value as u8,
        Field::WarnCode => record.warn_code = value as u8,
        Field::MessageKind => {
            let kind = MessageKind::from_code(value as u8);
            record.message = Message::from_raw(kind, record.message.raw());
        }
        Field::MessageValue => {
            record.message = Message::from_raw(record.message.kind(), value as u32);
        }
        Field::UserIn1 => record.user_in1 = Some(value as u32),
        Field::UserIn2 => record.user_in2 = Some(value as u16),
    }
}

fn field_value(record: &TelemetryRecord, field: Field) -> i64 {
    match field {
        Field::Uid => record.uid.into(),
        Field::FirmwareVersion => record.firmware_version.into(),
        Field::RxChannel => record.rx_channel.into(),
        Field::TimeMpu => record.time_mpu.into(),
        Field::Status => record.status.code().into(),
        Field::Altitude => record.altitude.into(),
        Field::SpeedVert => record.speed_vert.into(),
        Field::Acceleration => record.acceleration.raw().into(),
        Field::Angle => record.angle.into(),
        Field::BattVoltage => record.batt_voltage.raw().into(),
        Field::FlightTime => record.flight_time.raw().into(),
        Field::Pyro => record.pyro.raw().into(),
        Field::LogStatus => record.log_status.into(),
        Field::GpsLat => record.gps_lat.raw().into(),
        Field::GpsLng => record.gps_lng.raw().into(),
        Field::GpsState => record.gps_state.into(),
        Field::WarnCode => record.warn_code.into(),
        Field::MessageKind => record.message.kind().code().into(),
        Field::MessageValue => record.message.raw().into(),
        Field::UserIn1 => record.user_in1.unwrap_or_default().into(),
        Field::UserIn2 => record.user_in2.unwrap_or_default().into(),
    }
}

impl FromStr for TelemetryRecord {
    type Err = DecodeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        decode(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PyroState;
    use crate::scaled::{Deci, Micro, Milli};

    const GOLDEN: &str =
        "FB3E00070100BEDD01000000000000006C00AA89109CFF00650000000000000000000E53000000|Grssi-65/Gsnr6";

    fn sample_record() -> TelemetryRecord {
        TelemetryRecord {
            callsign: 'F',
            uid: 62,
            firmware_version: 262,
            rx_channel: -3,
            time_mpu: 123_456,
            status: FlightStatus::Ascent,
            altitude: -1_234,
            speed_vert: 250,
            acceleration: Deci::from_raw(-98),
            angle: 87,
            batt_voltage: Milli::from_raw(8_200),
            flight_time: Deci::from_raw(125),
            pyro: PyroStates::new(
                PyroState::Continuity,
                PyroState::Disabled,
                PyroState::EnabledOrFired,
            ),
            log_status: 1,
            gps_lat: Micro::from_raw(36_665_800),
            gps_lng: Micro::from_raw(-95_537_100),
            gps_state: 3,
            warn_code: 0,
            message: Message::from_raw(MessageKind::MaxAltitude, 1_234),
            user_in1: None,
            user_in2: None,
            rssi: Some(-65),
            snr: Some(6),
        }
    }

    #[test]
    fn test_decode_golden_header_and_status() {
        let record = decode(GOLDEN).unwrap();
        assert_eq!(record.callsign, 'F');
        assert_eq!(record.uid, 62);
        assert_eq!(record.status, FlightStatus::Idle);
        assert_eq!(record.rssi, Some(-65));
        assert_eq!(record.snr, Some(6));
    }

    #[test]
    fn test_golden_reencodes_identically() {
        let record = decode(GOLDEN).unwrap();
        assert_eq!(encode(&record).unwrap(), GOLDEN);
    }

    #[test]
    fn test_encode_layout() {
        let line = encode(&sample_record()).unwrap();
        assert!(line.starts_with("FB3E000601FD40E20100"));
        assert!(line.ends_with("|Grssi-65/Gsnr6"));
        let (frame, _) = line.split_once('|').unwrap();
        assert_eq!(frame.len(), 2 + 2 * MANDATORY_LEN);
    }

    #[test]
    fn test_round_trip() {
        let record = sample_record();
        assert_eq!(decode(&encode(&record).unwrap()).unwrap(), record);
    }

    #[test]
    fn test_tail_round_trip_big_endian() {
        let record = TelemetryRecord {
            user_in1: Some(0x0102_0304),
            user_in2: Some(0x0A0B),
            ..sample_record()
        };
        let payload = encode_payload(&record).unwrap();
        assert_eq!(payload.len(), FULL_LEN);
        assert_eq!(&payload[38..], &[0x01, 0x02, 0x03, 0x04, 0x0A, 0x0B]);
        assert_eq!(decode_payload(&payload).unwrap().user_in1, Some(0x0102_0304));
        assert_eq!(decode(&encode(&record).unwrap()).unwrap(), record);
    }

    #[test]
    fn test_partial_tail_is_not_written() {
        let record = TelemetryRecord {
            user_in1: Some(7),
            user_in2: None,
            ..sample_record()
        };
        assert_eq!(encode_payload(&record).unwrap().len(), MANDATORY_LEN);
        let decoded = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(decoded.user_in1, None);
        assert_eq!(decoded.user_in2, None);
    }

    #[test]
    fn test_length_policy() {
        assert_eq!(
            decode_payload(&[0u8; 37]),
            Err(DecodeError::IncompleteFrame {
                len: 37,
                expected: MANDATORY_LEN
            })
        );
        assert!(decode_payload(&[0u8; 38]).unwrap().user_in1.is_none());
        for len in 39..44 {
            assert_eq!(
                decode_payload(&vec![0u8; len]),
                Err(DecodeError::IncompleteFrame {
                    len,
                    expected: FULL_LEN
                })
            );
        }
        assert!(decode_payload(&[0u8; 44]).unwrap().user_in1.is_some());
        assert_eq!(
            decode_payload(&[0u8; 45]),
            Err(DecodeError::Oversized { len: 45 })
        );
    }

    #[test]
    fn test_empty_payload_is_incomplete() {
        assert_eq!(
            decode("FB|Grssi-65/Gsnr6"),
            Err(DecodeError::IncompleteFrame {
                len: 0,
                expected: MANDATORY_LEN
            })
        );
    }

    #[test]
    fn test_not_binary_packet() {
        assert_eq!(
            decode("FTHello from the pad"),
            Err(DecodeError::NotBinaryPacket {
                packet_type: Some('T')
            })
        );
    }

    #[test]
    fn test_lowercase_packet_type_accepted() {
        let lower = GOLDEN.replacen("FB", "Fb", 1);
        assert_eq!(decode(&lower).unwrap(), decode(GOLDEN).unwrap());
    }

    #[test]
    fn test_altitude_out_of_range() {
        let record = TelemetryRecord {
            altitude: 8_388_608,
            ..sample_record()
        };
        assert_eq!(
            encode(&record),
            Err(EncodeError::FieldOutOfRange {
                field: "altitude",
                value: 8_388_608
            })
        );
    }

    #[test]
    fn test_invalid_callsign() {
        for callsign in ['|', ' ', 'é'] {
            let record = TelemetryRecord {
                callsign,
                ..sample_record()
            };
            assert_eq!(encode(&record), Err(EncodeError::InvalidCallsign(callsign)));
        }
    }

    #[test]
    fn test_message_negation_on_decode() {
        let record = TelemetryRecord {
            message: Message::from_raw(MessageKind::MaxSpeed, 0xFF_FFFF),
            ..sample_record()
        };
        let decoded = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(decoded.message.raw(), 0xFF_FFFF);
        assert_eq!(decoded.message.value(), -16_777_215);
        assert_eq!(decoded.message.sign_extended(), -1);
    }

    #[test]
    fn test_message_packed_write() {
        let record = TelemetryRecord {
            message: Message::from_packed(0x4712_3456),
            ..sample_record()
        };
        let payload = encode_payload(&record).unwrap();
        assert_eq!(&payload[34..38], &[0x47, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_without_diagnostics() {
        let record = TelemetryRecord {
            rssi: None,
            snr: None,
            ..sample_record()
        };
        let line = encode(&record).unwrap();
        assert!(!line.contains('|'));
        assert_eq!(decode(&line).unwrap(), record);
    }

    #[test]
    fn test_from_str() {
        let record: TelemetryRecord = GOLDEN.parse().unwrap();
        assert_eq!(record.uid, 62);
    }
}
