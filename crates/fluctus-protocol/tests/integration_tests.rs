//! Integration tests for the Fluctus telemetry codec
//!
//! These tests verify end-to-end behavior of line decoding and encoding:
//! - A reference frame decoded field by field
//! - Round trips for arbitrary records
//! - The payload length policy and odd-length hex handling
//! - Independence of the diagnostics suffix from the binary payload

use fluctus_protocol::layout::{FULL_LEN, MANDATORY_LEN};
use fluctus_protocol::{
    decode, encode, DecodeError, FlightStatus, MessageKind, PyroState, TelemetryRecord,
};

const GOLDEN: &str =
    "FB3E00070100BEDD01000000000000006C00AA89109CFF00650000000000000000000E53000000|Grssi-65/Gsnr6";

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    /// Build a line with callsign `F` around a raw payload
    pub fn line_for(payload: &[u8], suffix: &str) -> String {
        format!("FB{}{}", hex::encode_upper(payload), suffix)
    }

    /// Split a line into its frame and suffix (suffix includes the `|`)
    pub fn split_suffix(line: &str) -> (&str, &str) {
        match line.find('|') {
            Some(pos) => line.split_at(pos),
            None => (line, ""),
        }
    }
}

// ============================================================================
// Reference Frame
// ============================================================================

#[test]
fn test_golden_frame_fields() {
    let record = decode(GOLDEN).unwrap();

    assert_eq!(record.callsign, 'F');
    assert_eq!(record.uid, 62);
    assert_eq!(record.firmware_version, 263);
    assert_eq!(record.rx_channel, 0);
    assert_eq!(record.time_mpu, 122_302);
    assert_eq!(record.status, FlightStatus::Idle);
    assert_eq!(record.altitude, 0);
    assert_eq!(record.speed_vert, 0);
    assert_eq!(record.acceleration.raw(), 108);
    assert_eq!(record.acceleration.value(), 10.8);
    assert_eq!(record.angle, 170);
    assert_eq!(record.batt_voltage.raw(), 4233);
    assert_eq!(record.batt_voltage.value(), 4.233);
    assert_eq!(record.flight_time.raw(), 65_436);
    assert_eq!(record.flight_time.value(), 6543.6);
    assert_eq!(record.pyro.channels(), [PyroState::Disabled; 3]);
    assert_eq!(record.log_status, 101);
    assert_eq!(record.gps_lat.value(), 0.0);
    assert_eq!(record.gps_lng.value(), 0.0);
    assert_eq!(record.gps_state, 0);
    assert_eq!(record.warn_code, 14);
    assert_eq!(record.message.kind(), MessageKind::MaxSpeed);
    assert_eq!(record.message.value(), 0);
    assert_eq!(record.user_in1, None);
    assert_eq!(record.user_in2, None);
    assert_eq!(record.rssi, Some(-65));
    assert_eq!(record.snr, Some(6));
}

#[test]
fn test_golden_frame_reencodes() {
    assert_eq!(encode(&decode(GOLDEN).unwrap()).unwrap(), GOLDEN);
}

#[test]
fn test_golden_frame_with_tail() {
    let (frame, suffix) = helpers::split_suffix(GOLDEN);
    let line = format!("{frame}0000002A0007{suffix}");
    let record = decode(&line).unwrap();
    assert_eq!(record.user_in1, Some(42));
    assert_eq!(record.user_in2, Some(7));
    assert_eq!(encode(&record).unwrap(), line);
}

#[test]
fn test_status_error_code_preserved() {
    let mut payload = [0u8; MANDATORY_LEN];
    payload[9] = 7;
    let record = decode(&helpers::line_for(&payload, "")).unwrap();
    assert_eq!(record.status, FlightStatus::Error(7));
    assert_eq!(encode(&record).unwrap(), helpers::line_for(&payload, ""));
}

#[test]
fn test_message_high_bit_is_negated() {
    let mut payload = [0u8; MANDATORY_LEN];
    payload[34] = b'A';
    payload[35..38].copy_from_slice(&[0x01, 0x00, 0x80]);
    let record = decode(&helpers::line_for(&payload, "")).unwrap();
    assert_eq!(record.message.kind(), MessageKind::MaxAltitude);
    assert_eq!(record.message.value(), -8_388_609);
}

#[test]
fn test_text_lines_are_not_telemetry() {
    assert!(matches!(
        decode("FCpong"),
        Err(DecodeError::NotBinaryPacket { .. })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn test_json_uses_physical_values() {
    let value = serde_json::to_value(decode(GOLDEN).unwrap()).unwrap();
    assert_eq!(value["batt_voltage"], 4.233);
    assert_eq!(value["acceleration"], 10.8);
    assert_eq!(value["status"], "Idle");
}

#[cfg(feature = "serde")]
#[test]
fn test_json_round_trip_keeps_wire_values() {
    use fluctus_protocol::{Micro, Milli};

    let record = TelemetryRecord {
        batt_voltage: Milli::from_raw(1005),
        gps_lat: Micro::from_raw(36_665_800),
        ..decode(GOLDEN).unwrap()
    };
    let json = serde_json::to_string(&record).unwrap();
    let restored: TelemetryRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.batt_voltage.raw(), 1005);
    assert_eq!(restored.gps_lat.raw(), 36_665_800);
    assert_eq!(restored, record);
}

// ============================================================================
// Property Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use fluctus_protocol::{Deci, Message, Micro, Milli, PyroStates};
    use proptest::prelude::*;

    fn callsign() -> impl Strategy<Value = char> {
        (b'!'..=b'~')
            .prop_filter("separator is reserved", |b| *b != b'|')
            .prop_map(char::from)
    }

    fn header() -> impl Strategy<Value = (char, i16, i16, i8, u32, u8)> {
        (
            callsign(),
            any::<i16>(),
            any::<i16>(),
            any::<i8>(),
            any::<u32>(),
            any::<u8>(),
        )
    }

    fn flight() -> impl Strategy<Value = (i32, u16, i16, u8, u16, u16, u8, u8)> {
        (
            -8_388_608i32..=8_388_607,
            any::<u16>(),
            any::<i16>(),
            any::<u8>(),
            any::<u16>(),
            any::<u16>(),
            any::<u8>(),
            any::<u8>(),
        )
    }

    fn position() -> impl Strategy<Value = (i32, i32, u8, u8, u8, u32)> {
        (
            any::<i32>(),
            any::<i32>(),
            any::<u8>(),
            any::<u8>(),
            any::<u8>(),
            0u32..=0xFF_FFFF,
        )
    }

    fn extras() -> impl Strategy<Value = (Option<(u32, u16)>, Option<i32>, Option<i32>)> {
        (
            proptest::option::of((any::<u32>(), any::<u16>())),
            proptest::option::of(-150i32..=20),
            proptest::option::of(-20i32..=20),
        )
    }

    fn record() -> impl Strategy<Value = TelemetryRecord> {
        (header(), flight(), position(), extras()).prop_map(
            |(
                (callsign, uid, firmware_version, rx_channel, time_mpu, status),
                (altitude, speed_vert, accel, angle, batt, flight_time, pyro, log_status),
                (lat, lng, gps_state, warn_code, kind, raw),
                (tail, rssi, snr),
            )| TelemetryRecord {
                callsign,
                uid,
                firmware_version,
                rx_channel,
                time_mpu,
                status: FlightStatus::from_code(status),
                altitude,
                speed_vert,
                acceleration: Deci::from_raw(accel),
                angle,
                batt_voltage: Milli::from_raw(batt),
                flight_time: Deci::from_raw(flight_time),
                pyro: PyroStates::from_raw(pyro),
                log_status,
                gps_lat: Micro::from_raw(lat),
                gps_lng: Micro::from_raw(lng),
                gps_state,
                warn_code,
                message: Message::from_raw(MessageKind::from_code(kind), raw),
                user_in1: tail.map(|(in1, _)| in1),
                user_in2: tail.map(|(_, in2)| in2),
                rssi,
                snr,
            },
        )
    }

    proptest! {
        #[test]
        fn round_trip_preserves_record(record in record()) {
            let line = encode(&record).unwrap();
            prop_assert_eq!(decode(&line).unwrap(), record);
        }

        #[test]
        fn encoding_is_deterministic(record in record()) {
            prop_assert_eq!(encode(&record).unwrap(), encode(&record.clone()).unwrap());
        }

        #[test]
        fn decoding_is_deterministic(
            payload in prop_oneof![
                proptest::collection::vec(any::<u8>(), MANDATORY_LEN),
                proptest::collection::vec(any::<u8>(), FULL_LEN),
            ],
        ) {
            let line = helpers::line_for(&payload, "|Grssi-65/Gsnr6");
            let first = decode(&line);
            prop_assert!(first.is_ok());
            prop_assert_eq!(first, decode(&line));
        }

        #[test]
        fn trailing_nibble_is_ignored(record in record(), nibble in "[0-9A-F]") {
            let line = encode(&record).unwrap();
            let (frame, suffix) = helpers::split_suffix(&line);
            let odd = format!("{frame}{nibble}{suffix}");
            prop_assert_eq!(decode(&odd).unwrap(), record);
        }

        #[test]
        fn diagnostics_do_not_affect_payload(
            record in record(),
            rssi in -150i32..=20,
            snr in -20i32..=20,
        ) {
            let line = encode(&record).unwrap();
            let (frame, _) = helpers::split_suffix(&line);

            let plain = decode(frame).unwrap();
            let tagged = decode(&format!("{frame}|Grssi{rssi}/Gsnr{snr}")).unwrap();

            prop_assert_eq!(plain.rssi, None);
            prop_assert_eq!(tagged.rssi, Some(rssi));
            prop_assert_eq!(tagged.snr, Some(snr));
            prop_assert_eq!(
                TelemetryRecord { rssi: None, snr: None, ..tagged },
                plain
            );
        }

        #[test]
        fn enumerations_never_fail(status in any::<u8>(), pyro in any::<u8>(), kind in any::<u8>()) {
            let mut payload = [0u8; MANDATORY_LEN];
            payload[9] = status;
            payload[22] = pyro;
            payload[34] = kind;
            let record = decode(&helpers::line_for(&payload, "")).unwrap();
            prop_assert_eq!(record.status.code(), status);
            prop_assert_eq!(record.pyro.raw(), pyro);
            prop_assert_eq!(record.message.kind().code(), kind);
        }

        #[test]
        fn length_policy(len in 0usize..=60) {
            let payload = vec![0u8; len];
            let result = decode(&helpers::line_for(&payload, "|Grssi-65/Gsnr6"));
            match len {
                MANDATORY_LEN => {
                    prop_assert!(result.unwrap().user_in1.is_none());
                }
                FULL_LEN => {
                    prop_assert!(result.unwrap().user_in1.is_some());
                }
                len if len < MANDATORY_LEN => {
                    prop_assert_eq!(
                        result,
                        Err(DecodeError::IncompleteFrame { len, expected: MANDATORY_LEN })
                    );
                }
                len if len < FULL_LEN => {
                    prop_assert_eq!(
                        result,
                        Err(DecodeError::IncompleteFrame { len, expected: FULL_LEN })
                    );
                }
                len => {
                    prop_assert_eq!(result, Err(DecodeError::Oversized { len }));
                }
            }
        }
    }
}
