//! Decoded telemetry record and its enumerations
//!
//! A [`TelemetryRecord`] is fully determined by a 38 or 44 byte payload plus
//! the diagnostics suffix of its line. Enumerated fields keep unmapped codes
//! in a sentinel variant so that decoding never fails on them and
//! re-encoding reproduces the original byte.

use std::fmt;

use crate::scaled::{Deci, Micro, Milli};
use crate::width::{self, U24_MASK};

/// Callsign used when none is known
pub const DEFAULT_CALLSIGN: char = 'F';

/// Flight computer state machine status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlightStatus {
    /// On the pad, not armed
    #[default]
    Idle,
    /// Pyro channels armed
    Armed,
    /// Launch countdown running
    CountdownEngaged,
    /// Countdown finished, waiting for liftoff detection
    WaitingForLaunch,
    /// Powered or coasting ascent
    Ascent,
    /// Under drogue or main
    Descent,
    /// Landed
    Touchdown,
    /// Any code from 7 to 255 (the raw code is kept)
    Error(u8),
}

impl FlightStatus {
    /// Map a status byte, never failing
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Idle,
            1 => Self::Armed,
            2 => Self::CountdownEngaged,
            3 => Self::WaitingForLaunch,
            4 => Self::Ascent,
            5 => Self::Descent,
            6 => Self::Touchdown,
            other => Self::Error(other),
        }
    }

    /// The status byte on the wire
    pub fn code(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Armed => 1,
            Self::CountdownEngaged => 2,
            Self::WaitingForLaunch => 3,
            Self::Ascent => 4,
            Self::Descent => 5,
            Self::Touchdown => 6,
            Self::Error(code) => *code,
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Armed => "Armed",
            Self::CountdownEngaged => "Countdown Engaged",
            Self::WaitingForLaunch => "Waiting for Launch",
            Self::Ascent => "Ascent",
            Self::Descent => "Descent",
            Self::Touchdown => "Touchdown",
            Self::Error(_) => "Error",
        }
    }

    /// Returns whether the vehicle is airborne
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Ascent | Self::Descent)
    }
}

impl From<u8> for FlightStatus {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

/// State of a single pyro channel (two bits of the pyro byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PyroState {
    /// Channel disabled
    #[default]
    Disabled,
    /// Igniter continuity detected
    Continuity,
    /// Code 2 is unassigned; reported as an error state
    Reserved,
    /// Channel enabled or already fired
    EnabledOrFired,
}

impl PyroState {
    /// Decode the low two bits of `bits`
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Disabled,
            1 => Self::Continuity,
            2 => Self::Reserved,
            _ => Self::EnabledOrFired,
        }
    }

    /// The two-bit code
    pub fn bits(&self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::Continuity => 1,
            Self::Reserved => 2,
            Self::EnabledOrFired => 3,
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Continuity => "Continuity",
            Self::Reserved => "Error",
            Self::EnabledOrFired => "Enabled / Fired",
        }
    }
}

/// The pyro byte: channel A in bits 0-1, B in bits 2-3, C in bits 4-5
///
/// Bits 6-7 are unused but kept so the byte re-encodes unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PyroStates(u8);

impl PyroStates {
    /// Build from channel states
    pub fn new(a: PyroState, b: PyroState, c: PyroState) -> Self {
        Self(a.bits() | (b.bits() << 2) | (c.bits() << 4))
    }

    /// Wrap the raw byte
    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// The raw byte
    pub fn raw(&self) -> u8 {
        self.0
    }

    /// Channel A
    pub fn a(&self) -> PyroState {
        PyroState::from_bits(self.0)
    }

    /// Channel B
    pub fn b(&self) -> PyroState {
        PyroState::from_bits(self.0 >> 2)
    }

    /// Channel C
    pub fn c(&self) -> PyroState {
        PyroState::from_bits(self.0 >> 4)
    }

    /// All three channels in A, B, C order
    pub fn channels(&self) -> [PyroState; 3] {
        [self.a(), self.b(), self.c()]
    }
}

/// What the message field reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// `'A'`: peak altitude
    MaxAltitude,
    /// `'S'`: peak vertical speed
    MaxSpeed,
    /// `'G'`: peak acceleration
    MaxAcceleration,
    /// Any other kind byte, including 0 (kept as received)
    Unknown(u8),
}

impl Default for MessageKind {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl MessageKind {
    /// Map a kind byte, never failing
    pub fn from_code(code: u8) -> Self {
        match code {
            b'A' => Self::MaxAltitude,
            b'S' => Self::MaxSpeed,
            b'G' => Self::MaxAcceleration,
            other => Self::Unknown(other),
        }
    }

    /// The kind byte on the wire
    pub fn code(&self) -> u8 {
        match self {
            Self::MaxAltitude => b'A',
            Self::MaxSpeed => b'S',
            Self::MaxAcceleration => b'G',
            Self::Unknown(code) => *code,
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::MaxAltitude => "Max Altitude",
            Self::MaxSpeed => "Max Speed",
            Self::MaxAcceleration => "Max Acceleration",
            Self::Unknown(_) => "Error",
        }
    }
}

/// The 4-byte message field: one kind byte and 24 value bits
///
/// The value bits are stored exactly as transmitted. Two conventions exist
/// for turning them into a number, and both are exposed:
///
/// - [`Message::value`]: the decoder convention, which negates the unsigned
///   magnitude when bit 23 is set (see [`width::negate_if_high_bit_set`])
/// - [`Message::with_value`] / [`Message::from_packed`]: the encoder
///   convention, which packs `kind << 24 | value & 0xFFFFFF`
///
/// The two only agree for values in `0..=0x7FFFFF` and for `-0x800000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    kind: MessageKind,
    raw: u32,
}

impl Message {
    /// Build from a kind and the 24 value bits (higher bits are dropped)
    pub fn from_raw(kind: MessageKind, raw: u32) -> Self {
        Self {
            kind,
            raw: raw & U24_MASK,
        }
    }

    /// Build from the encoder's combined form `kind << 24 | value & 0xFFFFFF`
    pub fn from_packed(packed: u32) -> Self {
        Self::from_raw(MessageKind::from_code((packed >> 24) as u8), packed)
    }

    /// Pack a signed value with the encoder convention (`value & 0xFFFFFF`)
    ///
    /// For negative values the result does not decode back to `value`
    /// through [`Message::value`].
    pub fn with_value(kind: MessageKind, value: i32) -> Self {
        Self::from_raw(kind, value as u32)
    }

    /// Build a message whose [`Message::value`] is exactly `value`
    ///
    /// Returns `None` when the decoder convention cannot produce `value`.
    pub fn from_decoded_value(kind: MessageKind, value: i32) -> Option<Self> {
        width::unnegate(value).map(|raw| Self::from_raw(kind, raw))
    }

    /// The message kind
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The 24 value bits as transmitted
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// The encoder's combined form `kind << 24 | value bits`
    pub fn packed(&self) -> u32 {
        (u32::from(self.kind.code()) << 24) | self.raw
    }

    /// The value as the ground decoder reports it (negate-if-high-bit)
    pub fn value(&self) -> i32 {
        width::negate_if_high_bit_set(self.raw)
    }

    /// The value read as ordinary 24-bit two's complement
    pub fn sign_extended(&self) -> i32 {
        width::sign_extend_24(self.raw)
    }
}

/// One decoded telemetry packet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    /// Header callsign character
    pub callsign: char,
    /// Device identifier
    pub uid: i16,
    /// Flight computer firmware version
    pub firmware_version: i16,
    /// Radio receive channel
    pub rx_channel: i8,
    /// Onboard clock in milliseconds
    pub time_mpu: u32,
    /// State machine status
    pub status: FlightStatus,
    /// Altitude in meters (24 bits on the wire)
    pub altitude: i32,
    /// Vertical speed in m/s
    pub speed_vert: u16,
    /// Acceleration in m/s²
    pub acceleration: Deci<i16>,
    /// Tilt angle in degrees
    pub angle: u8,
    /// Battery voltage in volts
    pub batt_voltage: Milli<u16>,
    /// Flight time in seconds
    pub flight_time: Deci<u16>,
    /// Pyro channel states
    pub pyro: PyroStates,
    /// Onboard logger status
    pub log_status: u8,
    /// GPS latitude in degrees
    pub gps_lat: Micro<i32>,
    /// GPS longitude in degrees
    pub gps_lng: Micro<i32>,
    /// GPS fix state
    pub gps_state: u8,
    /// Warning code
    pub warn_code: u8,
    /// Peak-value message
    pub message: Message,
    /// First user input (tail)
    pub user_in1: Option<u32>,
    /// Second user input (tail)
    pub user_in2: Option<u16>,
    /// Received signal strength from the diagnostics suffix
    pub rssi: Option<i32>,
    /// Signal-to-noise ratio from the diagnostics suffix
    pub snr: Option<i32>,
}

impl Default for TelemetryRecord {
    fn default() -> Self {
        Self {
            callsign: DEFAULT_CALLSIGN,
            uid: 0,
            firmware_version: 0,
            rx_channel: 0,
            time_mpu: 0,
            status: FlightStatus::default(),
            altitude: 0,
            speed_vert: 0,
            acceleration: Deci::default(),
            angle: 0,
            batt_voltage: Milli::default(),
            flight_time: Deci::default(),
            pyro: PyroStates::default(),
            log_status: 0,
            gps_lat: Micro::default(),
            gps_lng: Micro::default(),
            gps_state: 0,
            warn_code: 0,
            message: Message::default(),
            user_in1: None,
            user_in2: None,
            rssi: None,
            snr: None,
        }
    }
}

impl TelemetryRecord {
    /// Returns whether the optional user-input tail is carried
    pub fn has_tail(&self) -> bool {
        self.user_in1.is_some() && self.user_in2.is_some()
    }

    /// One-line rendering for logs and terminals
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} uid={} fw={} t={}ms {} alt={}m v={}m/s a={}m/s² angle={}° batt={}V time={}s",
            self.callsign,
            self.uid,
            self.firmware_version,
            self.time_mpu,
            self.status.label(),
            self.altitude,
            self.speed_vert,
            self.acceleration,
            self.angle,
            self.batt_voltage,
            self.flight_time,
        )?;

        let [a, b, c] = self.pyro.channels();
        write!(
            f,
            " pyro=[{}, {}, {}] gps=({}, {}) fix={} warn={} {}={}",
            a.label(),
            b.label(),
            c.label(),
            self.gps_lat,
            self.gps_lng,
            self.gps_state,
            self.warn_code,
            self.message.kind().label(),
            self.message.value(),
        )?;

        if let (Some(in1), Some(in2)) = (self.user_in1, self.user_in2) {
            write!(f, " in1={} in2={}", in1, in2)?;
        }
        if let Some(rssi) = self.rssi {
            write!(f, " rssi={}", rssi)?;
        }
        if let Some(snr) = self.snr {
            write!(f, " snr={}", snr)?;
        }
        Ok(())
    }
}
