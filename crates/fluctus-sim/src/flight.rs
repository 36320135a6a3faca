//! Simulated flight profile
//!
//! Produces the telemetry a flight computer would send during a simple
//! flight: a slow climb, a fast climb, then a steady descent to the ground.
//!
//! ```text
//!   t < 100 s   +5 m per tick
//!   t < 200 s   +50 m per tick
//!   after       -10 m per tick until altitude 0
//! ```
//!
//! Per-tick altitude steps do not depend on the tick length, so a shorter
//! tick gives a faster climb.

use fluctus_protocol::{
    Deci, FlightStatus, Message, MessageKind, Micro, Milli, PyroState, PyroStates,
    TelemetryRecord, DEFAULT_CALLSIGN,
};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

const ARM_HOLD_MS: u32 = 10_000;
const BOOST_END_MS: u32 = 100_000;
const COAST_END_MS: u32 = 200_000;

const BOOST_STEP_M: i32 = 5;
const COAST_STEP_M: i32 = 50;
const DESCENT_STEP_M: i32 = 10;

/// 9.8 m/s²
const ACCELERATION_DECI: i16 = 98;
/// 8.2 V
const BATTERY_MILLIVOLTS: u16 = 8_200;
const GPS_FIX_3D: u8 = 3;

/// Configuration for a simulated flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Header callsign
    pub callsign: char,
    /// Device identifier
    pub uid: i16,
    /// Reported firmware version
    pub firmware_version: i16,
    /// Simulated time per record in milliseconds
    pub tick_ms: u32,
    /// Wall-clock time between records when streaming, in milliseconds
    pub interval_ms: u64,
    /// Launch site latitude in degrees
    pub launch_lat: f64,
    /// Launch site longitude in degrees
    pub launch_lng: f64,
    /// Reported signal strength
    pub rssi: i32,
    /// Reported signal-to-noise ratio
    pub snr: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            callsign: DEFAULT_CALLSIGN,
            uid: 62,
            firmware_version: 262,
            tick_ms: 500,
            interval_ms: 200, // 5 Hz
            launch_lat: 36.6658,
            launch_lng: -95.5371,
            rssi: -65,
            snr: 6,
        }
    }
}

/// A simulated flight, yielding one record per tick until touchdown
#[derive(Debug, Clone)]
pub struct FlightSimulator {
    config: SimulationConfig,
    launch_lat: Micro<i32>,
    launch_lng: Micro<i32>,
    elapsed_ms: u32,
    altitude: i32,
    peak_altitude: i32,
    landed: bool,
}

impl FlightSimulator {
    /// Create a simulator; fails if the launch site is not a valid coordinate
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        let launch_lat = Micro::from_value(config.launch_lat).map_err(|source| SimError::Scale {
            field: "launch_lat",
            source,
        })?;
        let launch_lng = Micro::from_value(config.launch_lng).map_err(|source| SimError::Scale {
            field: "launch_lng",
            source,
        })?;

        Ok(Self {
            config: SimulationConfig {
                tick_ms: config.tick_ms.max(1),
                ..config
            },
            launch_lat,
            launch_lng,
            elapsed_ms: 0,
            altitude: 0,
            peak_altitude: 0,
            landed: false,
        })
    }

    /// The effective configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulated time since launch in milliseconds
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Current altitude in meters
    pub fn altitude(&self) -> i32 {
        self.altitude
    }

    /// Returns whether the flight has ended
    pub fn is_landed(&self) -> bool {
        self.landed
    }

    /// Advance one tick and return the record for it
    ///
    /// Returns `None` once the touchdown record has been produced.
    pub fn step(&mut self) -> Option<TelemetryRecord> {
        if self.landed {
            return None;
        }

        let speed = if self.elapsed_ms < BOOST_END_MS {
            BOOST_STEP_M
        } else if self.elapsed_ms < COAST_END_MS {
            COAST_STEP_M
        } else {
            -DESCENT_STEP_M
        };
        self.altitude = (self.altitude + speed).max(0);
        self.peak_altitude = self.peak_altitude.max(self.altitude);
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.config.tick_ms);

        let status = if self.elapsed_ms <= ARM_HOLD_MS {
            FlightStatus::Armed
        } else if speed > 0 {
            FlightStatus::Ascent
        } else if self.altitude > 0 {
            FlightStatus::Descent
        } else {
            self.landed = true;
            FlightStatus::Touchdown
        };

        let speed = if self.landed { 0 } else { speed };
        Some(self.record(status, speed))
    }

    fn record(&self, status: FlightStatus, speed: i32) -> TelemetryRecord {
        // 1e-5 degrees of drift per second is 1 micro-degree per 100 ms
        let drift = i32::try_from(self.elapsed_ms / 100).unwrap_or(i32::MAX);
        let flight_time = u16::try_from(self.elapsed_ms / 100).unwrap_or(u16::MAX);

        TelemetryRecord {
            callsign: self.config.callsign,
            uid: self.config.uid,
            firmware_version: self.config.firmware_version,
            rx_channel: 0,
            time_mpu: self.elapsed_ms,
            status,
            altitude: self.altitude,
            // Unsigned on the wire: descent reports its magnitude
            speed_vert: speed.unsigned_abs() as u16,
            acceleration: Deci::from_raw(ACCELERATION_DECI),
            angle: 0,
            batt_voltage: Milli::from_raw(BATTERY_MILLIVOLTS),
            flight_time: Deci::from_raw(flight_time),
            pyro: PyroStates::new(
                PyroState::Continuity,
                PyroState::Disabled,
                PyroState::Reserved,
            ),
            log_status: 0,
            gps_lat: Micro::from_raw(self.launch_lat.raw().saturating_add(drift)),
            gps_lng: self.launch_lng,
            gps_state: GPS_FIX_3D,
            warn_code: 0,
            message: Message::from_raw(MessageKind::MaxAltitude, self.peak_altitude as u32),
            user_in1: None,
            user_in2: None,
            rssi: Some(self.config.rssi),
            snr: Some(self.config.snr),
        }
    }
}

impl Iterator for FlightSimulator {
    type Item = TelemetryRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}
