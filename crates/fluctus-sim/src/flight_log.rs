//! Flight computer CSV log conversion
//!
//! The flight computer records a CSV log on board. Converting each row to a
//! [`TelemetryRecord`] reproduces the stream the ground station would have
//! received, which is how ground software is exercised without a launch.
//!
//! Columns that have no telemetry counterpart (roll rate, temperature,
//! analog inputs, ...) are parsed but not transmitted.

use std::io::Read;

use fluctus_protocol::{
    Deci, FlightStatus, Message, Micro, Milli, PyroState, PyroStates, TelemetryRecord,
    DEFAULT_CALLSIGN,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;

/// One row of the on-board flight log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLogRow {
    #[serde(rename = "time (ms)")]
    pub time_ms: u32,
    #[serde(rename = "deltaTime (ms)")]
    pub delta_time_ms: f64,
    pub status: u8,
    #[serde(rename = "baro-altitude (m)")]
    pub baro_altitude: f64,
    #[serde(rename = "dedrck-v-speed (m/s)")]
    pub vertical_speed: f64,
    #[serde(rename = "angle (deg)")]
    pub angle: f64,
    #[serde(rename = "roll-rate (deg/s)")]
    pub roll_rate: f64,
    #[serde(rename = "vert-accel (m/s2)")]
    pub vertical_accel: f64,
    #[serde(rename = "accel (m/s2)")]
    pub accel: f64,
    #[serde(rename = "dedrck-alti (m)")]
    pub dead_reckoning_altitude: f64,
    #[serde(rename = "baro-speed (m/s)")]
    pub baro_speed: f64,
    #[serde(rename = "amb-temp (deg c)")]
    pub ambient_temp: f64,
    #[serde(rename = "batt-voltage (mV)")]
    pub batt_voltage_mv: f64,
    #[serde(rename = "P1-state")]
    pub p1_state: u8,
    #[serde(rename = "P2-state")]
    pub p2_state: u8,
    #[serde(rename = "P3-state")]
    pub p3_state: u8,
    #[serde(rename = "analog1 (mV)")]
    pub analog1_mv: f64,
    #[serde(rename = "analog2 (mV)")]
    pub analog2_mv: f64,
    #[serde(rename = "inFreefall")]
    pub in_freefall: u8,
    #[serde(rename = "gpsLat")]
    pub gps_lat: f64,
    #[serde(rename = "gpsLng")]
    pub gps_lng: f64,
    #[serde(rename = "gpsAltMSL")]
    pub gps_alt_msl: f64,
    #[serde(rename = "gpsState")]
    pub gps_state: u8,
    #[serde(rename = "gpsSats")]
    pub gps_sats: u8,
}

/// Turns flight-log rows into telemetry records
///
/// Fields the log does not carry are filled from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightLogConverter {
    pub callsign: char,
    pub uid: i16,
    pub firmware_version: i16,
    pub rssi: i32,
    pub snr: i32,
}

impl Default for FlightLogConverter {
    fn default() -> Self {
        Self {
            callsign: DEFAULT_CALLSIGN,
            uid: 62,
            firmware_version: 262,
            rssi: -65,
            snr: 6,
        }
    }
}

impl FlightLogConverter {
    /// Convert one row
    ///
    /// Physical values are truncated toward zero. The vertical speed field
    /// is unsigned, so descent rates are reported as their magnitude.
    pub fn convert(&self, row: &FlightLogRow) -> Result<TelemetryRecord, SimError> {
        let altitude = truncate("altitude", row.baro_altitude)?;
        let speed_vert = truncate("speed_vert", row.vertical_speed.abs())?;
        let angle = truncate("angle", row.angle)?;
        let batt_millivolts = truncate("batt_voltage", row.batt_voltage_mv)?;
        let flight_time = u16::try_from(row.time_ms / 100).map_err(|_| SimError::OutOfRange {
            field: "flight_time",
            value: f64::from(row.time_ms) / 1000.0,
        })?;

        Ok(TelemetryRecord {
            callsign: self.callsign,
            uid: self.uid,
            firmware_version: self.firmware_version,
            rx_channel: 0,
            time_mpu: row.time_ms,
            status: FlightStatus::from_code(row.status),
            altitude,
            speed_vert,
            acceleration: Deci::from_value(row.accel).map_err(scale_error("acceleration"))?,
            angle,
            batt_voltage: Milli::from_raw(batt_millivolts),
            flight_time: Deci::from_raw(flight_time),
            pyro: PyroStates::new(
                PyroState::from_bits(row.p1_state),
                PyroState::from_bits(row.p2_state),
                PyroState::from_bits(row.p3_state),
            ),
            log_status: 0,
            gps_lat: Micro::from_value(row.gps_lat).map_err(scale_error("gps_lat"))?,
            gps_lng: Micro::from_value(row.gps_lng).map_err(scale_error("gps_lng"))?,
            gps_state: row.gps_state,
            warn_code: 0,
            message: Message::default(),
            user_in1: None,
            user_in2: None,
            rssi: Some(self.rssi),
            snr: Some(self.snr),
        })
    }

    /// Convert every row of a CSV log with a header line
    ///
    /// Each row yields its own result, so a bad row can be skipped.
    pub fn convert_reader<R: Read>(
        self,
        reader: R,
    ) -> impl Iterator<Item = Result<TelemetryRecord, SimError>> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize::<FlightLogRow>()
            .map(move |row| {
                let row = row?;
                debug!("Converting log row at {} ms", row.time_ms);
                self.convert(&row)
            })
    }
}

/// Convert a CSV log with the default converter
pub fn convert_reader<R: Read>(
    reader: R,
) -> impl Iterator<Item = Result<TelemetryRecord, SimError>> {
    FlightLogConverter::default().convert_reader(reader)
}

fn truncate<T: TryFrom<i64>>(field: &'static str, value: f64) -> Result<T, SimError> {
    let out_of_range = || SimError::OutOfRange { field, value };
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    T::try_from(value.trunc() as i64).map_err(|_| out_of_range())
}

fn scale_error(field: &'static str) -> impl Fn(fluctus_protocol::ScaleError) -> SimError {
    move |source| SimError::Scale { field, source }
}
