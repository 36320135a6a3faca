//! Ground-to-vehicle uplink commands
//!
//! Commands are newline-terminated ASCII:
//!
//! ```text
//! start<band><channel:02><device>   configure the radio link
//! startf                            arm the flight computer
//! ping                              link check, answered by "FCpong"
//! ```

use std::fmt;

use crate::error::CommandError;

/// Highest radio channel
pub const MAX_CHANNEL: u8 = 25;
/// Length of a device name, as forwarded by the ground bridge
pub const DEVICE_NAME_LEN: usize = 7;

const START_PREFIX: &str = "start";
const ARM: &str = "startf";
const PING: &str = "ping";
const START_OK: &str = "startok";
const PONG: &str = "fcpong";

/// A command sent to the flight computer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UplinkCommand {
    /// Select radio band and channel for a device
    Start {
        band: u8,
        channel: u8,
        device: String,
    },
    /// Arm the pyro channels
    Arm,
    /// Link check
    Ping,
}

impl UplinkCommand {
    /// Build a validated start command
    pub fn start(band: u8, channel: u8, device: impl Into<String>) -> Result<Self, CommandError> {
        let device = device.into();
        if band > 1 {
            return Err(CommandError::InvalidBand(band));
        }
        if channel > MAX_CHANNEL {
            return Err(CommandError::InvalidChannel(channel));
        }
        if device.len() != DEVICE_NAME_LEN
            || !device.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Err(CommandError::InvalidDevice(device));
        }
        Ok(Self::Start {
            band,
            channel,
            device,
        })
    }

    /// The command line, newline included
    pub fn encode(&self) -> String {
        format!("{}\n", self)
    }

    /// Parse a command line as sent by a ground station
    ///
    /// Returns `None` for anything that is not a well-formed command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line == ARM {
            return Some(Self::Arm);
        }
        if line == PING {
            return Some(Self::Ping);
        }

        let args = line.strip_prefix(START_PREFIX)?;
        let band = args.get(..1)?.parse().ok()?;
        let channel_digits = args.get(1..3)?;
        if !channel_digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let channel = channel_digits.parse().ok()?;
        Self::start(band, channel, &args[3..]).ok()
    }
}

impl fmt::Display for UplinkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start {
                band,
                channel,
                device,
            } => write!(f, "{START_PREFIX}{band}{channel:02}{device}"),
            Self::Arm => f.write_str(ARM),
            Self::Ping => f.write_str(PING),
        }
    }
}

/// An acknowledgement line from the flight computer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DownlinkReply {
    /// The start command was accepted
    StartOk,
    /// Answer to a ping
    Pong,
}

/// Recognise an acknowledgement among non-telemetry lines
pub fn parse_reply(line: &str) -> Option<DownlinkReply> {
    let line = line.trim();
    if line.contains(START_OK) {
        Some(DownlinkReply::StartOk)
    } else if line.eq_ignore_ascii_case(PONG) {
        Some(DownlinkReply::Pong)
    } else {
        None
    }
}
