//! Command-line interface definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::settings::{OutputFormat, Settings};

// =============================================================================
// CLI Definition
// =============================================================================

/// Ground station tools for Fluctus flight computer telemetry
#[derive(Parser, Debug)]
#[command(name = "fluctus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for decoded records (overrides settings)
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Callsign written when encoding (overrides settings)
    #[arg(long, global = true)]
    pub callsign: Option<char>,

    /// Device identifier written when encoding (overrides settings)
    #[arg(long, global = true)]
    pub uid: Option<i16>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode telemetry lines from a file or stdin
    Decode {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Minimum milliseconds between printed records
        #[arg(long, value_name = "MS")]
        throttle_ms: Option<u64>,
    },

    /// Convert an on-board CSV flight log into telemetry lines
    EncodeLog {
        /// Flight log CSV with header row
        csv: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print telemetry lines for a simulated flight
    Simulate {
        /// Stop after this many lines
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Emit lines at the configured interval instead of all at once
        #[arg(long)]
        realtime: bool,
    },

    /// Print an encoded uplink command
    Uplink {
        #[command(subcommand)]
        command: UplinkArgs,
    },

    /// Show the effective settings
    Config {
        /// Write the effective settings to the settings file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum UplinkArgs {
    /// Select radio band and channel
    Start {
        /// Radio band (0 or 1)
        #[arg(long)]
        band: u8,

        /// Radio channel (0 to 25)
        #[arg(long)]
        channel: u8,

        /// Device name (exactly 7 letters)
        #[arg(long, default_value = "Fluctus")]
        device: String,
    },

    /// Arm the flight computer
    Arm,

    /// Link check
    Ping,
}

impl Cli {
    /// Apply command-line overrides to loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(format) = self.format {
            settings.output = format;
        }
        if let Some(callsign) = self.callsign {
            settings.callsign = callsign;
        }
        if let Some(uid) = self.uid {
            settings.uid = uid;
        }
        if let Command::Decode {
            throttle_ms: Some(ms),
            ..
        } = self.command
        {
            settings.relay_throttle_ms = ms;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
