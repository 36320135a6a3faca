//! Events emitted by the line reader
//!
//! Every non-empty line produces exactly one event, so observers see the
//! stream in the order it was received.

use fluctus_protocol::{DecodeError, TelemetryRecord};

/// What the reader made of one line
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A decoded binary telemetry packet
    Telemetry(Box<TelemetryRecord>),

    /// A non-telemetry line (startup banner, command reply, debug text)
    Other(String),

    /// A binary line that failed to decode
    Malformed {
        /// The line as received
        line: String,
        /// Why it was rejected
        error: DecodeError,
    },

    /// The byte stream ended or the reader was shut down
    Closed,
}

/// Line counts for one reader run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Bytes read from the stream
    pub bytes: u64,
    /// Lines decoded as telemetry
    pub telemetry: u64,
    /// Lines passed through as text
    pub other: u64,
    /// Binary lines that failed to decode
    pub malformed: u64,
}

impl ReaderStats {
    /// Count the event produced for a line
    pub fn record(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Telemetry(_) => self.telemetry += 1,
            StreamEvent::Other(_) => self.other += 1,
            StreamEvent::Malformed { .. } => self.malformed += 1,
            StreamEvent::Closed => {}
        }
    }

    /// Total lines seen
    pub fn lines(&self) -> u64 {
        self.telemetry + self.other + self.malformed
    }
}
