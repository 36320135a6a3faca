//! Newline framing for byte streams
//!
//! Serial reads return arbitrary chunks; a line may arrive split over
//! several reads or several lines may arrive in one. [`LineBuffer`] keeps the
//! unterminated tail between calls.

use tracing::warn;

/// Longest partial line kept while waiting for its newline
///
/// A telemetry line with tail and diagnostics is under 128 bytes, so
/// anything this long is noise on the link.
pub const MAX_LINE_LEN: usize = 4096;

/// Accumulates bytes and yields complete lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk and return every line it completes
    ///
    /// Lines are returned without their `\n` and without a trailing `\r`.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn append(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }

        if self.pending.len() > MAX_LINE_LEN {
            let excess = self.pending.len() - MAX_LINE_LEN;
            warn!("Partial line exceeds {} bytes, dropping {} bytes", MAX_LINE_LEN, excess);
            self.pending.drain(..excess);
        }

        lines
    }

    /// Bytes received since the last newline
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Take the unterminated remainder, if any (used at end of stream)
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        let rest = rest.strip_suffix(b"\r").unwrap_or(&rest[..]);
        Some(String::from_utf8_lossy(rest).into_owned())
    }
}
