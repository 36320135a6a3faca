//! Async line reader for telemetry streams
//!
//! Reads from any `AsyncRead` (a serial port opened by the caller, a TCP
//! socket, stdin, a file, or a `DuplexStream` in tests), splits the bytes
//! into lines and classifies each line. One bad line never stops the loop.

use fluctus_protocol::{decode, DecodeError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::error::StreamError;
use crate::events::{ReaderStats, StreamEvent};
use crate::line_buffer::LineBuffer;

const READ_CHUNK: usize = 1024;

/// Commands that can be sent to a running reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderCommand {
    /// Stop reading and emit [`StreamEvent::Closed`]
    Shutdown,
}

/// Classify one line
///
/// Returns `None` for blank lines.
pub fn classify_line(line: &str) -> Option<StreamEvent> {
    if line.trim().is_empty() {
        return None;
    }

    let event = match decode(line) {
        Ok(record) => StreamEvent::Telemetry(Box::new(record)),
        Err(DecodeError::NotBinaryPacket { .. }) => StreamEvent::Other(line.to_string()),
        Err(error) => StreamEvent::Malformed {
            line: line.to_string(),
            error,
        },
    };
    Some(event)
}

/// Line reader that runs in a spawned task
pub struct LineReader<T> {
    name: String,
    io: T,
    event_tx: mpsc::Sender<StreamEvent>,
    buffer: Vec<u8>,
    lines: LineBuffer,
    stats: ReaderStats,
}

impl<T> LineReader<T>
where
    T: AsyncRead + Unpin + Send,
{
    /// Create a reader over `io`; `name` only appears in logs
    pub fn new(name: impl Into<String>, io: T, event_tx: mpsc::Sender<StreamEvent>) -> Self {
        Self {
            name: name.into(),
            io,
            event_tx,
            buffer: vec![0u8; READ_CHUNK],
            lines: LineBuffer::new(),
            stats: ReaderStats::default(),
        }
    }

    /// Main read loop - runs until end of stream, a read error, shutdown, or
    /// the event receiver is dropped
    ///
    /// Dropping the command sender counts as a shutdown request.
    pub async fn run(
        mut self,
        mut cmd_rx: mpsc::Receiver<ReaderCommand>,
    ) -> Result<ReaderStats, StreamError> {
        info!("Starting line reader on {}", self.name);

        'read: loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ReaderCommand::Shutdown) | None => {
                            info!("Shutdown requested for reader on {}", self.name);
                            break;
                        }
                    }
                }

                result = self.io.read(&mut self.buffer) => {
                    match result {
                        Ok(0) => {
                            debug!("End of stream on {}", self.name);
                            if let Some(rest) = self.lines.take_remainder() {
                                self.emit_line(&rest).await;
                            }
                            break;
                        }
                        Ok(n) => {
                            self.stats.bytes += n as u64;
                            trace!("Read {} bytes from {}", n, self.name);
                            let lines = self.lines.append(&self.buffer[..n]);
                            for line in lines {
                                if !self.emit_line(&line).await {
                                    debug!("Event receiver dropped for {}", self.name);
                                    break 'read;
                                }
                            }
                        }
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                        Err(e) => {
                            warn!("Read error on {}: {}", self.name, e);
                            let _ = self.event_tx.send(StreamEvent::Closed).await;
                            return Err(e.into());
                        }
                    }
                }
            }
        }

        info!(
            "Line reader on {} ended: {} telemetry, {} other, {} malformed",
            self.name, self.stats.telemetry, self.stats.other, self.stats.malformed
        );
        let _ = self.event_tx.send(StreamEvent::Closed).await;
        Ok(self.stats)
    }

    /// Classify and forward a line; returns false once nobody is listening
    async fn emit_line(&mut self, line: &str) -> bool {
        let Some(event) = classify_line(line) else {
            return true;
        };

        match &event {
            StreamEvent::Malformed { line, error } => {
                warn!("Malformed line on {} ({}): {}", self.name, error, line);
            }
            StreamEvent::Other(line) => info!("{}: {}", self.name, line),
            _ => {}
        }
        self.stats.record(&event);
        self.event_tx.send(event).await.is_ok()
    }
}

/// Run a reader over `io` until it ends
pub async fn run_line_reader<T>(
    io: T,
    event_tx: mpsc::Sender<StreamEvent>,
    shutdown_rx: mpsc::Receiver<ReaderCommand>,
) -> Result<ReaderStats, StreamError>
where
    T: AsyncRead + Unpin + Send,
{
    LineReader::new("stream", io, event_tx).run(shutdown_rx).await
}
