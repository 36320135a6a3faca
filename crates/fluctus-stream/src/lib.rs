//! Fluctus Telemetry Stream Handling
//!
//! This crate turns a byte stream from a ground receiver into telemetry
//! events and fans decoded records out to viewers.
//!
//! # Architecture
//!
//! - [`LineBuffer`] frames arbitrary read chunks into lines
//! - [`LineReader`] runs the read loop in its own task and emits a
//!   [`StreamEvent`] per line through an mpsc channel
//! - [`TelemetryRelay`] broadcasts decoded records to any number of viewers
//!
//! Opening the serial port is left to the caller; anything implementing
//! `AsyncRead` works.
//!
//! # Example
//!
//! ```rust,no_run
//! use fluctus_stream::{run_line_reader, StreamEvent};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> Result<(), fluctus_stream::StreamError> {
//! let (event_tx, mut event_rx) = mpsc::channel(64);
//! let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);
//!
//! tokio::spawn(run_line_reader(tokio::io::stdin(), event_tx, shutdown_rx));
//!
//! while let Some(event) = event_rx.recv().await {
//!     match event {
//!         StreamEvent::Telemetry(record) => println!("{}", record.summary()),
//!         StreamEvent::Closed => break,
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod line_buffer;
pub mod reader;
pub mod relay;

pub use error::StreamError;
pub use events::{ReaderStats, StreamEvent};
pub use line_buffer::{LineBuffer, MAX_LINE_LEN};
pub use reader::{classify_line, run_line_reader, LineReader, ReaderCommand};
pub use relay::{relay_events, TelemetryRelay};
