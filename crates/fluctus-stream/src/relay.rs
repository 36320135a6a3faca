//! Fan-out of decoded telemetry to viewers
//!
//! The station that owns the radio decodes each line once and publishes the
//! record; any number of viewers subscribe. Records are shared, never copied
//! or modified. An optional minimum interval drops records that arrive
//! faster than viewers need them.

use std::sync::Arc;
use std::time::Duration;

use fluctus_protocol::TelemetryRecord;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::events::StreamEvent;

/// Default number of records buffered per viewer
pub const DEFAULT_CAPACITY: usize = 64;

/// Broadcast relay for decoded records
#[derive(Debug)]
pub struct TelemetryRelay {
    tx: broadcast::Sender<Arc<TelemetryRecord>>,
    min_interval: Option<Duration>,
    last_forwarded: Option<Instant>,
    forwarded: u64,
    throttled: u64,
}

impl TelemetryRelay {
    /// Create a relay; `min_interval` of `None` forwards every record
    pub fn new(capacity: usize, min_interval: Option<Duration>) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            min_interval: min_interval.filter(|d| !d.is_zero()),
            last_forwarded: None,
            forwarded: 0,
            throttled: 0,
        }
    }

    /// Subscribe a new viewer
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TelemetryRecord>> {
        self.tx.subscribe()
    }

    /// Number of connected viewers
    pub fn viewer_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish a record; returns whether it was forwarded
    ///
    /// A record is dropped when it arrives within the minimum interval of
    /// the last forwarded one. Having no viewers does not count as dropping.
    pub fn publish(&mut self, record: Arc<TelemetryRecord>) -> bool {
        let now = Instant::now();
        if let (Some(interval), Some(last)) = (self.min_interval, self.last_forwarded) {
            if now.duration_since(last) < interval {
                self.throttled += 1;
                trace!("Throttled record at t={}ms", record.time_mpu);
                return false;
            }
        }

        self.last_forwarded = Some(now);
        self.forwarded += 1;
        // No viewers is fine
        let _ = self.tx.send(record);
        true
    }

    /// Records forwarded so far
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Records dropped by throttling so far
    pub fn throttled(&self) -> u64 {
        self.throttled
    }
}

/// Publish every telemetry event from a reader until the stream closes
///
/// Non-telemetry events are ignored. Returns the relay for inspection.
pub async fn relay_events(
    mut event_rx: mpsc::Receiver<StreamEvent>,
    mut relay: TelemetryRelay,
) -> TelemetryRelay {
    while let Some(event) = event_rx.recv().await {
        match event {
            StreamEvent::Telemetry(record) => {
                relay.publish(Arc::new(*record));
            }
            StreamEvent::Closed => break,
            _ => {}
        }
    }
    debug!(
        "Relay finished: {} forwarded, {} throttled",
        relay.forwarded, relay.throttled
    );
    relay
}
