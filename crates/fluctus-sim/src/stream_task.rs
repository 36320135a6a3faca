//! Real-time simulated telemetry stream
//!
//! Writes one encoded line per interval to any `AsyncWrite`, standing in for
//! a ground receiver's serial output. Pair it with `tokio::io::duplex()` to
//! feed a stream reader without hardware.

use std::time::Duration;

use fluctus_protocol::encode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::SimError;
use crate::flight::FlightSimulator;

/// Commands that can be sent to a running simulation stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationCommand {
    /// Stop emitting records without ending the task
    SetPaused(bool),
    /// End the task
    Shutdown,
}

/// Run a simulated flight, writing one line per interval
///
/// Ends at touchdown, after `limit` lines, on shutdown, or when the command
/// sender is dropped. Returns the number of lines written.
pub async fn run_simulation_task<W>(
    mut writer: W,
    mut sim: FlightSimulator,
    period: Duration,
    limit: Option<u64>,
    mut cmd_rx: mpsc::Receiver<SimulationCommand>,
) -> Result<u64, SimError>
where
    W: AsyncWrite + Unpin,
{
    let mut ticker = interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut paused = false;
    let mut written = 0u64;

    info!("Starting simulated flight, one record every {:?}", period);

    while limit.map_or(true, |limit| written < limit) {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SimulationCommand::SetPaused(value)) => {
                        info!("Simulation paused: {}", value);
                        paused = value;
                    }
                    Some(SimulationCommand::Shutdown) => {
                        info!("Shutdown requested for simulation");
                        break;
                    }
                    None => {
                        debug!("Command channel closed for simulation");
                        break;
                    }
                }
            }

            _ = ticker.tick(), if !paused => {
                let Some(record) = sim.step() else {
                    info!("Simulated flight landed after {} ms", sim.elapsed_ms());
                    break;
                };

                let mut line = encode(&record)?;
                line.push('\n');
                if let Err(e) = writer.write_all(line.as_bytes()).await {
                    warn!("Simulation write failed: {}", e);
                    return Err(e.into());
                }
                writer.flush().await?;
                written += 1;
            }
        }
    }

    Ok(written)
}
