//! Subcommand implementations

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use fluctus_protocol::{decode, encode, parse_reply, TelemetryRecord, UplinkCommand};
use fluctus_sim::{run_simulation_task, FlightSimulator, SimulationCommand};
use fluctus_stream::relay::DEFAULT_CAPACITY;
use fluctus_stream::{LineReader, StreamEvent, TelemetryRelay};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::UplinkArgs;
use crate::settings::{OutputFormat, Settings};

/// Decode lines from a file or stdin and print the records
pub async fn decode_stream(file: Option<PathBuf>, settings: &Settings) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel(64);
    // Held until the stream ends; dropping it would stop the reader
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

    let reader = match file {
        Some(path) => {
            let io = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            tokio::spawn(LineReader::new(path.display().to_string(), io, event_tx).run(shutdown_rx))
        }
        None => tokio::spawn(LineReader::new("stdin", tokio::io::stdin(), event_tx).run(shutdown_rx)),
    };

    let throttle = (settings.relay_throttle_ms > 0)
        .then(|| Duration::from_millis(settings.relay_throttle_ms));
    let mut relay = TelemetryRelay::new(DEFAULT_CAPACITY, throttle);

    while let Some(event) = event_rx.recv().await {
        match event {
            StreamEvent::Telemetry(record) => {
                let record = Arc::new(*record);
                if relay.publish(Arc::clone(&record)) {
                    print_record(&record, settings.output)?;
                }
            }
            StreamEvent::Other(line) => {
                if let Some(reply) = parse_reply(&line) {
                    info!("Flight computer replied {:?}", reply);
                }
            }
            StreamEvent::Malformed { .. } => {}
            StreamEvent::Closed => break,
        }
    }

    let stats = reader.await??;
    info!(
        "Decoded {} of {} lines ({} malformed, {} throttled)",
        stats.telemetry,
        stats.lines(),
        stats.malformed,
        relay.throttled()
    );
    Ok(())
}

fn print_record(record: &TelemetryRecord, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(record)?,
        OutputFormat::Summary => record.summary(),
    };
    writeln!(std::io::stdout().lock(), "{}", text)?;
    Ok(())
}

/// Convert a flight log to wire lines, checking each one decodes back
pub fn encode_log(csv: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    let input = File::open(csv).with_context(|| format!("Failed to open {}", csv.display()))?;
    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let mut written = 0u64;
    let mut skipped = 0u64;
    for (index, result) in settings.converter().convert_reader(input).enumerate() {
        // Header is line 1
        let line_number = index + 2;
        let line = match result.map_err(anyhow::Error::from).and_then(|record| {
            let line = encode(&record)?;
            Ok((record, line))
        }) {
            Ok((record, line)) => {
                match decode(&line) {
                    Ok(decoded) if decoded == record => {}
                    _ => warn!("Line {} does not decode back to the same record", line_number),
                }
                line
            }
            Err(e) => {
                warn!("Skipping line {}: {}", line_number, e);
                skipped += 1;
                continue;
            }
        };

        writeln!(out, "{}", line)?;
        written += 1;
    }
    out.flush()?;

    info!("Encoded {} rows, skipped {}", written, skipped);
    Ok(())
}

/// Print a simulated flight as wire lines
pub async fn simulate(count: Option<u64>, realtime: bool, settings: &Settings) -> Result<()> {
    let sim = FlightSimulator::new(settings.simulation_config())?;

    if realtime {
        let period = Duration::from_millis(sim.config().interval_ms);
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        let mut task = tokio::spawn(run_simulation_task(
            tokio::io::stdout(),
            sim,
            period,
            count,
            cmd_rx,
        ));

        let written = tokio::select! {
            result = &mut task => result??,
            _ = tokio::signal::ctrl_c() => {
                let _ = cmd_tx.send(SimulationCommand::Shutdown).await;
                task.await??
            }
        };
        info!("Simulation wrote {} lines", written);
        return Ok(());
    }

    let limit = count.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
    let mut out = BufWriter::new(std::io::stdout().lock());
    for record in sim.take(limit) {
        writeln!(out, "{}", encode(&record)?)?;
    }
    out.flush()?;
    Ok(())
}

/// Build the uplink command for the given arguments
pub fn uplink_command(args: UplinkArgs) -> Result<UplinkCommand> {
    let command = match args {
        UplinkArgs::Start {
            band,
            channel,
            device,
        } => UplinkCommand::start(band, channel, device)?,
        UplinkArgs::Arm => UplinkCommand::Arm,
        UplinkArgs::Ping => UplinkCommand::Ping,
    };
    Ok(command)
}

/// Print the effective settings, optionally saving them
pub fn show_config(save: bool, settings: &Settings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    if save {
        let path = settings.save()?;
        info!("Saved settings to {}", path.display());
    }
    Ok(())
}
