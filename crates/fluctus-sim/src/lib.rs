//! Fluctus Telemetry Simulation Library
//!
//! This crate produces realistic Fluctus telemetry without a flight
//! computer or radio. It includes:
//!
//! - **FlightSimulator**: a scripted climb and descent, one record per tick
//! - **FlightLogConverter**: replays the on-board CSV flight log as telemetry
//! - **run_simulation_task**: streams simulated lines in real time to any
//!   `AsyncWrite`
//!
//! # Example
//!
//! ```rust
//! use fluctus_protocol::{encode, FlightStatus};
//! use fluctus_sim::{FlightSimulator, SimulationConfig};
//!
//! let sim = FlightSimulator::new(SimulationConfig::default()).unwrap();
//!
//! let mut last = None;
//! for record in sim {
//!     let line = encode(&record).unwrap();
//!     assert!(line.starts_with("FB"));
//!     last = Some(record);
//! }
//! assert_eq!(last.unwrap().status, FlightStatus::Touchdown);
//! ```

pub mod error;
pub mod flight;
pub mod flight_log;
pub mod stream_task;

pub use error::SimError;
pub use flight::{FlightSimulator, SimulationConfig};
pub use flight_log::{convert_reader, FlightLogConverter, FlightLogRow};
pub use stream_task::{run_simulation_task, SimulationCommand};
