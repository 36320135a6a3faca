//! Ground station settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use fluctus_protocol::DEFAULT_CALLSIGN;
use fluctus_sim::{FlightLogConverter, SimulationConfig};
use serde::{Deserialize, Serialize};

/// How decoded records are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// One human-readable line per record
    Summary,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Callsign written when encoding
    pub callsign: char,
    /// Device identifier written when encoding flight logs
    pub uid: i16,
    /// Firmware version written when encoding flight logs
    pub firmware_version: i16,
    /// Signal strength written for flight logs and simulated flights
    pub rssi: i32,
    /// Signal-to-noise ratio written for flight logs and simulated flights
    pub snr: i32,
    /// Output format for decoded records
    pub output: OutputFormat,
    /// Simulated flight parameters
    pub simulation: SimulationConfig,
    /// Minimum time between printed records while decoding (0 prints all)
    pub relay_throttle_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            callsign: DEFAULT_CALLSIGN,
            uid: 62,
            firmware_version: 262,
            rssi: -65,
            snr: 6,
            output: OutputFormat::default(),
            simulation: SimulationConfig::default(),
            relay_throttle_ms: 0,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for fluctus
    /// Uses $XDG_CONFIG_HOME/fluctus, falls back to ~/.config/fluctus
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("fluctus"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("fluctus"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::settings_path().context("Could not determine settings path")?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    /// Flight-log converter filling in the configured defaults
    pub fn converter(&self) -> FlightLogConverter {
        FlightLogConverter {
            callsign: self.callsign,
            uid: self.uid,
            firmware_version: self.firmware_version,
            rssi: self.rssi,
            snr: self.snr,
        }
    }

    /// Simulation parameters sharing the configured identity and link quality
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            callsign: self.callsign,
            uid: self.uid,
            firmware_version: self.firmware_version,
            rssi: self.rssi,
            snr: self.snr,
            ..self.simulation.clone()
        }
    }
}
