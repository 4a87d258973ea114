//! SDK configuration
//!
//! Loaded from a JSON file so the CLI and integration harnesses can change
//! engine verbosity, telemetry buffering and the stub device table without
//! recompiling. Every field is optional in the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::{AudioDevice, DeviceDirection, LogLevel};

/// Complete SDK configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Native log level applied right after a successful init; `None`
    /// leaves the engine default in place
    pub log_level: Option<LogLevel>,
    /// Capacity of the telemetry broadcast channel
    pub telemetry_buffer: usize,
    /// Device table used to seed the stub engine
    pub stub_devices: Vec<AudioDevice>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            telemetry_buffer: 128,
            stub_devices: vec![
                AudioDevice::new("dev1", "Mic", DeviceDirection::Input),
                AudioDevice::new("dev2", "Speaker", DeviceDirection::Output),
            ],
        }
    }
}

impl SdkConfig {
    /// Load configuration from a JSON file
    ///
    /// A missing or unparsable file falls back to [`SdkConfig::default`]
    /// with a warning.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
