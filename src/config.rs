//! Configuration loaded from environment variables

use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Pulse timing source: "-" for stdin, otherwise a file path
    pub pulse_source: String,

    /// Pulse extractor command to spawn instead of reading a file
    pub pulse_command: Option<String>,

    /// Protocol definition file (JSON); builtins are used when unset
    pub protocols_path: Option<PathBuf>,

    /// Statistics reporting interval in seconds
    pub stats_interval_secs: u64,

    /// Capture-to-decode channel capacity
    pub channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            pulse_source: std::env::var("PULSE_SOURCE").unwrap_or_else(|_| "-".to_string()),

            pulse_command: std::env::var("PULSE_COMMAND").ok(),

            protocols_path: std::env::var("PROTOCOLS_PATH").ok().map(PathBuf::from),

            stats_interval_secs: std::env::var("STATS_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),

            channel_capacity: std::env::var("CHANNEL_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64),
        }
    }
}
