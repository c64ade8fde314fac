//! ISM-band pulse decoder
//!
//! Reads pulse/gap timing from a pulse extractor (process, file or stdin),
//! runs every configured protocol's demodulator over each captured pulse
//! train, and logs decoded bit rows and running statistics.

use anyhow::Result;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use ism_demod::config::Config;
use ism_demod::{
    builtin_protocols, load_protocols, BitBuffer, CaptureConfig, ProtocolDef, PulseCapture,
    PulseSource,
};

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    info!("===========================================");
    info!("   ISM Demod - pulse-train decoder");
    info!("===========================================");

    // Load configuration
    let config = Config::from_env();

    let protocols = match &config.protocols_path {
        Some(path) => {
            let defs = load_protocols(path)?;
            info!("Loaded {} protocol(s) from {}", defs.len(), path.display());
            defs
        }
        None => {
            let defs = builtin_protocols();
            info!("Using {} builtin protocol(s)", defs.len());
            defs
        }
    };

    info!("Configuration:");
    info!("  Pulse source: {}", config.pulse_source);
    if let Some(cmd) = &config.pulse_command {
        info!("  Pulse command: {}", cmd);
    }
    info!("  Stats interval: {}s", config.stats_interval_secs);
    for def in &protocols {
        info!(
            "  Protocol {}: short={} long={} reset={} min_bits={}",
            def.name, def.short_limit, def.long_limit, def.reset_limit, def.min_bits
        );
    }

    let source = match (&config.pulse_command, config.pulse_source.as_str()) {
        (Some(cmd), _) => PulseSource::Command(cmd.clone()),
        (None, "-") => PulseSource::Stdin,
        (None, path) => PulseSource::File(path.into()),
    };

    let capture = PulseCapture::new(CaptureConfig {
        source,
        channel_capacity: config.channel_capacity,
    });
    let train_rx = capture.start()?;

    let mut trains_processed = 0u64;
    let mut total_events = 0usize;
    let mut last_stats = Instant::now();

    // Main decode loop - receive pulse trains from the capture thread
    loop {
        match train_rx.recv_timeout(Duration::from_millis(500)) {
            Ok(train) => {
                trains_processed += 1;

                for def in &protocols {
                    let handler = |bits: &BitBuffer| log_message(def, bits);
                    let events = def.run(&train, Some(&handler));
                    total_events += events;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // No train received, fall through to periodic tasks
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                info!("Capture channel closed");
                break;
            }
        }

        // Periodic statistics
        if last_stats.elapsed() >= Duration::from_secs(config.stats_interval_secs) {
            let stats = capture.stats();
            info!(
                "[Stats] Trains: {} | Pulses: {} | Parse errors: {} | Events: {}",
                stats.trains_captured.load(Ordering::Relaxed),
                stats.pulses_captured.load(Ordering::Relaxed),
                stats.parse_errors.load(Ordering::Relaxed),
                total_events
            );
            last_stats = Instant::now();
        }

        if !capture.is_running() && train_rx.is_empty() {
            break;
        }
    }

    capture.stop();

    info!(
        "Shutdown complete. Trains processed: {}, Events: {}",
        trains_processed, total_events
    );
    Ok(())
}

/// Default message handler: log decoded rows, count the ones that meet the
/// protocol's minimum length
fn log_message(def: &ProtocolDef, bits: &BitBuffer) -> usize {
    let mut accepted = 0;

    for row in 0..bits.num_rows() {
        let len = bits.row_len(row);
        if len < def.min_bits {
            continue;
        }
        accepted += 1;
        info!(
            ">>> {} | {} | row {} | {:3} bits | {}",
            chrono::Utc::now().format("%H:%M:%S%.3f"),
            def.name,
            row,
            len,
            bits.row_hex(row)
        );
    }

    if accepted == 0 {
        debug!(
            "{}: message below minimum length ({} bits required)",
            def.name, def.min_bits
        );
    }
    accepted
}
