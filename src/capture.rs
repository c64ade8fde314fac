//! Pulse-train capture from an external pulse extractor
//!
//! Spawns the pulse extractor process (or reads a recorded timing file or
//! stdin) and parses its pulse/gap output into pulse trains for the
//! demodulators. One line per pulse: `<pulse> <gap>` in decimal sample
//! counts; a blank line terminates the current train; `;` and `#` start
//! comment lines.

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, warn};

use crate::pulse::PulseTrain;

/// Where pulse timing lines come from
#[derive(Debug, Clone)]
pub enum PulseSource {
    /// Spawn an extractor command and read its stdout
    Command(String),
    /// Read a recorded timing file
    File(PathBuf),
    /// Read the process's own stdin
    Stdin,
}

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub source: PulseSource,
    /// Bound of the capture-to-decode channel
    pub channel_capacity: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: PulseSource::Stdin,
            channel_capacity: 64,
        }
    }
}

/// Statistics for pulse capture (atomic for thread-safe access)
#[derive(Debug, Default)]
pub struct CaptureStats {
    pub lines_read: AtomicU64,
    pub trains_captured: AtomicU64,
    pub pulses_captured: AtomicU64,
    pub parse_errors: AtomicU64,
}

impl CaptureStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// Pulse capture controller
pub struct PulseCapture {
    config: CaptureConfig,
    running: Arc<AtomicBool>,
    stats: Arc<CaptureStats>,
}

impl PulseCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            stats: CaptureStats::new(),
        }
    }

    /// Start capturing and return a receiver for pulse trains
    pub fn start(&self) -> Result<Receiver<PulseTrain>> {
        info!("Starting pulse capture from {:?}", self.config.source);

        let (train_tx, train_rx) = bounded::<PulseTrain>(self.config.channel_capacity);

        let config = self.config.clone();
        let running = self.running.clone();
        let stats = self.stats.clone();

        running.store(true, Ordering::SeqCst);

        thread::Builder::new()
            .name("pulse-capture".to_string())
            .spawn(move || {
                if let Err(e) = run_capture(config, running.clone(), stats, train_tx) {
                    error!("Pulse capture error: {}", e);
                }
                running.store(false, Ordering::SeqCst);
            })
            .context("Failed to spawn capture thread")?;

        Ok(train_rx)
    }

    /// Stop capturing
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the capture thread is still running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get statistics
    pub fn stats(&self) -> &Arc<CaptureStats> {
        &self.stats
    }
}

impl Drop for PulseCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Main capture loop (runs in a dedicated thread)
fn run_capture(
    config: CaptureConfig,
    running: Arc<AtomicBool>,
    stats: Arc<CaptureStats>,
    train_tx: Sender<PulseTrain>,
) -> Result<()> {
    let mut child = None;

    let reader: Box<dyn BufRead> = match &config.source {
        PulseSource::Command(command) => {
            let mut parts = command.split_whitespace();
            let program = parts.next().context("Empty pulse extractor command")?;

            let mut cmd = std::process::Command::new(program);
            cmd.args(parts)
                .stdout(std::process::Stdio::piped())
                .stderr(std::process::Stdio::piped());

            info!("Executing pulse extractor: {:?}", cmd);
            let mut spawned = cmd
                .spawn()
                .context("Failed to spawn pulse extractor process")?;

            let stdout = spawned
                .stdout
                .take()
                .context("Failed to capture extractor stdout")?;

            // Forward extractor stderr into our logs
            if let Some(stderr) = spawned.stderr.take() {
                thread::spawn(move || {
                    let reader = BufReader::new(stderr);
                    for line in reader.lines().map_while(|l| l.ok()) {
                        if !line.trim().is_empty() {
                            info!("[extractor] {}", line.trim());
                        }
                    }
                });
            }

            child = Some(spawned);
            Box::new(BufReader::new(stdout))
        }
        PulseSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open timing file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        PulseSource::Stdin => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut train = PulseTrain::new();

    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Error reading pulse source: {}", e);
                break;
            }
        };
        stats.lines_read.fetch_add(1, Ordering::Relaxed);

        let trimmed = line.trim();
        if trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            flush_train(&mut train, &train_tx, &stats);
            continue;
        }

        match parse_pulse_line(trimmed) {
            Some((pulse, gap)) => {
                train.push(pulse, gap);
                stats.pulses_captured.fetch_add(1, Ordering::Relaxed);
            }
            None => {
                stats.parse_errors.fetch_add(1, Ordering::Relaxed);
                debug!("Failed to parse timing line: {}", trimmed);
            }
        }
    }

    // EOF or stop: hand over any partial train
    flush_train(&mut train, &train_tx, &stats);

    if let Some(mut child) = child {
        let _ = child.kill();
    }

    info!(
        "Pulse capture stopped. Lines: {}, Trains: {}, Pulses: {}, Parse errors: {}",
        stats.lines_read.load(Ordering::Relaxed),
        stats.trains_captured.load(Ordering::Relaxed),
        stats.pulses_captured.load(Ordering::Relaxed),
        stats.parse_errors.load(Ordering::Relaxed)
    );

    Ok(())
}

fn flush_train(train: &mut PulseTrain, train_tx: &Sender<PulseTrain>, stats: &CaptureStats) {
    if train.is_empty() {
        return;
    }
    let complete = std::mem::take(train);
    stats.trains_captured.fetch_add(1, Ordering::Relaxed);
    if train_tx.try_send(complete).is_err() {
        warn!("Train channel full, dropping pulse train");
    }
}

/// Parse one timing line: `<pulse> <gap>` decimal sample counts
fn parse_pulse_line(line: &str) -> Option<(u32, u32)> {
    let mut fields = line.split_whitespace();
    let pulse = fields.next()?.parse().ok()?;
    let gap = fields.next()?.parse().ok()?;

    // Trailing fields mean the line is not in the expected format
    if fields.next().is_some() {
        return None;
    }
    Some((pulse, gap))
}
