//! Protocol definitions and demodulator dispatch
//!
//! A protocol definition selects one demodulation algorithm, its timing
//! limits, and the demodulator-specific argument for a logical radio
//! protocol. Definitions are plain data, loadable from a JSON file, and
//! dispatch to the matching demodulator entry point.

use crate::demod::{
    demod_manchester_zerobit, demod_pcm, demod_ppm, demod_pwm, demod_pwm_precise,
    demod_pwm_ternary, DemodArg, DemodContext, MessageHandler, PwmPreciseParams, TernarySync,
};
use crate::pulse::PulseTrain;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Demodulation algorithm selection, with the per-family argument
/// resolved at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "modulation", rename_all = "snake_case")]
pub enum Modulation {
    OokPcm,
    OokPpm,
    OokPwm {
        /// Discard a leading start bit per sub-message
        #[serde(default)]
        start_bit: bool,
    },
    OokPwmPrecise {
        pulse_tolerance: u32,
        #[serde(default)]
        pulse_sync_width: u32,
    },
    OokPwmTernary {
        sync_bit: TernarySync,
    },
    OokManchesterZerobit,
}

impl Modulation {
    fn arg(&self) -> DemodArg {
        match *self {
            Modulation::OokPwm { start_bit: true } => DemodArg::StartBit,
            Modulation::OokPwmPrecise {
                pulse_tolerance,
                pulse_sync_width,
            } => DemodArg::Precise(PwmPreciseParams {
                pulse_tolerance,
                pulse_sync_width,
            }),
            Modulation::OokPwmTernary { sync_bit } => DemodArg::SyncBit(sync_bit),
            _ => DemodArg::None,
        }
    }
}

/// One registered radio protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolDef {
    pub name: String,

    #[serde(flatten)]
    pub modulation: Modulation,

    /// Pulse/gap classification thresholds, sample counts
    pub short_limit: u32,
    pub long_limit: u32,
    pub reset_limit: u32,

    /// Minimum bits in the first row for a decoded message to count
    #[serde(default)]
    pub min_bits: usize,
}

impl ProtocolDef {
    /// Run the matching demodulator over one pulse train
    pub fn run(&self, pulses: &PulseTrain, handler: Option<&dyn MessageHandler>) -> usize {
        let ctx = DemodContext {
            name: &self.name,
            short_limit: self.short_limit,
            long_limit: self.long_limit,
            reset_limit: self.reset_limit,
            arg: self.modulation.arg(),
            handler,
        };

        match self.modulation {
            Modulation::OokPcm => demod_pcm(pulses, &ctx),
            Modulation::OokPpm => demod_ppm(pulses, &ctx),
            Modulation::OokPwm { .. } => demod_pwm(pulses, &ctx),
            Modulation::OokPwmPrecise { .. } => demod_pwm_precise(pulses, &ctx),
            Modulation::OokPwmTernary { .. } => demod_pwm_ternary(pulses, &ctx),
            Modulation::OokManchesterZerobit => demod_manchester_zerobit(pulses, &ctx),
        }
    }
}

/// Protocol definition loading errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to read protocol definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse protocol definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load protocol definitions from a JSON array file
pub fn load_protocols(path: &Path) -> Result<Vec<ProtocolDef>, ProtocolError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Default definitions, one per modulation family
pub fn builtin_protocols() -> Vec<ProtocolDef> {
    vec![
        ProtocolDef {
            name: "ppm-remote".to_string(),
            modulation: Modulation::OokPpm,
            short_limit: 500,
            long_limit: 1500,
            reset_limit: 5000,
            min_bits: 16,
        },
        ProtocolDef {
            name: "pwm-sensor".to_string(),
            modulation: Modulation::OokPwm { start_bit: false },
            short_limit: 500,
            long_limit: 1000,
            reset_limit: 3000,
            min_bits: 16,
        },
        ProtocolDef {
            name: "pwm-precise-switch".to_string(),
            modulation: Modulation::OokPwmPrecise {
                pulse_tolerance: 100,
                pulse_sync_width: 0,
            },
            short_limit: 400,
            long_limit: 900,
            reset_limit: 3000,
            min_bits: 12,
        },
        ProtocolDef {
            name: "pwm-ternary-remote".to_string(),
            modulation: Modulation::OokPwmTernary {
                sync_bit: TernarySync::Long,
            },
            short_limit: 400,
            long_limit: 900,
            reset_limit: 3000,
            min_bits: 12,
        },
        ProtocolDef {
            name: "pcm-meter".to_string(),
            modulation: Modulation::OokPcm,
            short_limit: 100,
            long_limit: 100,
            reset_limit: 1000,
            min_bits: 24,
        },
        ProtocolDef {
            name: "manchester-thermometer".to_string(),
            modulation: Modulation::OokManchesterZerobit,
            short_limit: 500,
            long_limit: 0,
            reset_limit: 4000,
            min_bits: 16,
        },
    ]
}
