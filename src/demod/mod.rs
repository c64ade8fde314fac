//! Pulse-train demodulators
//!
//! Each demodulator consumes a complete pulse train, classifies the noisy
//! pulse/gap timing into discrete bits using the configured limits, and
//! hands the accumulated bit buffer to the message handler whenever it
//! detects an end-of-message boundary. The return value of every entry
//! point is the total count of accepted messages.

mod manchester;
mod pcm;
mod ppm;
mod pwm;
mod pwm_precise;
mod pwm_ternary;

pub use manchester::demod_manchester_zerobit;
pub use pcm::demod_pcm;
pub use ppm::demod_ppm;
pub use pwm::demod_pwm;
pub use pwm_precise::demod_pwm_precise;
pub use pwm_ternary::demod_pwm_ternary;

use crate::bitbuffer::BitBuffer;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Receives completed bit buffers at message boundaries
///
/// Returns the number of valid messages found in the buffer (0 if none).
/// Implemented for any `Fn(&BitBuffer) -> usize`, so plain closures work
/// as handlers.
pub trait MessageHandler {
    fn on_message(&self, bits: &BitBuffer) -> usize;
}

impl<F> MessageHandler for F
where
    F: Fn(&BitBuffer) -> usize,
{
    fn on_message(&self, bits: &BitBuffer) -> usize {
        self(bits)
    }
}

/// Which pulse class marks a row boundary in ternary PWM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TernarySync {
    Short,
    Middle,
    Long,
}

/// Tolerance-window parameters for precise PWM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmPreciseParams {
    /// Allowed deviation around the short/long/sync pulse widths, samples
    pub pulse_tolerance: u32,
    /// Width of the row-sync pulse; 0 disables sync detection
    #[serde(default)]
    pub pulse_sync_width: u32,
}

/// Demodulator-specific argument, resolved at configuration time
///
/// Each variant belongs to one demodulator family; a demodulator handed a
/// mismatched variant falls back to its no-argument behavior (precise PWM,
/// which has no meaningful default, returns zero events instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemodArg {
    #[default]
    None,
    /// Simple PWM: consume a leading start bit per sub-message
    StartBit,
    /// Ternary PWM: row-sync pulse class selector
    SyncBit(TernarySync),
    /// Precise PWM: tolerance window parameters
    Precise(PwmPreciseParams),
}

/// Read-only configuration consumed by one demodulation call
///
/// The limits classify pulse/gap durations into symbol categories and
/// boundary events. `reset_limit >= long_limit >= short_limit > 0` is
/// expected but not enforced; violations yield undefined classification.
pub struct DemodContext<'a> {
    /// Diagnostics label, typically the protocol name
    pub name: &'a str,
    pub short_limit: u32,
    pub long_limit: u32,
    pub reset_limit: u32,
    pub arg: DemodArg,
    /// Absent handler means dry run: no emission, diagnostics still fire
    pub handler: Option<&'a dyn MessageHandler>,
}

impl<'a> DemodContext<'a> {
    pub fn new(name: &'a str, short_limit: u32, long_limit: u32, reset_limit: u32) -> Self {
        Self {
            name,
            short_limit,
            long_limit,
            reset_limit,
            arg: DemodArg::None,
            handler: None,
        }
    }

    pub fn with_arg(mut self, arg: DemodArg) -> Self {
        self.arg = arg;
        self
    }

    pub fn with_handler(mut self, handler: &'a dyn MessageHandler) -> Self {
        self.handler = Some(handler);
        self
    }
}

/// End-of-message: dump, hand off, count, clear
///
/// Emission is gated on row 0 holding at least one bit; the buffer is
/// cleared either way so a gated boundary cannot leak rows into the next
/// message.
pub(crate) fn emit(ctx: &DemodContext, trigger: &str, bits: &mut BitBuffer) -> usize {
    if bits.row_len(0) == 0 {
        bits.clear();
        return 0;
    }

    trace!("{}: end of message ({})\n{}", ctx.name, trigger, bits);

    let accepted = match ctx.handler {
        Some(handler) => handler.on_message(bits),
        None => 0,
    };
    bits.clear();
    accepted
}
