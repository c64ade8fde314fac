//! Pulse-width modulation, tolerance-window variant
//!
//! Instead of a single threshold, pulses must land inside a tolerance
//! window around the short width (one), the long width (zero), or an
//! optional sync width (new row). A pulse matching none of the windows
//! invalidates the whole train: the call returns zero events, including
//! any messages already counted. Strict single-shot validation, unlike
//! the other demodulators' clear-and-continue policy.

use super::{emit, DemodArg, DemodContext};
use crate::bitbuffer::BitBuffer;
use crate::pulse::PulseTrain;
use tracing::debug;

pub fn demod_pwm_precise(pulses: &PulseTrain, ctx: &DemodContext) -> usize {
    let params = match ctx.arg {
        DemodArg::Precise(p) => p,
        _ => {
            debug!("{}: missing precise PWM parameters", ctx.name);
            return 0;
        }
    };

    let mut events = 0;
    let mut bits = BitBuffer::new();

    for (n, (pulse, gap)) in pulses.pairs().enumerate() {
        if pulse.abs_diff(ctx.short_limit) < params.pulse_tolerance {
            bits.add_bit(true);
        } else if pulse.abs_diff(ctx.long_limit) < params.pulse_tolerance {
            bits.add_bit(false);
        } else if params.pulse_sync_width != 0
            && pulse.abs_diff(params.pulse_sync_width) < params.pulse_tolerance
        {
            bits.add_row();
        } else {
            // Pulse outside all specified timings: the whole train is invalid
            debug!(
                "{}: pulse {} at index {} outside timing, aborting",
                ctx.name, pulse, n
            );
            return 0;
        }

        if gap > ctx.reset_limit {
            events += emit(ctx, "reset gap", &mut bits);
        }
    }
    events
}
