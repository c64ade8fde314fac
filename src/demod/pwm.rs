//! Pulse-width modulation, single-threshold variant
//!
//! A pulse at or below the short limit is a one, anything longer a zero.
//! The protocol may prefix each sub-message with a start bit that carries
//! no data; it is consumed and re-armed after every row or message
//! boundary.

use super::{emit, DemodArg, DemodContext};
use crate::bitbuffer::BitBuffer;
use crate::pulse::PulseTrain;

pub fn demod_pwm(pulses: &PulseTrain, ctx: &DemodContext) -> usize {
    let mut events = 0;
    let mut bits = BitBuffer::new();
    let skip_start = matches!(ctx.arg, DemodArg::StartBit);
    let mut start_consumed = false;

    for (pulse, gap) in pulses.pairs() {
        if skip_start && !start_consumed {
            start_consumed = true;
        } else if pulse <= ctx.short_limit {
            bits.add_bit(true);
        } else {
            bits.add_bit(false);
        }

        // Message boundary takes precedence over a packet row boundary
        if gap > ctx.reset_limit {
            events += emit(ctx, "reset gap", &mut bits);
            start_consumed = false;
        } else if gap > ctx.long_limit {
            bits.add_row();
            start_consumed = false;
        }
    }
    events
}
