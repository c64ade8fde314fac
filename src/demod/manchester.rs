//! Manchester decoding anchored on a zero first bit
//!
//! Decodes transmissions whose first rising edge is by convention always a
//! zero bit, so every message begins with a hardcoded 0. Unlike the other
//! demodulators, which evaluate each pulse/gap pair independently, this one
//! tracks elapsed time since the last recorded transition across pulses and
//! gaps as a single continuous timeline: a segment pushing the elapsed time
//! past 1.5 short periods is a data edge (falling edge = 1, rising = 0).

use super::{emit, DemodContext};
use crate::bitbuffer::BitBuffer;
use crate::pulse::PulseTrain;

pub fn demod_manchester_zerobit(pulses: &PulseTrain, ctx: &DemodContext) -> usize {
    let mut events = 0;
    let mut time_since_last: u32 = 0;
    let mut bits = BitBuffer::new();
    let threshold = ctx.short_limit + (ctx.short_limit >> 1);

    // First rising edge always counts as a zero
    bits.add_bit(false);

    for (pulse, gap) in pulses.pairs() {
        // Falling edge at the end of the pulse
        if pulse + time_since_last > threshold {
            bits.add_bit(true);
            time_since_last = 0;
        } else {
            time_since_last += pulse;
        }

        if gap > ctx.reset_limit {
            events += emit(ctx, "reset gap", &mut bits);
            // Prepare the next message with its hardcoded zero
            bits.add_bit(false);
            time_since_last = 0;
        // Rising edge at the end of the gap
        } else if gap + time_since_last > threshold {
            bits.add_bit(false);
            time_since_last = 0;
        } else {
            time_since_last += gap;
        }
    }
    events
}
