//! Pulse-code modulation (RZ and NRZ)
//!
//! RZ when `short_limit == long_limit`, NRZ otherwise. A single NRZ pulse
//! may carry several consecutive one-bits with no intervening gap; the
//! pulse and period counts are rounded against the configured bit widths.

use super::{emit, DemodContext};
use crate::bitbuffer::BitBuffer;
use crate::pulse::PulseTrain;
use tracing::debug;

pub fn demod_pcm(pulses: &PulseTrain, ctx: &DemodContext) -> usize {
    if ctx.short_limit == 0 || ctx.long_limit == 0 {
        debug!("{}: zero bit width, nothing to decode", ctx.name);
        return 0;
    }

    let mut events = 0;
    let mut bits = BitBuffer::new();
    // Bound the zero run so a trailing silence does not inflate the buffer
    let max_zeros = (ctx.reset_limit / ctx.long_limit) as usize;
    // RZ pulses must sit within ±25% of a bit period
    let tolerance = ctx.long_limit / 4;

    for (n, (pulse, gap)) in pulses.pairs().enumerate() {
        // Number of high bit periods in this pulse (1 for RZ, many for NRZ)
        let highs = ((pulse + ctx.short_limit / 2) / ctx.short_limit) as usize;
        // Total bit periods spanned by pulse plus gap, rounded
        let periods = ((pulse + gap + ctx.long_limit / 2) / ctx.long_limit) as usize;

        for _ in 0..highs {
            bits.add_bit(true);
        }
        let zeros = periods.saturating_sub(highs).min(max_zeros);
        for _ in 0..zeros {
            bits.add_bit(false);
        }

        // RZ only: out-of-tolerance pulse means the message is corrupt
        if ctx.short_limit != ctx.long_limit && pulse.abs_diff(ctx.short_limit) > tolerance {
            debug!(
                "{}: pulse {} at index {} outside tolerance, clearing buffer",
                ctx.name, pulse, n
            );
            bits.clear();
        }

        // End of message: train exhausted or a long silence
        if n == pulses.len() - 1 {
            events += emit(ctx, "end of train", &mut bits);
        } else if gap > ctx.reset_limit {
            events += emit(ctx, "reset gap", &mut bits);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demod::tests_support::CountingHandler;

    #[test]
    fn test_nrz_pulse_yields_k_ones() {
        // short == long: one pulse of k bit periods with no gap is k ones
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pcm-nrz", 100, 100, 1000).with_handler(&handler);

        let train: PulseTrain = [(300, 0)].into_iter().collect();
        let events = demod_pcm(&train, &ctx);

        assert_eq!(events, 1);
        assert_eq!(handler.messages(), vec![vec![true, true, true]]);
    }

    #[test]
    fn test_rz_within_tolerance_keeps_buffer() {
        // tolerance = long/4 = 50; a pulse at short + 50 must survive
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pcm-rz", 100, 200, 2000).with_handler(&handler);

        let train: PulseTrain = [(100, 100), (150, 0)].into_iter().collect();
        let events = demod_pcm(&train, &ctx);

        assert_eq!(events, 1);
        assert_eq!(handler.calls(), 1);
    }

    #[test]
    fn test_rz_outside_tolerance_clears_buffer() {
        // A pulse at short + long/4 + 1 = 151 discards the message
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pcm-rz", 100, 200, 2000).with_handler(&handler);

        let train: PulseTrain = [(100, 100), (151, 0)].into_iter().collect();
        let events = demod_pcm(&train, &ctx);

        assert_eq!(events, 0);
        assert_eq!(handler.calls(), 0);
    }

    #[test]
    fn test_trailing_silence_bounded_by_max_zeros() {
        // reset/long = 5, so a huge gap appends at most 5 zeros
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pcm", 100, 100, 500).with_handler(&handler);

        let train: PulseTrain = [(100, 2000)].into_iter().collect();
        let events = demod_pcm(&train, &ctx);

        assert_eq!(events, 1);
        let rows = handler.messages();
        assert_eq!(rows[0].len(), 6); // 1 one + 5 bounded zeros
        assert_eq!(rows[0][0], true);
        assert!(rows[0][1..].iter().all(|b| !b));
    }

    #[test]
    fn test_reset_gap_splits_messages() {
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pcm", 100, 100, 500).with_handler(&handler);

        // First pulse followed by a reset-length silence, then another
        let train: PulseTrain = [(100, 600), (100, 0)].into_iter().collect();
        let events = demod_pcm(&train, &ctx);

        assert_eq!(events, 2);
        assert_eq!(handler.calls(), 2);
    }

    #[test]
    fn test_no_emit_without_accumulated_bits() {
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pcm", 100, 100, 500).with_handler(&handler);

        // Zero-width pulse rounds to no bits at all
        let train: PulseTrain = [(0, 0)].into_iter().collect();
        let events = demod_pcm(&train, &ctx);

        assert_eq!(events, 0);
        assert_eq!(handler.calls(), 0);
    }

    #[test]
    fn test_zero_limits_do_not_fault() {
        let ctx = DemodContext::new("pcm", 0, 0, 500);
        let train: PulseTrain = [(100, 100)].into_iter().collect();
        assert_eq!(demod_pcm(&train, &ctx), 0);
    }
}
