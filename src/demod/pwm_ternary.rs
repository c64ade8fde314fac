//! Pulse-width modulation, ternary variant
//!
//! Pulses fall into three classes (short, middle, long against the two
//! limits); one class, chosen by the sync selector, marks a row boundary
//! while the other two carry data bits.

use super::{emit, DemodArg, DemodContext, TernarySync};
use crate::bitbuffer::BitBuffer;
use crate::pulse::PulseTrain;
use tracing::debug;

pub fn demod_pwm_ternary(pulses: &PulseTrain, ctx: &DemodContext) -> usize {
    let sync = match ctx.arg {
        DemodArg::SyncBit(sync) => sync,
        _ => {
            debug!("{}: no sync selector, defaulting to short", ctx.name);
            TernarySync::Short
        }
    };

    let mut events = 0;
    let mut bits = BitBuffer::new();

    for (pulse, gap) in pulses.pairs() {
        if pulse < ctx.short_limit {
            // Short pulse
            match sync {
                TernarySync::Short => bits.add_row(),
                _ => bits.add_bit(false),
            }
        } else if pulse < ctx.long_limit {
            // Middle pulse
            match sync {
                TernarySync::Short => bits.add_bit(false),
                TernarySync::Middle => bits.add_row(),
                TernarySync::Long => bits.add_bit(true),
            }
        } else {
            // Long pulse
            match sync {
                TernarySync::Long => bits.add_row(),
                _ => bits.add_bit(true),
            }
        }

        if gap > ctx.reset_limit {
            events += emit(ctx, "reset gap", &mut bits);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demod::tests_support::CountingHandler;

    // One pulse of each class, then a reset gap
    fn train() -> PulseTrain {
        [(100, 100), (300, 100), (500, 3000)].into_iter().collect()
    }

    fn run(sync: TernarySync, handler: &CountingHandler) -> usize {
        let ctx = DemodContext::new("pwm-ternary", 200, 400, 2000)
            .with_arg(DemodArg::SyncBit(sync))
            .with_handler(handler);
        demod_pwm_ternary(&train(), &ctx)
    }

    #[test]
    fn test_short_sync_classification() {
        let handler = CountingHandler::new(1);
        let events = run(TernarySync::Short, &handler);

        // short -> row (a no-op while nothing is accumulated yet),
        // middle -> 0, long -> 1
        assert_eq!(events, 1);
        assert_eq!(handler.captures()[0], vec![vec![false, true]]);
    }

    #[test]
    fn test_middle_sync_classification() {
        let handler = CountingHandler::new(1);
        let events = run(TernarySync::Middle, &handler);

        // short -> 0, middle -> row, long -> 1
        assert_eq!(events, 1);
        assert_eq!(handler.captures()[0], vec![vec![false], vec![true]]);
    }

    #[test]
    fn test_long_sync_classification() {
        let handler = CountingHandler::new(1);
        let events = run(TernarySync::Long, &handler);

        // short -> 0, middle -> 1, long -> row; the row stays empty and
        // the reset gap flushes rows [0,1] and []
        assert_eq!(events, 1);
        assert_eq!(handler.captures()[0], vec![vec![false, true], vec![]]);
    }

    #[test]
    fn test_missing_sync_selector_defaults_to_short() {
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pwm-ternary", 200, 400, 2000).with_handler(&handler);
        let events = demod_pwm_ternary(&train(), &ctx);

        assert_eq!(events, 1);
        assert_eq!(handler.captures()[0], vec![vec![false, true]]);
    }

    #[test]
    fn test_no_emit_when_only_sync_rows_accumulated() {
        let handler = CountingHandler::new(1);
        let ctx = DemodContext::new("pwm-ternary", 200, 400, 2000)
            .with_arg(DemodArg::SyncBit(TernarySync::Short))
            .with_handler(&handler);

        // Only short (sync) pulses: rows but no bits in row 0
        let train: PulseTrain = [(100, 100), (100, 3000)].into_iter().collect();
        let events = demod_pwm_ternary(&train, &ctx);

        assert_eq!(events, 0);
        assert_eq!(handler.calls(), 0);
    }
}
