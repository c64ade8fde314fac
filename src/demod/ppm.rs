//! Pulse-position modulation
//!
//! Only the gap after each pulse carries information: a short gap is a
//! zero, a long gap a one, a longer gap starts a new packet row, and a
//! gap past the reset limit ends the message. Checked in that order.

use super::{emit, DemodContext};
use crate::bitbuffer::BitBuffer;
use crate::pulse::PulseTrain;

pub fn demod_ppm(pulses: &PulseTrain, ctx: &DemodContext) -> usize {
    let mut events = 0;
    let mut bits = BitBuffer::new();

    for (_pulse, gap) in pulses.pairs() {
        if gap < ctx.short_limit {
            bits.add_bit(false);
        } else if gap < ctx.long_limit {
            bits.add_bit(true);
        } else if gap < ctx.reset_limit {
            // New packet within the same transmission
            bits.add_row();
        } else {
            events += emit(ctx, "reset gap", &mut bits);
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demod::tests_support::CountingHandler;

    fn ctx<'a>(handler: &'a CountingHandler) -> DemodContext<'a> {
        DemodContext::new("ppm", 500, 1500, 5000).with_handler(handler)
    }

    #[test]
    fn test_gap_classification_boundaries() {
        let handler = CountingHandler::new(1);
        let ctx = ctx(&handler);

        // 499 -> 0, 500 -> 1, 1499 -> 1, then reset to flush
        let train: PulseTrain = [(100, 499), (100, 500), (100, 1499), (100, 5000)]
            .into_iter()
            .collect();
        let events = demod_ppm(&train, &ctx);

        assert_eq!(events, 1);
        assert_eq!(handler.messages(), vec![vec![false, true, true]]);
    }

    #[test]
    fn test_row_boundary_gaps() {
        let handler = CountingHandler::new(1);
        let ctx = ctx(&handler);

        // 1500 and 4999 both start new rows; 5000 ends the message
        let train: PulseTrain = [(100, 400), (100, 1500), (100, 600), (100, 4999), (100, 700), (100, 5000)]
            .into_iter()
            .collect();
        let events = demod_ppm(&train, &ctx);

        assert_eq!(events, 1);
        let rows = handler.captures();
        assert_eq!(
            rows[0],
            vec![vec![false], vec![true], vec![true]]
        );
    }

    #[test]
    fn test_known_remote_scenario() {
        let handler = CountingHandler::new(1);
        let ctx = ctx(&handler);

        let train: PulseTrain = [(100, 400), (100, 1000), (100, 6000)].into_iter().collect();
        let events = demod_ppm(&train, &ctx);

        assert_eq!(events, 1);
        assert_eq!(handler.messages(), vec![vec![false, true]]);
    }

    #[test]
    fn test_no_emit_without_accumulated_bits() {
        let handler = CountingHandler::new(1);
        let ctx = ctx(&handler);

        // A lone reset-length gap with nothing accumulated fires nothing
        let train: PulseTrain = [(100, 6000)].into_iter().collect();
        let events = demod_ppm(&train, &ctx);

        assert_eq!(events, 0);
        assert_eq!(handler.calls(), 0);
    }

    #[test]
    fn test_event_count_additivity() {
        // Handler claims 2 messages per buffer; two boundaries sum to 4
        let handler = CountingHandler::new(2);
        let ctx = ctx(&handler);

        let train: PulseTrain = [(100, 400), (100, 6000), (100, 1000), (100, 6000)]
            .into_iter()
            .collect();
        let events = demod_ppm(&train, &ctx);

        assert_eq!(events, 4);
        assert_eq!(handler.calls(), 2);
    }
}
