//! Pulse train container
//!
//! A pulse train is the output of an OOK/FSK envelope detector: an ordered
//! sequence of (pulse, gap) pairs where the pulse is the high-signal
//! duration and the gap is the following silence, both in sample counts.

/// Ordered pulse/gap pairs captured from one transmission burst
///
/// `pulses` and `gaps` always have the same length; pair `n` is
/// `(pulses[n], gaps[n])`. The train is immutable input for the duration
/// of one demodulation call.
#[derive(Debug, Clone, Default)]
pub struct PulseTrain {
    pulses: Vec<u32>,
    gaps: Vec<u32>,
}

impl PulseTrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pulses: Vec::with_capacity(capacity),
            gaps: Vec::with_capacity(capacity),
        }
    }

    /// Append one pulse/gap pair
    pub fn push(&mut self, pulse: u32, gap: u32) {
        self.pulses.push(pulse);
        self.gaps.push(gap);
    }

    /// Number of pulse/gap pairs
    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Iterate over (pulse, gap) pairs in order
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.pulses.iter().copied().zip(self.gaps.iter().copied())
    }
}

/// Build a train from (pulse, gap) pairs, mainly for tests and tools
impl FromIterator<(u32, u32)> for PulseTrain {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        let mut train = PulseTrain::new();
        for (pulse, gap) in iter {
            train.push(pulse, gap);
        }
        train
    }
}
