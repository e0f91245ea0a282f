use tbt_codec::Crc32;

use crate::link::LinkPulseGenerator;
use crate::sequencer::{Phase, Sequencer};

/// The differential pair at the system boundary.
///
/// Driven: exactly one of `plus`/`minus` is high. At rest both are low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinePair {
    pub plus: bool,
    pub minus: bool,
}

impl LinePair {
    pub const REST: Self = Self {
        plus: false,
        minus: false,
    };

    #[inline]
    pub const fn driven(level: bool) -> Self {
        Self {
            plus: level,
            minus: !level,
        }
    }

    pub const fn is_driven(&self) -> bool {
        self.plus != self.minus
    }

    /// Level of the `plus` line when driven.
    pub const fn level(&self) -> Option<bool> {
        if self.is_driven() {
            Some(self.plus)
        } else {
            None
        }
    }
}

/// Manchester encoder and driver enable, evaluated on one tick's snapshot.
///
/// The first half of a bit carries the complement, the second half the bit
/// itself, so a one is a low-to-high mid-bit transition. An enabled line
/// with nothing to send sits high.
#[inline]
pub fn encode(seq: &Sequencer, crc: &Crc32, link: &LinkPulseGenerator) -> LinePair {
    let level = match seq.phase() {
        Phase::Idle => true,
        Phase::Sending => !seq.data_bit() ^ seq.second_half(),
        Phase::Flushing => !crc.flush_bit() ^ seq.second_half(),
    };
    let enable = seq.is_active() || link.pulse() || link.in_hold();
    if enable {
        LinePair::driven(level)
    } else {
        LinePair::REST
    }
}
