use tbt_codec::{Crc32, FrameTemplate};
use tbt_core::TimingConfig;

use crate::encoder::{self, LinePair};
use crate::fcs;
use crate::link::LinkPulseGenerator;
use crate::scheduler::TickScheduler;
use crate::sequencer::{Phase, Sequencer};

/// Every register in the transmitter, as it stands between two ticks.
///
/// Only built from a validated [`TimingConfig`]; obtain one through
/// [`crate::Transmitter::state`].
///
/// [`TxState::step`] reads only this snapshot and returns a fresh one, so no
/// component ever sees a value another component wrote during the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxState {
    pub scheduler: TickScheduler,
    pub sequencer: Sequencer,
    pub crc: Crc32,
    pub link: LinkPulseGenerator,
}

impl TxState {
    pub(crate) fn reset(timing: &TimingConfig) -> Self {
        Self {
            scheduler: TickScheduler::new(timing.counter_width),
            sequencer: Sequencer::idle(),
            crc: Crc32::new(),
            link: LinkPulseGenerator::new(timing.link_pulse_interval, timing.idle_hold_ticks),
        }
    }

    /// Reset state with the scheduler one tick from its start pulse.
    pub(crate) fn primed(timing: &TimingConfig) -> Self {
        Self {
            scheduler: TickScheduler::primed(timing.counter_width),
            ..Self::reset(timing)
        }
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    /// Line levels for the tick this snapshot belongs to.
    #[inline]
    pub fn output(&self) -> LinePair {
        encoder::encode(&self.sequencer, &self.crc, &self.link)
    }

    /// Link pulse as seen on the line; never asserted with a frame in flight.
    pub fn link_pulse(&self) -> bool {
        !self.sequencer.is_active() && self.link.pulse()
    }

    /// Advances one tick. Returns the committed next state and this tick's output.
    #[inline]
    pub fn step(&self, template: &FrameTemplate) -> (Self, LinePair) {
        let start = self.scheduler.start_pulse();
        let next = Self {
            scheduler: self.scheduler.next(),
            sequencer: self.sequencer.next(start, template),
            crc: fcs::clock(self.crc, &self.sequencer, template.crc_start()),
            link: self.link.next(self.sequencer.is_active()),
        };
        (next, self.output())
    }
}
