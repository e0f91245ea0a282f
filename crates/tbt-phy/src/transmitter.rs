use tbt_codec::crc::WIDTH as CRC_WIDTH;
use tbt_codec::FrameTemplate;
use tbt_core::{TimingConfig, TxError};

use crate::encoder::LinePair;
use crate::sequencer::{Phase, TICKS_PER_BIT};
use crate::state::TxState;
use crate::waveform::Waveform;

/// Ticks from entering `Sending` to returning to `Idle` for a frame of
/// `frame_len` template bytes.
pub const fn frame_duration_ticks(frame_len: usize) -> u64 {
    (frame_len as u64 * 8 + CRC_WIDTH as u64) * TICKS_PER_BIT as u64
}

/// The fixed-frame transmitter: a template plus the register snapshot,
/// advanced one tick at a time.
pub struct Transmitter {
    template: FrameTemplate,
    timing: TimingConfig,
    state: TxState,
    primed: bool,
    ticks: u64,
    frames_started: u64,
}

impl Transmitter {
    /// Rejects an out-of-range `timing` before any register is created.
    pub fn new(template: FrameTemplate, timing: TimingConfig) -> Result<Self, TxError> {
        timing.validate()?;
        let state = TxState::reset(&timing);
        Ok(Self {
            template,
            timing,
            state,
            primed: false,
            ticks: 0,
            frames_started: 0,
        })
    }

    /// Same as [`Transmitter::new`], but the first tick carries a start pulse.
    pub fn primed(template: FrameTemplate, timing: TimingConfig) -> Result<Self, TxError> {
        let mut tx = Self::new(template, timing)?;
        tx.primed = true;
        tx.state = TxState::primed(&tx.timing);
        Ok(tx)
    }

    pub fn template(&self) -> &FrameTemplate {
        &self.template
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn state(&self) -> &TxState {
        &self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames_started(&self) -> u64 {
        self.frames_started
    }

    pub fn frame_duration_ticks(&self) -> u64 {
        frame_duration_ticks(self.template.len())
    }

    /// Ticks covering one frame from a primed start, the idle hold after it,
    /// and the first link pulse of the following silence.
    pub fn capture_ticks(&self) -> u64 {
        1 + self.frame_duration_ticks() + self.timing.link_pulse_interval as u64
    }

    /// Back to the power-on snapshot.
    pub fn reset(&mut self) {
        self.state = if self.primed {
            TxState::primed(&self.timing)
        } else {
            TxState::reset(&self.timing)
        };
        self.ticks = 0;
        self.frames_started = 0;
    }

    /// Advances one tick and returns the line levels for it.
    #[inline]
    pub fn tick(&mut self) -> LinePair {
        let (next, out) = self.state.step(&self.template);
        if self.state.phase() == Phase::Idle && next.phase() == Phase::Sending {
            self.frames_started += 1;
        }
        self.state = next;
        self.ticks += 1;
        out
    }

    /// Runs `ticks` ticks and records the line.
    pub fn run(&mut self, ticks: u64) -> Waveform {
        let mut waveform = Waveform::with_capacity(ticks as usize);
        for _ in 0..ticks {
            let before = self.state;
            waveform.push(self.tick());
            let after = self.state.phase();
            if before.phase() != after {
                tracing::debug!("tick {}: {:?} -> {:?}", self.ticks, before.phase(), after);
            }
            if before.link_pulse() {
                tracing::debug!("tick {}: link pulse", self.ticks - 1);
            }
        }
        waveform
    }
}
