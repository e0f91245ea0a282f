pub mod encoder;
pub mod fcs;
pub mod link;
pub mod scheduler;
pub mod sequencer;
pub mod state;
pub mod transmitter;
pub mod waveform;

pub use encoder::LinePair;
pub use link::LinkPulseGenerator;
pub use scheduler::TickScheduler;
pub use sequencer::{Phase, Sequencer, TICKS_PER_BIT, TICKS_PER_BYTE};
pub use state::TxState;
pub use transmitter::{frame_duration_ticks, Transmitter};
pub use waveform::Waveform;

use tbt_codec::FrameTemplate;
use tbt_core::{FrameConfig, TimingConfig, TxConfig, TxError};

/// Assembles a [`Transmitter`] from configuration.
///
/// All validation happens in [`TransmitterBuilder::build`]; once built, the
/// tick path cannot fail.
pub struct TransmitterBuilder {
    config: TxConfig,
    primed: bool,
}

impl Default for TransmitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransmitterBuilder {
    pub fn new() -> Self {
        Self {
            config: TxConfig::default(),
            primed: false,
        }
    }

    pub fn with_config(mut self, config: TxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_frame(mut self, frame: FrameConfig) -> Self {
        self.config.frame = frame;
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.config.timing = timing;
        self
    }

    /// Sends the first frame on the first tick instead of after a full
    /// scheduler period.
    pub fn primed(mut self, enabled: bool) -> Self {
        self.primed = enabled;
        self
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    pub fn build(self) -> Result<Transmitter, TxError> {
        let timing = self.config.timing;
        timing.validate()?;
        let template = FrameTemplate::build(&self.config.frame)?;

        let duration = frame_duration_ticks(template.len());
        if timing.frame_interval_ticks() < duration {
            tracing::warn!(
                "Scheduler period {} ticks is shorter than one frame ({} ticks); start pulses during a frame are dropped",
                timing.frame_interval_ticks(),
                duration
            );
        }
        tracing::info!(
            "Transmitter: frame every {} ticks ({:?}), link pulse every {} ticks",
            timing.frame_interval_ticks(),
            timing.frame_interval(),
            timing.link_pulse_interval
        );

        if self.primed {
            Transmitter::primed(template, timing)
        } else {
            Transmitter::new(template, timing)
        }
    }
}
