use tbt_codec::Crc32;

use crate::sequencer::{Phase, Sequencer};

/// Next CRC register given the sequencer snapshot of the same tick.
///
/// Held at the seed while idle and while the preamble and SFD go out,
/// updated with the serialized bit at the end of each data bit period, and
/// shifted with zero feedback at the end of each flush bit period.
#[inline]
pub fn clock(crc: Crc32, seq: &Sequencer, crc_start: usize) -> Crc32 {
    match seq.phase() {
        Phase::Idle => Crc32::new(),
        Phase::Sending if seq.offset() < crc_start => Crc32::new(),
        Phase::Sending if seq.ends_bit_period() => crc.shift_data(seq.data_bit()),
        Phase::Flushing if seq.ends_bit_period() => crc.shift_flush(),
        _ => crc,
    }
}
