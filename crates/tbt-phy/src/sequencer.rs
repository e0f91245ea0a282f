use tbt_codec::crc::WIDTH as CRC_WIDTH;
use tbt_codec::FrameTemplate;

/// Two ticks per bit: one per Manchester half-symbol.
pub const TICKS_PER_BIT: u8 = 2;
pub const TICKS_PER_BYTE: u8 = 8 * TICKS_PER_BIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
    /// Shifting out the CRC trailer.
    Flushing,
}

/// Byte offset, bit phase and shift register for the frame in flight.
///
/// `bit_phase` counts ticks inside the current byte time. Its low bit is the
/// Manchester half: even is the first half of a bit, odd the second. The
/// shift register drops its LSB at the end of every odd tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequencer {
    phase: Phase,
    offset: usize,
    bit_phase: u8,
    shift: u8,
    flush_bits: u32,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::idle()
    }
}

impl Sequencer {
    pub const fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            offset: 0,
            bit_phase: 0,
            shift: 0,
            flush_bits: 0,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn bit_phase(&self) -> u8 {
        self.bit_phase
    }

    pub const fn shift_register(&self) -> u8 {
        self.shift
    }

    pub const fn flush_bits(&self) -> u32 {
        self.flush_bits
    }

    /// Bit being serialized from the shift register.
    #[inline]
    pub const fn data_bit(&self) -> bool {
        self.shift & 1 == 1
    }

    #[inline]
    pub const fn second_half(&self) -> bool {
        self.bit_phase & 1 == 1
    }

    /// True on the last tick of a bit period.
    #[inline]
    pub const fn ends_bit_period(&self) -> bool {
        self.second_half()
    }

    pub fn next(&self, start: bool, template: &FrameTemplate) -> Self {
        match self.phase {
            Phase::Idle if start => Self {
                phase: Phase::Sending,
                offset: 0,
                bit_phase: 0,
                shift: template.byte_at(0),
                flush_bits: 0,
            },
            Phase::Idle => *self,
            Phase::Sending => {
                if self.bit_phase + 1 == TICKS_PER_BYTE {
                    let offset = self.offset + 1;
                    if offset >= template.len() {
                        return Self {
                            phase: Phase::Flushing,
                            offset,
                            bit_phase: 0,
                            shift: 0,
                            flush_bits: 0,
                        };
                    }
                    return Self {
                        offset,
                        bit_phase: 0,
                        shift: template.byte_at(offset),
                        ..*self
                    };
                }
                let shift = if self.ends_bit_period() {
                    self.shift >> 1
                } else {
                    self.shift
                };
                Self {
                    bit_phase: self.bit_phase + 1,
                    shift,
                    ..*self
                }
            }
            Phase::Flushing => {
                let bit_phase = (self.bit_phase + 1) % TICKS_PER_BYTE;
                if !self.ends_bit_period() {
                    return Self { bit_phase, ..*self };
                }
                let flush_bits = self.flush_bits + 1;
                if flush_bits == CRC_WIDTH {
                    return Self::idle();
                }
                Self {
                    bit_phase,
                    flush_bits,
                    ..*self
                }
            }
        }
    }
}
