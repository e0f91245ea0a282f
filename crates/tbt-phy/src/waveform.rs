use crate::encoder::LinePair;

/// Recorded line samples, one per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Waveform {
    samples: Vec<LinePair>,
}

impl Waveform {
    pub fn with_capacity(ticks: usize) -> Self {
        Self {
            samples: Vec::with_capacity(ticks),
        }
    }

    pub fn push(&mut self, sample: LinePair) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[LinePair] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `+` for plus high, `-` for minus high, `_` at rest.
    pub fn render(&self) -> String {
        self.samples
            .iter()
            .map(|s| match s.level() {
                Some(true) => '+',
                Some(false) => '-',
                None => '_',
            })
            .collect()
    }

    /// Recovers the bytes of every Manchester burst in the recording.
    ///
    /// An enabled idle line only ever sits high, so a burst starts at the
    /// first driven-low sample. It ends at the first half-symbol pair that
    /// is not a valid transition. Trailing bits short of a byte are dropped.
    pub fn decode_manchester(&self) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        let mut i = 0;
        while i < self.samples.len() {
            if self.samples[i].level() != Some(false) {
                i += 1;
                continue;
            }
            let mut bits = Vec::new();
            while let (Some(first), Some(second)) = (
                self.samples.get(i).and_then(LinePair::level),
                self.samples.get(i + 1).and_then(LinePair::level),
            ) {
                if first == second {
                    break;
                }
                bits.push(second);
                i += 2;
            }
            let bytes: Vec<u8> = bits
                .chunks_exact(8)
                .map(|byte| {
                    byte.iter()
                        .enumerate()
                        .fold(0u8, |acc, (n, &b)| acc | ((b as u8) << n))
                })
                .collect();
            if !bytes.is_empty() {
                frames.push(bytes);
            }
            i += 1;
        }
        frames
    }
}
