//! Bit-serial CRC-32 engine (Ethernet FCS).
//!
//! Parameters as clocked on the wire:
//! - Poly:   0x04C11DB7, register shifts left (MSB is the feedback tap)
//! - Init:   0xFFFFFFFF
//! - Input:  one data bit per update, LSB of each byte first
//! - Output: register complemented, shifted out MSB first
//!
//! Feeding bytes LSB-first into a left-shifting register is the mirror image
//! of the reflected table-driven CRC-32, so [`Crc32::value`] equals the usual
//! IEEE CRC-32 of the same bytes.

pub const POLYNOMIAL: u32 = 0x04C1_1DB7;
pub const WIDTH: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    register: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    /// All-ones seed.
    pub const fn new() -> Self {
        Self { register: u32::MAX }
    }

    pub const fn register(&self) -> u32 {
        self.register
    }

    pub const fn top_bit(&self) -> bool {
        self.register & 0x8000_0000 != 0
    }

    /// One data-bit update: shift left, XOR in the polynomial when the
    /// outgoing data bit differs from the register's top bit.
    #[inline]
    pub const fn shift_data(self, bit: bool) -> Self {
        let feedback = bit ^ self.top_bit();
        let poly = if feedback { POLYNOMIAL } else { 0 };
        Self {
            register: (self.register << 1) ^ poly,
        }
    }

    /// One flush-bit update: feedback forced to zero.
    #[inline]
    pub const fn shift_flush(self) -> Self {
        Self {
            register: self.register << 1,
        }
    }

    /// Bit presented to the line during a flush bit period.
    #[inline]
    pub const fn flush_bit(&self) -> bool {
        !self.top_bit()
    }

    pub fn feed_byte(self, byte: u8) -> Self {
        (0..8).fold(self, |crc, i| crc.shift_data((byte >> i) & 1 == 1))
    }

    pub fn feed(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |crc, &b| crc.feed_byte(b))
    }

    /// The checksum in conventional (reflected) form.
    pub const fn value(&self) -> u32 {
        (!self.register).reverse_bits()
    }

    /// Trailer bytes in transmission order. Each byte goes out LSB first,
    /// which reproduces the MSB-first flush of the complemented register.
    pub const fn trailer(&self) -> [u8; 4] {
        self.value().to_le_bytes()
    }

    /// The full 32-bit flush sequence, in line order.
    pub fn flush_bits(self) -> impl Iterator<Item = bool> {
        (0..WIDTH).scan(self, |crc, _| {
            let bit = crc.flush_bit();
            *crc = crc.shift_flush();
            Some(bit)
        })
    }

    pub fn checksum(bytes: &[u8]) -> u32 {
        Self::new().feed(bytes).value()
    }
}
