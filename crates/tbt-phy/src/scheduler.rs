//! Free-running frame pacer.

/// A `width`-bit counter that advances every tick and wraps to zero.
/// The tick on which it sits at its maximum value is the start pulse, so
/// pulses arrive exactly every 2^width ticks whatever else is going on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickScheduler {
    counter: u32,
    width: u32,
}

impl TickScheduler {
    pub(crate) fn new(width: u32) -> Self {
        debug_assert!((1..=31).contains(&width));
        Self { counter: 0, width }
    }

    /// Parked one tick before the wrap: the first tick emits a start pulse.
    pub(crate) fn primed(width: u32) -> Self {
        let s = Self::new(width);
        Self {
            counter: s.mask(),
            ..s
        }
    }

    #[inline]
    pub const fn mask(&self) -> u32 {
        (1u32 << self.width) - 1
    }

    pub const fn counter(&self) -> u32 {
        self.counter
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn period(&self) -> u64 {
        1u64 << self.width
    }

    #[inline]
    pub const fn start_pulse(&self) -> bool {
        self.counter == self.mask()
    }

    #[inline]
    pub const fn next(&self) -> Self {
        Self {
            counter: self.counter.wrapping_add(1) & self.mask(),
            width: self.width,
        }
    }
}
