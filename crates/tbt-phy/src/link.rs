//! Normal link pulses and the post-frame idle hold.

/// Idle-time bookkeeping.
///
/// `idle_count` runs from zero to `interval - 1` while no frame is in
/// flight and wraps; the tick on which it reaches `interval - 1` carries a
/// link pulse. `ramp` counts up to `hold` after reset or after a frame and
/// keeps the driver enabled until it gets there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPulseGenerator {
    idle_count: u32,
    interval: u32,
    ramp: u8,
    hold: u8,
}

impl LinkPulseGenerator {
    pub(crate) fn new(interval: u32, hold: u8) -> Self {
        debug_assert!(interval > 0);
        Self {
            idle_count: 0,
            interval,
            ramp: 0,
            hold,
        }
    }

    pub const fn idle_count(&self) -> u32 {
        self.idle_count
    }

    pub const fn interval(&self) -> u32 {
        self.interval
    }

    #[inline]
    pub const fn pulse(&self) -> bool {
        self.idle_count == self.interval - 1
    }

    #[inline]
    pub const fn in_hold(&self) -> bool {
        self.ramp < self.hold
    }

    #[inline]
    pub fn next(&self, frame_active: bool) -> Self {
        if frame_active {
            return Self {
                idle_count: 0,
                ramp: 0,
                ..*self
            };
        }
        let idle_count = if self.pulse() { 0 } else { self.idle_count + 1 };
        Self {
            idle_count,
            ramp: self.ramp.saturating_add(1).min(self.hold),
            ..*self
        }
    }
}
