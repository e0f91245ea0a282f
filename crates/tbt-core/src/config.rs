use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::TxError;

/// Nominal line clock: two ticks per Manchester bit at 10 Mb/s.
pub const DEFAULT_TICK_RATE_HZ: u64 = 20_000_000;

/// Default payload: 18 bytes counting up from zero.
pub fn default_payload() -> Vec<u8> {
    (0x00..=0x11).collect()
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FrameConfig {
    pub source_mac: [u8; 6],
    pub destination_mac: [u8; 6],
    pub source_ip: [u8; 4],
    pub destination_ip: [u8; 4],
    pub source_port: u16,
    pub destination_port: u16,
    pub ttl: u8,
    pub identification: u16,
    pub payload: Vec<u8>,
    /// Checksum computed by an external configuration step. Checked against
    /// the header fields when the template is built; computed when absent.
    pub header_checksum: Option<u16>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            source_mac: [0x00, 0x12, 0x34, 0x56, 0x78, 0x90],
            destination_mac: [0x00, 0x10, 0xA4, 0x7B, 0xEA, 0x80],
            source_ip: [192, 168, 0, 44],
            destination_ip: [192, 168, 0, 4],
            source_port: 1024,
            destination_port: 1024,
            ttl: 128,
            identification: 0,
            payload: default_payload(),
            header_checksum: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Width W of the free-running scheduler counter. A frame starts every 2^W ticks.
    pub counter_width: u32,
    /// Ticks between idle link pulses.
    pub link_pulse_interval: u32,
    /// Ticks the driver stays enabled (line held at rest-high) after reset or
    /// after a frame ends.
    pub idle_hold_ticks: u8,
    pub tick_rate_hz: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            counter_width: 24,
            link_pulse_interval: 1 << 18,
            idle_hold_ticks: 6,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl TimingConfig {
    pub const MAX_COUNTER_WIDTH: u32 = 31;
    /// Tick rates above 1 GHz would need sub-nanosecond ticks.
    pub const MAX_TICK_RATE_HZ: u64 = 1_000_000_000;

    /// Scheduler period in ticks.
    pub fn frame_interval_ticks(&self) -> u64 {
        1u64 << self.counter_width
    }

    /// Wall-clock length of `ticks` ticks, rounded down to the nanosecond.
    pub fn ticks_to_duration(&self, ticks: u64) -> Duration {
        let nanos = ticks as u128 * 1_000_000_000 / self.tick_rate_hz.max(1) as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    pub fn tick_duration(&self) -> Duration {
        self.ticks_to_duration(1)
    }

    pub fn frame_interval(&self) -> Duration {
        self.ticks_to_duration(self.frame_interval_ticks())
    }

    /// Picks the counter width whose 2^W tick period is closest to `period`.
    pub fn width_for_period(&self, period: Duration) -> u32 {
        let target = period.as_nanos() * self.tick_rate_hz as u128 / 1_000_000_000;
        (1..=Self::MAX_COUNTER_WIDTH)
            .min_by_key(|w| (1u128 << w).abs_diff(target))
            .unwrap_or(1)
    }

    pub fn validate(&self) -> Result<(), TxError> {
        if self.counter_width == 0 || self.counter_width > Self::MAX_COUNTER_WIDTH {
            return Err(TxError::Timing(format!(
                "counter_width must be in 1..={}, got {}",
                Self::MAX_COUNTER_WIDTH,
                self.counter_width
            )));
        }
        if self.link_pulse_interval == 0 {
            return Err(TxError::Timing("link_pulse_interval must be non-zero".into()));
        }
        if self.tick_rate_hz == 0 || self.tick_rate_hz > Self::MAX_TICK_RATE_HZ {
            return Err(TxError::Timing(format!(
                "tick_rate_hz must be in 1..={}, got {}",
                Self::MAX_TICK_RATE_HZ,
                self.tick_rate_hz
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TxConfig {
    pub frame: FrameConfig,
    pub timing: TimingConfig,
}

impl TxConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, TxError> {
        let config: TxConfig = toml::from_str(raw)?;
        config.timing.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TxError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::info!("Loaded transmitter config from {}", path.display());
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = TxConfig::from_toml_str(
            r#"
            [frame]
            destination_ip = [10, 0, 0, 7]

            [timing]
            counter_width = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.frame.destination_ip, [10, 0, 0, 7]);
        assert_eq!(config.frame.source_port, 1024);
        assert_eq!(config.frame.payload.len(), 18);
        assert_eq!(config.timing.counter_width, 12);
        assert_eq!(config.timing.idle_hold_ticks, 6);
    }

    #[test]
    fn rejects_out_of_range_counter_width() {
        let err = TxConfig::from_toml_str("[timing]\ncounter_width = 40\n").unwrap_err();
        assert!(matches!(err, TxError::Timing(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = TxConfig::from_toml_str("[frame\n").unwrap_err();
        assert!(matches!(err, TxError::Config(_)));
    }

    #[test]
    fn rejects_tick_rate_above_one_gigahertz() {
        let timing = TimingConfig {
            tick_rate_hz: 1_500_000_000,
            ..TimingConfig::default()
        };
        assert!(matches!(timing.validate(), Err(TxError::Timing(_))));

        let timing = TimingConfig {
            tick_rate_hz: TimingConfig::MAX_TICK_RATE_HZ,
            ..TimingConfig::default()
        };
        assert!(timing.validate().is_ok());
        assert_eq!(timing.tick_duration(), Duration::from_nanos(1));
    }

    #[test]
    fn frame_interval_is_not_truncated_per_tick() {
        // 3 Hz: a per-tick nanosecond count would lose a third of a ns each tick.
        let timing = TimingConfig {
            counter_width: 2,
            tick_rate_hz: 3,
            ..TimingConfig::default()
        };
        assert_eq!(timing.frame_interval(), Duration::from_nanos(1_333_333_333));

        let timing = TimingConfig {
            counter_width: 24,
            tick_rate_hz: 30_000_000,
            ..TimingConfig::default()
        };
        // 2^24 / 30 MHz = 559.240533... ms
        assert_eq!(timing.frame_interval(), Duration::from_nanos(559_240_533));
    }

    #[test]
    fn default_width_is_about_one_second() {
        let timing = TimingConfig::default();
        assert_eq!(timing.width_for_period(Duration::from_millis(840)), 24);
        assert_eq!(timing.frame_interval_ticks(), 1 << 24);
        assert_eq!(timing.tick_duration(), Duration::from_nanos(50));
    }
}
