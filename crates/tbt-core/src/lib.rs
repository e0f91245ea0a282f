pub mod config;
pub mod error;

pub use config::{FrameConfig, TimingConfig, TxConfig, DEFAULT_TICK_RATE_HZ};
pub use error::TxError;
