use thiserror::Error;

/// Configuration-time failures. The tick path has no error channel.
#[derive(Debug, Error)]
pub enum TxError {
    #[error("config: {0}")]
    Config(String),
    #[error("payload is {len} bytes, expected {min}..={max}")]
    PayloadLength { len: usize, min: usize, max: usize },
    #[error("header checksum {supplied:#06x} does not match computed {computed:#06x}")]
    ChecksumMismatch { supplied: u16, computed: u16 },
    #[error("{field} length field encodes {encoded}, frame carries {actual}")]
    LengthMismatch {
        field: &'static str,
        encoded: usize,
        actual: usize,
    },
    #[error("{field} at offset {offset} is {found:#x}, expected {expected:#x}")]
    Framing {
        field: &'static str,
        offset: usize,
        expected: u16,
        found: u16,
    },
    #[error("timing: {0}")]
    Timing(String),
}

impl From<std::io::Error> for TxError {
    fn from(e: std::io::Error) -> Self {
        TxError::Config(e.to_string())
    }
}

impl From<toml::de::Error> for TxError {
    fn from(e: toml::de::Error) -> Self {
        TxError::Config(e.to_string())
    }
}
