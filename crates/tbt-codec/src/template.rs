use tbt_core::{FrameConfig, TxError};

use crate::checksum;
use crate::crc::Crc32;

pub const PREAMBLE_BYTE: u8 = 0x55;
pub const SFD: u8 = 0xD5;
/// Seven preamble bytes plus the start-of-frame delimiter.
pub const PREAMBLE_LEN: usize = 8;
pub const ETH_HEADER_LEN: usize = 14;
pub const IPV4_HEADER_LEN: usize = 20;
pub const UDP_HEADER_LEN: usize = 8;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const IP_PROTO_UDP: u8 = 17;

pub const IP_OFFSET: usize = PREAMBLE_LEN + ETH_HEADER_LEN;
pub const UDP_OFFSET: usize = IP_OFFSET + IPV4_HEADER_LEN;
pub const PAYLOAD_OFFSET: usize = UDP_OFFSET + UDP_HEADER_LEN;
const ETHERTYPE_OFFSET: usize = PREAMBLE_LEN + 12;
const IP_PROTOCOL_OFFSET: usize = IP_OFFSET + 9;
const IP_CHECKSUM_OFFSET: usize = IP_OFFSET + 10;
/// Version 4, 20-byte header.
const IPV4_VERSION_IHL: u8 = 0x45;

/// Smallest payload that fills a 60-byte MAC frame without padding.
pub const MIN_PAYLOAD: usize = 60 - ETH_HEADER_LEN - IPV4_HEADER_LEN - UDP_HEADER_LEN;
/// Largest payload inside a 1500-byte MTU.
pub const MAX_PAYLOAD: usize = 1500 - IPV4_HEADER_LEN - UDP_HEADER_LEN;

/// The fixed frame, serialized once from configuration.
///
/// Offsets `0..len()` hold preamble, SFD, Ethernet header, IPv4 header,
/// UDP header and payload. Reads past the end yield zero. The FCS is not
/// part of the template; it is computed on the fly while transmitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTemplate {
    bytes: Box<[u8]>,
    header_checksum: u16,
}

impl FrameTemplate {
    /// Serializes `config` into a template.
    ///
    /// Fails when the payload length is out of range or when a supplied
    /// header checksum disagrees with the header fields.
    pub fn build(config: &FrameConfig) -> Result<Self, TxError> {
        let payload_len = config.payload.len();
        if !(MIN_PAYLOAD..=MAX_PAYLOAD).contains(&payload_len) {
            return Err(TxError::PayloadLength {
                len: payload_len,
                min: MIN_PAYLOAD,
                max: MAX_PAYLOAD,
            });
        }

        let udp_len = (UDP_HEADER_LEN + payload_len) as u16;
        let ip_total_len = IPV4_HEADER_LEN as u16 + udp_len;

        let mut bytes = Vec::with_capacity(PAYLOAD_OFFSET + payload_len);
        bytes.extend_from_slice(&[PREAMBLE_BYTE; PREAMBLE_LEN - 1]);
        bytes.push(SFD);

        bytes.extend_from_slice(&config.destination_mac);
        bytes.extend_from_slice(&config.source_mac);
        bytes.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

        // No TOS, no fragmentation.
        bytes.extend_from_slice(&[IPV4_VERSION_IHL, 0x00]);
        bytes.extend_from_slice(&ip_total_len.to_be_bytes());
        bytes.extend_from_slice(&config.identification.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x00]);
        bytes.extend_from_slice(&[config.ttl, IP_PROTO_UDP]);
        bytes.extend_from_slice(&[0x00, 0x00]);
        bytes.extend_from_slice(&config.source_ip);
        bytes.extend_from_slice(&config.destination_ip);

        // UDP checksum zero: not computed.
        bytes.extend_from_slice(&config.source_port.to_be_bytes());
        bytes.extend_from_slice(&config.destination_port.to_be_bytes());
        bytes.extend_from_slice(&udp_len.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x00]);

        bytes.extend_from_slice(&config.payload);

        let computed = checksum::header_checksum(&bytes[IP_OFFSET..UDP_OFFSET]);
        if let Some(supplied) = config.header_checksum {
            if supplied != computed {
                return Err(TxError::ChecksumMismatch { supplied, computed });
            }
        }
        bytes[IP_CHECKSUM_OFFSET..IP_CHECKSUM_OFFSET + 2].copy_from_slice(&computed.to_be_bytes());

        let template = Self::from_bytes(bytes)?;
        tracing::info!(
            "FrameTemplate: {} bytes, IP checksum {:#06x}, FCS {:#010x}",
            template.len(),
            template.header_checksum,
            template.fcs()
        );
        Ok(template)
    }

    /// Adopts an already-serialized frame after checking that its length
    /// fields and header checksum are consistent.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TxError> {
        if bytes.len() < PAYLOAD_OFFSET + MIN_PAYLOAD {
            return Err(TxError::PayloadLength {
                len: bytes.len().saturating_sub(PAYLOAD_OFFSET),
                min: MIN_PAYLOAD,
                max: MAX_PAYLOAD,
            });
        }
        let header_checksum =
            u16::from_be_bytes([bytes[IP_CHECKSUM_OFFSET], bytes[IP_CHECKSUM_OFFSET + 1]]);
        let template = Self {
            bytes: bytes.into_boxed_slice(),
            header_checksum,
        };
        template.verify()?;
        Ok(template)
    }

    /// Checks the fixed framing bytes the offsets below rely on, the IPv4 and
    /// UDP length fields against the frame size, and the header checksum
    /// against the header contents.
    pub fn verify(&self) -> Result<(), TxError> {
        for offset in 0..PREAMBLE_LEN - 1 {
            self.expect_byte("preamble", offset, PREAMBLE_BYTE)?;
        }
        self.expect_byte("start-of-frame delimiter", PREAMBLE_LEN - 1, SFD)?;

        let ethertype = self.read_be16(ETHERTYPE_OFFSET);
        if ethertype != ETHERTYPE_IPV4 {
            return Err(TxError::Framing {
                field: "EtherType",
                offset: ETHERTYPE_OFFSET,
                expected: ETHERTYPE_IPV4,
                found: ethertype,
            });
        }
        // Options would move every later offset.
        self.expect_byte("IPv4 version/IHL", IP_OFFSET, IPV4_VERSION_IHL)?;
        self.expect_byte("IPv4 protocol", IP_PROTOCOL_OFFSET, IP_PROTO_UDP)?;

        let ip_total = self.read_be16(IP_OFFSET + 2) as usize;
        let ip_actual = self.bytes.len() - IP_OFFSET;
        if ip_total != ip_actual {
            return Err(TxError::LengthMismatch {
                field: "IPv4 total length",
                encoded: ip_total,
                actual: ip_actual,
            });
        }

        let udp_len = self.read_be16(UDP_OFFSET + 4) as usize;
        let udp_actual = self.bytes.len() - UDP_OFFSET;
        if udp_len != udp_actual {
            return Err(TxError::LengthMismatch {
                field: "UDP length",
                encoded: udp_len,
                actual: udp_actual,
            });
        }

        if !checksum::verify(self.ip_header()) {
            let mut zeroed = [0u8; IPV4_HEADER_LEN];
            zeroed.copy_from_slice(self.ip_header());
            zeroed[10] = 0;
            zeroed[11] = 0;
            return Err(TxError::ChecksumMismatch {
                supplied: self.header_checksum,
                computed: checksum::header_checksum(&zeroed),
            });
        }
        Ok(())
    }

    fn expect_byte(&self, field: &'static str, offset: usize, expected: u8) -> Result<(), TxError> {
        let found = self.byte_at(offset);
        if found != expected {
            return Err(TxError::Framing {
                field,
                offset,
                expected: expected as u16,
                found: found as u16,
            });
        }
        Ok(())
    }

    fn read_be16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.byte_at(offset), self.byte_at(offset + 1)])
    }

    /// Byte at `offset`, or zero past the end of the frame.
    #[inline]
    pub fn byte_at(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }

    /// Transmitted length in bytes, excluding the FCS.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Offset of the first byte covered by the FCS.
    pub const fn crc_start(&self) -> usize {
        PREAMBLE_LEN
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn ip_header(&self) -> &[u8] {
        &self.bytes[IP_OFFSET..UDP_OFFSET]
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[PAYLOAD_OFFSET..]
    }

    pub fn header_checksum(&self) -> u16 {
        self.header_checksum
    }

    /// The MAC frame the FCS covers: destination address through payload.
    pub fn mac_frame(&self) -> &[u8] {
        &self.bytes[self.crc_start()..]
    }

    pub fn fcs(&self) -> u32 {
        Crc32::checksum(self.mac_frame())
    }

    /// Every byte that appears on the line, FCS included.
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() + 4);
        out.extend_from_slice(&self.bytes);
        out.extend_from_slice(&self.fcs().to_le_bytes());
        out
    }
}
