//! # Frame Template Tests
//!
//! Validates header checksum self-verification, configuration-time
//! rejection of inconsistent frames, and the CRC-32 engine against an
//! independent implementation.

use tbt_codec::checksum;
use tbt_codec::template::{IP_OFFSET, PAYLOAD_OFFSET, UDP_OFFSET};
use tbt_codec::{Crc32, FrameTemplate};
use tbt_core::{FrameConfig, TxError};
use std::time::Instant;

fn configs() -> Vec<FrameConfig> {
    vec![
        FrameConfig::default(),
        FrameConfig {
            source_ip: [10, 0, 0, 1],
            destination_ip: [255, 255, 255, 255],
            destination_mac: [0xFF; 6],
            ..FrameConfig::default()
        },
        FrameConfig {
            source_ip: [0xFF, 0xFF, 0xFF, 0xFF],
            destination_ip: [0xFF, 0xFF, 0xFF, 0xFE],
            ttl: 255,
            identification: 0xFFFF,
            payload: vec![0xA5; 200],
            ..FrameConfig::default()
        },
        FrameConfig {
            source_ip: [0, 0, 0, 0],
            destination_ip: [0, 0, 0, 0],
            ttl: 0,
            payload: vec![0; 1472],
            ..FrameConfig::default()
        },
    ]
}

/// The embedded IPv4 checksum makes the header sum to 0xFFFF for every
/// configuration.
#[test]
fn test_header_checksum_self_verifies() {
    let t = Instant::now();

    for config in configs() {
        let template = FrameTemplate::build(&config).unwrap();
        assert_eq!(
            checksum::ones_complement_sum(template.ip_header()),
            0xFFFF,
            "config {:?}",
            config
        );
        assert!(template.verify().is_ok());
    }

    let overhead = t.elapsed();
    println!("test_header_checksum_self_verifies: Testing Overhead = {:?}", overhead);
}

/// Length fields in the IPv4 and UDP headers track the payload length.
#[test]
fn test_length_fields_follow_payload() {
    for config in configs() {
        let template = FrameTemplate::build(&config).unwrap();
        let bytes = template.as_bytes();
        let ip_total = u16::from_be_bytes([bytes[IP_OFFSET + 2], bytes[IP_OFFSET + 3]]) as usize;
        let udp_len = u16::from_be_bytes([bytes[UDP_OFFSET + 4], bytes[UDP_OFFSET + 5]]) as usize;

        assert_eq!(template.len(), PAYLOAD_OFFSET + config.payload.len());
        assert_eq!(ip_total, 28 + config.payload.len());
        assert_eq!(udp_len, 8 + config.payload.len());
    }
}

/// An externally supplied checksum that disagrees with the header fields is
/// refused at build time.
#[test]
fn test_stale_supplied_checksum_is_refused() {
    let computed = FrameTemplate::build(&FrameConfig::default())
        .unwrap()
        .header_checksum();

    // Checksum left over from a different destination address.
    let config = FrameConfig {
        destination_ip: [192, 168, 0, 5],
        header_checksum: Some(computed),
        ..FrameConfig::default()
    };
    match FrameTemplate::build(&config) {
        Err(TxError::ChecksumMismatch { supplied, computed: fresh }) => {
            assert_eq!(supplied, computed);
            assert_eq!(fresh, computed - 1);
        }
        other => panic!("expected checksum mismatch, got {:?}", other),
    }
}

/// A corrupted header byte in a pre-serialized frame is caught by verification.
#[test]
fn test_corrupted_header_is_refused() {
    let mut bytes = FrameTemplate::build(&FrameConfig::default())
        .unwrap()
        .as_bytes()
        .to_vec();
    bytes[IP_OFFSET + 8] ^= 0x01;
    assert!(matches!(
        FrameTemplate::from_bytes(bytes),
        Err(TxError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_payload_bounds() {
    for len in [0, 17, 1473] {
        let config = FrameConfig {
            payload: vec![0; len],
            ..FrameConfig::default()
        };
        assert!(
            matches!(FrameTemplate::build(&config), Err(TxError::PayloadLength { .. })),
            "payload of {} bytes accepted",
            len
        );
    }
}

/// The bit-serial engine over the configured payload agrees with crc32fast.
#[test]
fn test_crc_engine_matches_reference() {
    let t = Instant::now();

    let payload = FrameConfig::default().payload;
    assert_eq!(Crc32::checksum(&payload), crc32fast::hash(&payload));

    for config in configs() {
        let template = FrameTemplate::build(&config).unwrap();
        assert_eq!(template.fcs(), crc32fast::hash(template.mac_frame()));
    }

    let overhead = t.elapsed();
    println!("test_crc_engine_matches_reference: Testing Overhead = {:?}", overhead);
}
