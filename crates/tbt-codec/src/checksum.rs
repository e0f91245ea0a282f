//! Internet checksum (RFC 1071) over big-endian 16-bit words.

/// Folds a wide accumulator into 16 bits, adding the carries back in until
/// none remain.
pub fn fold(mut sum: u64) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// Ones'-complement sum of `bytes` read as big-endian words. An odd trailing
/// byte is padded with zero.
pub fn ones_complement_sum(bytes: &[u8]) -> u16 {
    let sum = bytes
        .chunks(2)
        .map(|chunk| match chunk {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]) as u64,
            [hi] => u16::from_be_bytes([*hi, 0]) as u64,
            _ => 0,
        })
        .sum();
    fold(sum)
}

/// Checksum to embed in a header whose checksum field is currently zero.
pub fn header_checksum(header: &[u8]) -> u16 {
    !ones_complement_sum(header)
}

/// A header carrying a correct checksum sums to all-ones.
pub fn verify(header: &[u8]) -> bool {
    ones_complement_sum(header) == 0xFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_adds_carries_until_stable() {
        assert_eq!(fold(0x0001_FFFF), 0x0001);
        assert_eq!(fold(0x0002_FFFE), 0x0001);
        assert_eq!(fold(0x1234), 0x1234);
    }

    #[test]
    fn rfc1071_sample() {
        // Worked example from RFC 1071 section 3.
        let data = [0x00, 0x01, 0xF2, 0x03, 0xF4, 0xF5, 0xF6, 0xF7];
        assert_eq!(ones_complement_sum(&data), 0xDDF2);
    }

    #[test]
    fn embedded_checksum_self_verifies() {
        let mut header = [
            0x45, 0x00, 0x00, 0x2E, 0x00, 0x00, 0x00, 0x00, 0x80, 0x11, 0x00, 0x00, 192, 168, 0,
            44, 192, 168, 0, 4,
        ];
        let csum = header_checksum(&header);
        assert_eq!(csum, 0xB93E);
        header[10..12].copy_from_slice(&csum.to_be_bytes());
        assert!(verify(&header));
    }

    #[test]
    fn odd_length_pads_with_zero() {
        assert_eq!(ones_complement_sum(&[0x12]), 0x1200);
    }
}
