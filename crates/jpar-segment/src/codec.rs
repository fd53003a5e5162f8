use bytes::{BufMut, BytesMut};

use crate::error::{Result, SegmentError};

/// APP0 marker bytes.
pub const APP0_MARKER: [u8; 2] = [0xFF, 0xE0];

/// Signature identifying segments written by jpar: "JPAR\0".
pub const SIGNATURE: [u8; 5] = *b"JPAR\0";

/// Bytes counted by the length field besides the payload: length (2) + signature (5).
pub const PREFIX_SIZE: usize = 2 + SIGNATURE.len();

/// Largest payload a single segment can carry.
pub const MAX_SEGMENT_PAYLOAD: usize = 0xFFFF - PREFIX_SIZE;

/// Encode the marker, length and signature that precede a payload of `payload_len` bytes.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────┬──────────────────┬──────────────────┐
/// │ Marker (2B)  │ Length     │ Signature (5B)   │ Payload          │
/// │ 0xFF 0xE0    │ (2B BE)    │ "JPAR\0"         │ (Length-7 bytes) │
/// └──────────────┴────────────┴──────────────────┴──────────────────┘
/// ```
pub fn encode_prefix(payload_len: usize, dst: &mut BytesMut) -> Result<()> {
    if payload_len > MAX_SEGMENT_PAYLOAD {
        return Err(SegmentError::PayloadTooLarge {
            size: payload_len,
            max: MAX_SEGMENT_PAYLOAD,
        });
    }
    dst.reserve(APP0_MARKER.len() + PREFIX_SIZE);
    dst.put_slice(&APP0_MARKER);
    dst.put_u16((payload_len + PREFIX_SIZE) as u16);
    dst.put_slice(&SIGNATURE);
    Ok(())
}

/// Validate the 7 bytes following an APP0 marker and return the payload length.
pub fn decode_prefix(prefix: &[u8; PREFIX_SIZE]) -> Result<usize> {
    let signature: [u8; 5] = [prefix[2], prefix[3], prefix[4], prefix[5], prefix[6]];
    if signature != SIGNATURE {
        return Err(SegmentError::UnrecognizedSegment {
            marker: APP0_MARKER,
            signature: Some(signature),
        });
    }

    let length = u16::from_be_bytes([prefix[0], prefix[1]]);
    let payload_len = usize::from(length)
        .checked_sub(PREFIX_SIZE)
        .ok_or(SegmentError::InvalidLength { length })?;
    Ok(payload_len)
}

/// Configuration for the segment writer.
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Payload bytes per full segment. Default and maximum: [`MAX_SEGMENT_PAYLOAD`].
    pub max_payload_size: usize,
}

impl SegmentConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_payload_size == 0 || self.max_payload_size > MAX_SEGMENT_PAYLOAD {
            return Err(SegmentError::PayloadTooLarge {
                size: self.max_payload_size,
                max: MAX_SEGMENT_PAYLOAD,
            });
        }
        Ok(())
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_SEGMENT_PAYLOAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_payload_fills_length_field() {
        assert_eq!(MAX_SEGMENT_PAYLOAD, 65528);
        assert_eq!(MAX_SEGMENT_PAYLOAD + PREFIX_SIZE, 0xFFFF);
    }

    #[test]
    fn test_encode_prefix_layout() {
        let mut buf = BytesMut::new();
        encode_prefix(5, &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            &[0xFF, 0xE0, 0x00, 0x0C, b'J', b'P', b'A', b'R', 0x00]
        );
    }

    #[test]
    fn test_encode_prefix_max_payload() {
        let mut buf = BytesMut::new();
        encode_prefix(MAX_SEGMENT_PAYLOAD, &mut buf).unwrap();
        assert_eq!(&buf[2..4], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_prefix_rejects_oversized() {
        let mut buf = BytesMut::new();
        let err = encode_prefix(MAX_SEGMENT_PAYLOAD + 1, &mut buf).unwrap_err();
        assert!(matches!(err, SegmentError::PayloadTooLarge { .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_prefix_roundtrip() {
        let mut buf = BytesMut::new();
        encode_prefix(1234, &mut buf).unwrap();

        let prefix: [u8; PREFIX_SIZE] = buf[2..].try_into().unwrap();
        assert_eq!(decode_prefix(&prefix).unwrap(), 1234);
    }

    #[test]
    fn test_decode_prefix_empty_payload() {
        let prefix = [0x00, 0x07, b'J', b'P', b'A', b'R', 0x00];
        assert_eq!(decode_prefix(&prefix).unwrap(), 0);
    }

    #[test]
    fn test_decode_prefix_rejects_short_length() {
        for length in 0u16..7 {
            let [hi, lo] = length.to_be_bytes();
            let prefix = [hi, lo, b'J', b'P', b'A', b'R', 0x00];
            let err = decode_prefix(&prefix).unwrap_err();
            assert!(matches!(err, SegmentError::InvalidLength { length: l } if l == length));
        }
    }

    #[test]
    fn test_decode_prefix_rejects_any_signature_byte() {
        for idx in 2..PREFIX_SIZE {
            let mut prefix = [0x00, 0x10, b'J', b'P', b'A', b'R', 0x00];
            prefix[idx] ^= 0x01;
            let err = decode_prefix(&prefix).unwrap_err();
            assert!(err.is_unrecognized(), "byte {idx} accepted");
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SegmentConfig::default().validate().is_ok());
        assert!(SegmentConfig { max_payload_size: 1 }.validate().is_ok());
        assert!(SegmentConfig { max_payload_size: 0 }.validate().is_err());
        assert!(SegmentConfig {
            max_payload_size: MAX_SEGMENT_PAYLOAD + 1
        }
        .validate()
        .is_err());
    }
}
