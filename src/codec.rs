//! Binary <-> base64 conversion for the JSON envelope
//!
//! The server stores and returns GLB content as standard (padded) base64, so
//! that is the only alphabet accepted here.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Magic bytes every GLB container starts with
pub const GLB_MAGIC: &[u8; 4] = b"glTF";

/// Encode raw bytes for the `data` field of an envelope
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode the `data` field of an envelope back into raw bytes
///
/// # Errors
///
/// Returns [`base64::DecodeError`] on characters outside the alphabet or on
/// a length/padding that is not a multiple of four.
pub fn decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(data)
}

/// Whether `bytes` carries the GLB header the server checks for
#[must_use]
pub fn looks_like_glb(bytes: &[u8]) -> bool {
    bytes.starts_with(GLB_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_glb_header() {
        assert_eq!(encode(&[0x67, 0x6C, 0x54, 0x46]), "Z2xURg==");
    }

    #[test]
    fn test_empty_round_trip() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_non_utf8() {
        let bytes: Vec<u8> = (0..=255u8).rev().chain([0xC3, 0x28, 0xFF, 0x00]).collect();
        assert!(std::str::from_utf8(&bytes).is_err());
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        assert!(decode("AAA").is_err());
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        assert!(decode("Z2x*Rg==").is_err());
        assert!(decode("Z2xURg-_").is_err());
    }

    #[test]
    fn test_glb_magic() {
        assert!(looks_like_glb(b"glTF\x02\x00\x00\x00"));
        assert!(!looks_like_glb(b"glT"));
        assert!(!looks_like_glb(b"PK\x03\x04"));
    }
}
