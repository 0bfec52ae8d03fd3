//! Value codecs
//!
//! The store frames records as length-prefixed byte runs; what the value
//! bytes mean is the codec's business. A codec failure on read is reported
//! as corruption.

use crate::error::{Error, Result};

/// Encodes and decodes values to and from raw bytes
pub trait ValueCodec {
    /// Value type handled by this codec
    type Value;

    /// Encode a value into bytes
    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>>;

    /// Decode a value from bytes
    fn decode(&self, bytes: &[u8]) -> Result<Self::Value>;
}

/// Codec for UTF-8 string values
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Codec;

impl ValueCodec for Utf8Codec {
    type Value = String;

    fn encode(&self, value: &String) -> Result<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Corrupt(format!("invalid UTF-8 value: {}", e)))
    }
}

/// Identity codec for raw byte values
#[derive(Debug, Default, Clone, Copy)]
pub struct RawCodec;

impl ValueCodec for RawCodec {
    type Value = Vec<u8>;

    fn encode(&self, value: &Vec<u8>) -> Result<Vec<u8>> {
        Ok(value.clone())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_roundtrip() {
        let codec = Utf8Codec;
        let encoded = codec.encode(&"grüße".to_string()).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), "grüße");
    }

    #[test]
    fn test_utf8_rejects_invalid_bytes() {
        let codec = Utf8Codec;
        let result = codec.decode(&[0xff, 0xfe, 0xfd]);
        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_raw_identity() {
        let codec = RawCodec;
        let bytes = vec![0u8, 1, 2, 255];
        let encoded = codec.encode(&bytes).unwrap();
        assert_eq!(encoded, bytes);
        assert_eq!(codec.decode(&encoded).unwrap(), bytes);
    }
}
