//! On-disk layout for pailstore
//!
//! Each named store owns two files:
//! ```text
//! <name>.idx   16 buckets x 4 slots x 8-byte LE offsets (512 bytes, fixed)
//! <name>.dat   [magic "PAILDAT1"][version: u32 LE] followed by records
//! ```
//!
//! Record format:
//! ```text
//! [key_len: u32 LE][key bytes][value_len: u32 LE][value bytes]
//! ```
//!
//! A slot value of 0 means "empty"; the data header occupies offset 0, so
//! no record ever has that offset.

use nom::{bytes::complete::tag, number::complete::le_u32, sequence::preceded, IResult};

use crate::error::{Error, Result};

/// Magic header for data files
pub const DATA_MAGIC: &[u8] = b"PAILDAT1";

/// Current data file format version
pub const DATA_VERSION: u32 = 1;

/// Data file header length: magic plus version
pub const DATA_HEADER_LEN: usize = DATA_MAGIC.len() + 4;

/// Number of buckets in the index file
pub const BUCKET_COUNT: usize = 16;

/// Slots per bucket
pub const SLOTS_PER_BUCKET: usize = 4;

/// Bytes per slot (one u64 data-file offset)
pub const SLOT_LEN: usize = 8;

/// Bytes per bucket
pub const BUCKET_LEN: usize = SLOTS_PER_BUCKET * SLOT_LEN;

/// Total index file length
pub const INDEX_LEN: usize = BUCKET_COUNT * BUCKET_LEN;

/// Slot value marking an empty slot
pub const EMPTY_SLOT: u64 = 0;

/// Maximum key length (64 KiB)
pub const MAX_KEY_LEN: usize = 64 * 1024;

/// Maximum encoded value length (1 MiB)
pub const MAX_VALUE_LEN: usize = 1024 * 1024;

/// Create a data file header
pub fn create_header(version: u32) -> Vec<u8> {
    let mut header = Vec::with_capacity(DATA_HEADER_LEN);
    header.extend_from_slice(DATA_MAGIC);
    header.extend_from_slice(&version.to_le_bytes());
    header
}

/// Parse and validate a data file header, returning the format version
pub fn parse_header(input: &[u8]) -> Result<u32> {
    if input.len() < DATA_HEADER_LEN {
        return Err(Error::Corrupt("data header truncated".to_string()));
    }

    let result: IResult<&[u8], u32> = preceded(tag(DATA_MAGIC), le_u32)(input);
    let (_, version) = result?;

    if version != DATA_VERSION {
        return Err(Error::Corrupt(format!(
            "unsupported data format version {}",
            version
        )));
    }

    Ok(version)
}

/// Total footprint of a record holding the given key and value lengths
pub fn record_len(key_len: usize, value_len: usize) -> usize {
    4 + key_len + 4 + value_len
}

/// Frame a key and an encoded value into record bytes
pub fn encode_record(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(record_len(key.len(), value.len()));
    record.extend_from_slice(&(key.len() as u32).to_le_bytes());
    record.extend_from_slice(key);
    record.extend_from_slice(&(value.len() as u32).to_le_bytes());
    record.extend_from_slice(value);
    record
}

/// Byte offset of a slot inside the index file
pub fn slot_offset(bucket: usize, slot: usize) -> usize {
    bucket * BUCKET_LEN + slot * SLOT_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = create_header(DATA_VERSION);
        assert_eq!(header.len(), DATA_HEADER_LEN);
        assert_eq!(parse_header(&header).unwrap(), DATA_VERSION);
    }

    #[test]
    fn test_header_invalid_magic() {
        let mut header = create_header(DATA_VERSION);
        header[0] = b'X';
        assert!(parse_header(&header).is_err());
    }

    #[test]
    fn test_header_truncated() {
        let header = create_header(DATA_VERSION);
        assert!(parse_header(&header[..DATA_HEADER_LEN - 1]).is_err());
    }

    #[test]
    fn test_header_unknown_version() {
        let header = create_header(DATA_VERSION + 1);
        assert!(matches!(parse_header(&header), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_record_layout() {
        let record = encode_record(b"key", b"value");

        assert_eq!(record.len(), record_len(3, 5));
        assert_eq!(u32::from_le_bytes([record[0], record[1], record[2], record[3]]), 3);
        assert_eq!(&record[4..7], b"key");
        assert_eq!(u32::from_le_bytes([record[7], record[8], record[9], record[10]]), 5);
        assert_eq!(&record[11..], b"value");
    }

    #[test]
    fn test_slot_offsets() {
        assert_eq!(slot_offset(0, 0), 0);
        assert_eq!(slot_offset(0, 3), 24);
        assert_eq!(slot_offset(1, 0), BUCKET_LEN);
        assert_eq!(slot_offset(BUCKET_COUNT - 1, SLOTS_PER_BUCKET - 1), INDEX_LEN - SLOT_LEN);
    }
}
