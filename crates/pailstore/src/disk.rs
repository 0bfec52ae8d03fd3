//! Persistent hash-indexed store
//!
//! File layout per named store:
//! - `<name>.idx`: fixed-size bucket index, memory-mapped
//! - `<name>.dat`: header followed by an append-mostly record log
//!
//! A key hashes to one of 16 buckets of 4 slots each; a slot holds the
//! data-file offset of the key's record, or 0 for empty. Occupied slots sit
//! contiguously at the front of their bucket, so every scan stops at the
//! first empty slot. Replaced and removed records are zeroed in place and
//! the log only grows; there is no space reclamation and no bucket
//! resizing, so a bucket whose 4 slots hold distinct keys rejects further
//! inserts.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;
use tracing::{debug, trace, warn};
use xxhash_rust::xxh64::xxh64;

use crate::codec::ValueCodec;
use crate::error::{Error, Result};
use crate::format::{
    self, BUCKET_COUNT, DATA_HEADER_LEN, DATA_VERSION, EMPTY_SLOT, INDEX_LEN, MAX_KEY_LEN,
    MAX_VALUE_LEN, SLOTS_PER_BUCKET, SLOT_LEN,
};
use crate::store::Store;

/// Disk-backed store pairing a fixed bucket index with a record log
pub struct DiskStore<C: ValueCodec> {
    /// Base path the `.idx`/`.dat` suffixes are appended to
    path: PathBuf,

    /// Bucket index mapping
    index: MmapMut,

    /// Index file handle, kept for the flush on close
    index_file: File,

    /// Record log handle
    data_file: File,

    /// Value codec
    codec: C,

    /// Set once `close` has run
    closed: bool,
}

/// Bucket index for a key
///
/// Hashing into `u64` keeps the value non-negative before the modulo, so
/// the bucket index is valid by construction.
fn bucket_of(key: &str) -> usize {
    (xxh64(key.as_bytes(), 0) % BUCKET_COUNT as u64) as usize
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

impl<C: ValueCodec> DiskStore<C> {
    /// Open or create the store named by `path`
    ///
    /// The index lives at `<path>.idx` and the record log at `<path>.dat`.
    /// Both handles are held until `close` or drop.
    pub fn open<P: AsRef<Path>>(path: P, codec: C) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let idx_path = with_suffix(&path, ".idx");
        let dat_path = with_suffix(&path, ".dat");

        let index_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&idx_path)?;
        index_file.set_len(INDEX_LEN as u64)?;
        let index = unsafe { MmapMut::map_mut(&index_file)? };

        let mut data_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&dat_path)?;

        let data_len = data_file.metadata()?.len();
        if data_len == 0 {
            // Reserve the header so no record ever lands at offset 0.
            data_file.write_all(&format::create_header(DATA_VERSION))?;
            debug!(path = %dat_path.display(), "created data file");
        } else {
            if data_len < DATA_HEADER_LEN as u64 {
                return Err(Error::Corrupt("data file shorter than header".to_string()));
            }
            let mut header = [0u8; DATA_HEADER_LEN];
            data_file.seek(SeekFrom::Start(0))?;
            data_file.read_exact(&mut header)?;
            format::parse_header(&header)?;
            debug!(path = %dat_path.display(), len = data_len, "opened data file");
        }

        Ok(Self {
            path,
            index,
            index_file,
            data_file,
            codec,
            closed: false,
        })
    }

    /// Flush both files and mark the store closed
    ///
    /// Runs on drop as a fallback; calling it explicitly surfaces flush
    /// errors instead of discarding them. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.index.flush()?;
        self.index_file.sync_all()?;
        self.data_file.sync_all()?;
        self.closed = true;
        debug!(path = %self.path.display(), "closed store");

        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    fn slot(&self, bucket: usize, slot: usize) -> u64 {
        let off = format::slot_offset(bucket, slot);
        let mut buf = [0u8; SLOT_LEN];
        buf.copy_from_slice(&self.index[off..off + SLOT_LEN]);
        u64::from_le_bytes(buf)
    }

    fn set_slot(&mut self, bucket: usize, slot: usize, ptr: u64) {
        let off = format::slot_offset(bucket, slot);
        self.index[off..off + SLOT_LEN].copy_from_slice(&ptr.to_le_bytes());
    }

    /// First empty slot of a bucket, if any
    fn free_slot(&self, bucket: usize) -> Option<usize> {
        (0..SLOTS_PER_BUCKET).find(|&slot| self.slot(bucket, slot) == EMPTY_SLOT)
    }

    /// Scan `key`'s bucket for its record
    ///
    /// Returns the slot position and record offset on a match. The scan
    /// ends at the first empty slot.
    fn find_slot(&mut self, key: &str) -> Result<Option<(usize, u64)>> {
        let bucket = bucket_of(key);
        for slot in 0..SLOTS_PER_BUCKET {
            let ptr = self.slot(bucket, slot);
            if ptr == EMPTY_SLOT {
                return Ok(None);
            }
            if self.read_key_at(ptr)? == key.as_bytes() {
                return Ok(Some((slot, ptr)));
            }
        }
        Ok(None)
    }

    fn read_len(&mut self, max: usize, what: &str, ptr: u64) -> Result<usize> {
        let mut buf = [0u8; 4];
        self.data_file.read_exact(&mut buf)?;
        let len = u32::from_le_bytes(buf) as usize;
        if len > max {
            return Err(Error::Corrupt(format!(
                "{} length {} in record at offset {}",
                what, len, ptr
            )));
        }
        Ok(len)
    }

    fn read_key_at(&mut self, ptr: u64) -> Result<Vec<u8>> {
        self.data_file.seek(SeekFrom::Start(ptr))?;
        let key_len = self.read_len(MAX_KEY_LEN, "key", ptr)?;

        let mut key = vec![0u8; key_len];
        self.data_file.read_exact(&mut key)?;
        Ok(key)
    }

    fn read_value_at(&mut self, ptr: u64) -> Result<Vec<u8>> {
        self.data_file.seek(SeekFrom::Start(ptr))?;
        let key_len = self.read_len(MAX_KEY_LEN, "key", ptr)?;
        self.data_file.seek(SeekFrom::Current(key_len as i64))?;
        let value_len = self.read_len(MAX_VALUE_LEN, "value", ptr)?;

        let mut value = vec![0u8; value_len];
        self.data_file.read_exact(&mut value)?;
        Ok(value)
    }

    /// Zero a record in place, leaving its footprint in the log
    fn tombstone_at(&mut self, ptr: u64) -> Result<()> {
        self.data_file.seek(SeekFrom::Start(ptr))?;
        let key_len = self.read_len(MAX_KEY_LEN, "key", ptr)?;
        self.data_file.seek(SeekFrom::Current(key_len as i64))?;
        let value_len = self.read_len(MAX_VALUE_LEN, "value", ptr)?;

        let record_len = format::record_len(key_len, value_len);
        self.data_file.seek(SeekFrom::Start(ptr))?;
        self.data_file.write_all(&vec![0u8; record_len])?;
        trace!(offset = ptr, len = record_len, "tombstoned record");
        Ok(())
    }

    /// Append a framed record at end-of-file and return its offset
    fn append_record(&mut self, key: &[u8], value: &[u8]) -> Result<u64> {
        let ptr = self.data_file.seek(SeekFrom::End(0))?;
        self.data_file
            .write_all(&format::encode_record(key, value))?;
        trace!(
            offset = ptr,
            key_len = key.len(),
            value_len = value.len(),
            "appended record"
        );
        Ok(ptr)
    }
}

impl<C: ValueCodec> Store for DiskStore<C> {
    type Value = C::Value;

    fn get(&mut self, key: &str) -> Result<Option<C::Value>> {
        self.ensure_open()?;

        match self.find_slot(key)? {
            None => Ok(None),
            Some((_, ptr)) => {
                let bytes = self.read_value_at(ptr)?;
                Ok(Some(self.codec.decode(&bytes)?))
            }
        }
    }

    fn put(&mut self, key: &str, value: C::Value) -> Result<()> {
        self.ensure_open()?;

        if key.len() > MAX_KEY_LEN {
            return Err(Error::KeyTooLarge(key.len()));
        }
        let encoded = self.codec.encode(&value)?;
        if encoded.len() > MAX_VALUE_LEN {
            return Err(Error::ValueTooLarge(encoded.len()));
        }

        let bucket = bucket_of(key);
        let slot = match self.find_slot(key)? {
            Some((slot, ptr)) => {
                // Same bytes already on disk: skip the rewrite.
                if self.read_value_at(ptr)? == encoded {
                    return Ok(());
                }
                self.tombstone_at(ptr)?;
                slot
            }
            None => match self.free_slot(bucket) {
                Some(slot) => slot,
                None => {
                    warn!(bucket, "bucket out of slots");
                    return Err(Error::BucketFull { bucket });
                }
            },
        };

        let ptr = self.append_record(key.as_bytes(), &encoded)?;
        self.set_slot(bucket, slot, ptr);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Option<C::Value>> {
        self.ensure_open()?;

        let bucket = bucket_of(key);
        let (slot, ptr) = match self.find_slot(key)? {
            Some(found) => found,
            None => return Ok(None),
        };

        let bytes = self.read_value_at(ptr)?;
        self.tombstone_at(ptr)?;

        // Close the gap so occupied slots stay contiguous from slot 0.
        for i in slot..SLOTS_PER_BUCKET - 1 {
            let next = self.slot(bucket, i + 1);
            self.set_slot(bucket, i, next);
        }
        self.set_slot(bucket, SLOTS_PER_BUCKET - 1, EMPTY_SLOT);

        Ok(Some(self.codec.decode(&bytes)?))
    }

    fn contains(&mut self, key: &str) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.find_slot(key)?.is_some())
    }
}

impl<C: ValueCodec> Drop for DiskStore<C> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
