//! # pailstore
//!
//! Embedded key-value store with a fixed-geometry on-disk hash index and an
//! append-mostly record log. No external database engine; the whole layout
//! is two files per named store.
//!
//! Two backends implement the [`Store`] contract:
//! - [`DiskStore`]: 16-bucket, 4-slot index file plus a record log, generic
//!   over a [`ValueCodec`]
//! - [`MemStore`]: plain hash map for non-persistent configurations
//!
//! Single writer, single reader, blocking I/O. File handles are acquired at
//! construction and released deterministically by `close` or drop.

#![warn(missing_docs)]

mod codec;
mod disk;
mod error;
mod format;
mod mem;
mod store;

pub use codec::{RawCodec, Utf8Codec, ValueCodec};
pub use disk::DiskStore;
pub use error::{Error, Result};
pub use mem::MemStore;
pub use store::Store;
