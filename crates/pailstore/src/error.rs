//! Error types for pailstore

use std::fmt;
use std::io;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store operations
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Corrupt or unexpected on-disk bytes
    Corrupt(String),

    /// Every slot of the key's bucket already holds a distinct key
    BucketFull {
        /// Index of the bucket that ran out of slots
        bucket: usize,
    },

    /// Key too large (max 64 KiB)
    KeyTooLarge(usize),

    /// Encoded value too large (max 1 MiB)
    ValueTooLarge(usize),

    /// Store is closed
    Closed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Corrupt(msg) => write!(f, "Corrupt data: {}", msg),
            Error::BucketFull { bucket } => write!(f, "Bucket {} has no free slot", bucket),
            Error::KeyTooLarge(size) => write!(f, "Key too large: {} bytes (max 64 KiB)", size),
            Error::ValueTooLarge(size) => {
                write!(f, "Value too large: {} bytes (max 1 MiB)", size)
            }
            Error::Closed => write!(f, "Store is closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        Error::Corrupt(format!("{:?}", err))
    }
}
