//! Error types for tailstore.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the index and page primitives.
///
/// Every variant is a local, synchronous failure. None of them leave the
/// structure that raised it partially modified.
///
/// A full page is deliberately absent: `Page::write` reports it as
/// `Ok(None)` so bulk loaders can check it cheaply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// `get` on a key the index does not hold.
    #[error("Key {0} not found")]
    KeyNotFound(i64),

    /// `batch_insert` whose first key does not exceed the current maximum.
    #[error("Batch starts at key {first} but index already holds key {max}")]
    OrderingViolation { first: i64, max: i64 },

    /// `batch_insert_strict` found a key that does not follow its predecessor.
    #[error("Unsorted batch: key {key} at position {position} does not follow {previous}")]
    UnsortedBatch {
        position: usize,
        previous: i64,
        key: i64,
    },

    /// A range lookup without both a start and a stop.
    #[error("Range lookup must have both start and stop")]
    MissingBound,

    /// A lookup request that is neither a single key nor a bounded range.
    #[error("Invalid lookup request: {0:?}")]
    InvalidRequestShape(String),

    /// Slot access past the records written so far.
    #[error("Slot {index} out of range (page holds {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Record column count does not match the page layout.
    #[error("Record has {actual} columns, page layout expects {expected}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// A page image that is truncated or internally inconsistent.
    #[error("Corrupted page image: {0}")]
    Corrupted(String),

    /// A page image whose stored checksum does not match its contents.
    #[error("Page checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}
