//! Configuration constants for tailstore.

/// Number of records a [`Page`](crate::storage::page::Page) holds by default.
///
/// The owning store sizes its page ranges around this value, so it is a
/// collaborator decision rather than something the page derives.
pub const PAGE_RECORD_CAPACITY: usize = 512;

/// Default fan-out reserved for a future balanced-tree index.
pub const DEFAULT_ORDER: usize = 75;

/// Default node cache size reserved for a future balanced-tree index.
pub const DEFAULT_CACHE_SIZE: usize = 10_000;

/// Width of one record field in bytes. Every field is stored as a
/// little-endian 64-bit word.
pub const WORD_SIZE: usize = 8;

/// Number of fixed metadata words at the front of every record. The
/// schema encoding and null bitmap follow, sized by the column count.
pub const METADATA_WORDS: usize = 3;

/// Flags packed into one bitmap word.
pub const BITS_PER_WORD: usize = WORD_SIZE * 8;

/// Word index of the indirection pointer.
pub const INDIRECTION_COLUMN: usize = 0;

/// Word index of the record identifier.
pub const RID_COLUMN: usize = 1;

/// Word index of the write timestamp.
pub const TIMESTAMP_COLUMN: usize = 2;

/// Word index of the first schema encoding word.
pub const SCHEMA_ENCODING_COLUMN: usize = 3;
