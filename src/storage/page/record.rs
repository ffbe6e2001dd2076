//! Fixed-schema records and their word layout.

use std::fmt;

use crate::common::config::{
    BITS_PER_WORD, INDIRECTION_COLUMN, METADATA_WORDS, RID_COLUMN, SCHEMA_ENCODING_COLUMN,
    TIMESTAMP_COLUMN, WORD_SIZE,
};
use crate::common::Rid;

/// One stored tuple: metadata fields followed by the user columns.
///
/// A logical update writes a new tail record and redirects the `rid` of an
/// earlier record to it. Every other field is fixed once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Rid of the latest version of this record, or `Rid::NONE`.
    pub indirection: Rid,
    pub rid: Rid,
    pub timestamp: Option<u64>,
    /// One flag per user column, set when this version updated it.
    pub schema_encoding: Vec<bool>,
    pub columns: Vec<Option<i64>>,
}

impl Record {
    pub fn new(
        indirection: Rid,
        rid: Rid,
        timestamp: Option<u64>,
        schema_encoding: Vec<bool>,
        columns: Vec<Option<i64>>,
    ) -> Self {
        Self {
            indirection,
            rid,
            timestamp,
            schema_encoding,
            columns,
        }
    }

    /// A base record: no indirection, no updated columns, every column set.
    pub fn base(rid: Rid, timestamp: u64, columns: Vec<i64>) -> Self {
        let schema_encoding = vec![false; columns.len()];
        Self::new(
            Rid::NONE,
            rid,
            Some(timestamp),
            schema_encoding,
            columns.into_iter().map(Some).collect(),
        )
    }

    /// A tail record carrying only the updated columns. The schema encoding
    /// marks exactly the columns that are present.
    pub fn tail(indirection: Rid, rid: Rid, timestamp: u64, updates: Vec<Option<i64>>) -> Self {
        let schema_encoding = updates.iter().map(Option::is_some).collect();
        Self::new(indirection, rid, Some(timestamp), schema_encoding, updates)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "indirection: {}  |  rid: {}  |  timestamp: ", self.indirection, self.rid)?;
        match self.timestamp {
            Some(ts) => write!(f, "{}", ts)?,
            None => write!(f, "None")?,
        }

        write!(f, "  |  schema_encoding: ")?;
        for updated in &self.schema_encoding {
            write!(f, "{}", u8::from(*updated))?;
        }

        write!(f, "  |  columns: [")?;
        for (i, value) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "None")?,
            }
        }
        write!(f, "]")
    }
}

/// Word layout of a record, decided by the owning table's schema.
///
/// # Layout
/// ```text
/// Word        Field
/// ----        -----
/// 0           indirection (u64, little-endian)
/// 1           rid (u64, little-endian)
/// 2           timestamp (u64, little-endian, 0 when null)
/// 3..         schema encoding, one bit per column (encoding_words)
/// ..          null bitmap: bit 0 timestamp, bit 1+c column c (null_words)
/// ..          user columns (i64, little-endian, 0 when null)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    num_columns: usize,
}

impl RecordLayout {
    /// # Panics
    /// Panics if `num_columns` does not fit the page header's `u16` field.
    pub fn new(num_columns: usize) -> Self {
        assert!(
            num_columns <= u16::MAX as usize,
            "num_columns must fit in u16"
        );
        Self { num_columns }
    }

    /// Number of user columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Words holding the schema encoding bits.
    #[inline]
    pub fn encoding_words(&self) -> usize {
        self.num_columns.div_ceil(BITS_PER_WORD)
    }

    /// Words holding the null bitmap (timestamp plus every column).
    #[inline]
    pub fn null_words(&self) -> usize {
        (self.num_columns + 1).div_ceil(BITS_PER_WORD)
    }

    /// Size of one encoded record in bytes.
    #[inline]
    pub fn record_size(&self) -> usize {
        (METADATA_WORDS + self.encoding_words() + self.null_words() + self.num_columns) * WORD_SIZE
    }

    /// Byte range of the rid word within an encoded record.
    #[inline]
    pub fn rid_range(&self) -> std::ops::Range<usize> {
        Self::word_range(RID_COLUMN)
    }

    #[inline]
    fn word_range(word: usize) -> std::ops::Range<usize> {
        word * WORD_SIZE..(word + 1) * WORD_SIZE
    }

    #[inline]
    fn null_start(&self) -> usize {
        SCHEMA_ENCODING_COLUMN + self.encoding_words()
    }

    #[inline]
    fn column_start(&self) -> usize {
        self.null_start() + self.null_words()
    }

    /// Append the encoding of `record` to `buf`.
    ///
    /// The caller checks the column and schema encoding counts first.
    pub(crate) fn encode_into(&self, record: &Record, buf: &mut Vec<u8>) {
        debug_assert_eq!(record.columns.len(), self.num_columns);
        debug_assert_eq!(record.schema_encoding.len(), self.num_columns);

        let mut fixed = [0u64; METADATA_WORDS];
        fixed[INDIRECTION_COLUMN] = record.indirection.to_word();
        fixed[RID_COLUMN] = record.rid.to_word();
        fixed[TIMESTAMP_COLUMN] = record.timestamp.unwrap_or(0);

        let mut encoding = vec![0u64; self.encoding_words()];
        for (c, updated) in record.schema_encoding.iter().enumerate() {
            if *updated {
                set_bit(&mut encoding, c);
            }
        }

        let mut nulls = vec![0u64; self.null_words()];
        if record.timestamp.is_none() {
            set_bit(&mut nulls, 0);
        }
        for (c, value) in record.columns.iter().enumerate() {
            if value.is_none() {
                set_bit(&mut nulls, c + 1);
            }
        }

        let columns = record.columns.iter().map(|v| v.unwrap_or(0) as u64);

        for word in fixed.into_iter().chain(encoding).chain(nulls).chain(columns) {
            buf.extend_from_slice(&word.to_le_bytes());
        }
    }

    /// Decode one record from exactly `record_size()` bytes.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Record {
        debug_assert_eq!(bytes.len(), self.record_size());

        let word = |i: usize| {
            let mut raw = [0u8; WORD_SIZE];
            raw.copy_from_slice(&bytes[Self::word_range(i)]);
            u64::from_le_bytes(raw)
        };
        let bit = |start: usize, i: usize| {
            (word(start + i / BITS_PER_WORD) >> (i % BITS_PER_WORD)) & 1 == 1
        };

        let null_start = self.null_start();
        let column_start = self.column_start();

        Record {
            indirection: Rid(word(INDIRECTION_COLUMN)),
            rid: Rid(word(RID_COLUMN)),
            timestamp: (!bit(null_start, 0)).then(|| word(TIMESTAMP_COLUMN)),
            schema_encoding: (0..self.num_columns)
                .map(|c| bit(SCHEMA_ENCODING_COLUMN, c))
                .collect(),
            columns: (0..self.num_columns)
                .map(|c| (!bit(null_start, c + 1)).then(|| word(column_start + c) as i64))
                .collect(),
        }
    }
}

fn set_bit(words: &mut [u64], i: usize) {
    words[i / BITS_PER_WORD] |= 1u64 << (i % BITS_PER_WORD);
}
