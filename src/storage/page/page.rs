//! Page - a fixed-capacity array of fixed-width records.
//!
//! A [`Page`] stores records back to back in one byte buffer. Slots are
//! assigned in write order and never move. After a record is written only
//! its `rid` word may change, through [`Page::overwrite_rid`].

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::common::config::PAGE_RECORD_CAPACITY;
use crate::common::{Error, Result, Rid, SlotId};

use super::page_header::{PageHeader, PageType};
use super::record::{Record, RecordLayout};

/// A page shared between threads behind one exclusive lock.
pub type SharedPage = Arc<RwLock<Page>>;

/// A page of fixed-width records.
///
/// # Memory Layout
/// ```text
/// data: [ record 0 | record 1 | ... | record len-1 ]
///         ^ each record is layout.record_size() bytes
/// ```
///
/// # Example
/// ```
/// use tailstore::{Page, Record, RecordLayout, Rid, SlotId};
///
/// let mut page = Page::with_capacity(RecordLayout::new(2), 2);
/// let slot = page.write(&Record::base(Rid(1), 0, vec![10, 20])).unwrap();
/// assert_eq!(slot, Some(SlotId(0)));
///
/// page.overwrite_rid(SlotId(0), Rid(99)).unwrap();
/// assert_eq!(page.read_index(SlotId(0)).unwrap().rid, Rid(99));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    layout: RecordLayout,

    /// Maximum number of records (immutable after construction).
    capacity: usize,

    /// Number of records written.
    len: usize,

    /// Encoded records, `len * layout.record_size()` bytes.
    data: Vec<u8>,
}

impl Page {
    /// Create an empty page holding up to [`PAGE_RECORD_CAPACITY`] records.
    pub fn new(layout: RecordLayout) -> Self {
        Self::with_capacity(layout, PAGE_RECORD_CAPACITY)
    }

    /// Create an empty page holding up to `capacity` records.
    ///
    /// # Panics
    /// Panics if `capacity` does not fit the page header's `u32` field.
    pub fn with_capacity(layout: RecordLayout, capacity: usize) -> Self {
        assert!(capacity <= u32::MAX as usize, "capacity must fit in u32");
        Self {
            layout,
            capacity,
            len: 0,
            data: Vec::with_capacity(capacity * layout.record_size()),
        }
    }

    /// Wrap the page for shared use behind a single lock.
    pub fn into_shared(self) -> SharedPage {
        Arc::new(RwLock::new(self))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records written.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether at least one more record fits.
    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.len < self.capacity
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Append `record` and return its slot.
    ///
    /// Returns `Ok(None)` and leaves the page untouched when it is full, so
    /// bulk loaders can move on to a fresh page without an error path.
    ///
    /// # Errors
    /// - `Error::SchemaMismatch` if the record's column or schema encoding
    ///   count differs from the page layout.
    pub fn write(&mut self, record: &Record) -> Result<Option<SlotId>> {
        self.check_schema(record)?;

        if !self.has_capacity() {
            trace!(capacity = self.capacity, "page full");
            return Ok(None);
        }

        self.layout.encode_into(record, &mut self.data);
        let slot = SlotId(self.len);
        self.len += 1;
        Ok(Some(slot))
    }

    /// Replace the `rid` of the record at `slot`. Other fields are untouched.
    ///
    /// # Errors
    /// - `Error::IndexOutOfRange` if `slot` has not been written.
    pub fn overwrite_rid(&mut self, slot: SlotId, rid: Rid) -> Result<()> {
        let start = self.record_offset(slot)?;
        let range = self.layout.rid_range();
        self.data[start + range.start..start + range.end]
            .copy_from_slice(&rid.to_word().to_le_bytes());
        Ok(())
    }

    fn check_schema(&self, record: &Record) -> Result<()> {
        let expected = self.layout.num_columns();
        for actual in [record.columns.len(), record.schema_encoding.len()] {
            if actual != expected {
                return Err(Error::SchemaMismatch { expected, actual });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Record stored at `slot`.
    ///
    /// # Errors
    /// - `Error::IndexOutOfRange` if `slot` has not been written.
    pub fn read_index(&self, slot: SlotId) -> Result<Record> {
        let start = self.record_offset(slot)?;
        Ok(self
            .layout
            .decode(&self.data[start..start + self.layout.record_size()]))
    }

    /// Every record in write order.
    pub fn read_all(&self) -> Vec<Record> {
        self.iter().collect()
    }

    /// Iterate over records in write order.
    pub fn iter(&self) -> impl Iterator<Item = Record> + '_ {
        let size = self.layout.record_size();
        // chunks_exact panics on 0; a record always has metadata words.
        debug_assert!(size > 0);
        self.data
            .chunks_exact(size)
            .map(move |bytes| self.layout.decode(bytes))
    }

    fn record_offset(&self, slot: SlotId) -> Result<usize> {
        if slot.index() >= self.len {
            return Err(Error::IndexOutOfRange {
                index: slot.index(),
                len: self.len,
            });
        }
        Ok(slot.index() * self.layout.record_size())
    }

    // ========================================================================
    // Page image
    // ========================================================================

    /// Encode the page as a checksummed image: a [`PageHeader`] followed by
    /// the record bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut image = vec![0u8; PageHeader::SIZE];
        image.extend_from_slice(&self.data);

        let header = PageHeader {
            page_type: PageType::Records,
            checksum: 0,
            num_columns: self.layout.num_columns() as u16,
            num_records: self.len as u32,
            capacity: self.capacity as u32,
        };
        header.write_to(&mut image);

        let checksum = PageHeader::compute_checksum(&image);
        image[PageHeader::OFFSET_CHECKSUM..PageHeader::OFFSET_CHECKSUM + 4]
            .copy_from_slice(&checksum.to_le_bytes());
        image
    }

    /// Rebuild a page from an image produced by [`Page::serialize`].
    ///
    /// # Errors
    /// - `Error::Corrupted` if the image is truncated, has trailing bytes,
    ///   or its header is inconsistent.
    /// - `Error::ChecksumMismatch` if the contents do not match the checksum.
    pub fn deserialize(image: &[u8]) -> Result<Self> {
        let header = PageHeader::from_bytes(image)?;

        if let Err(err) = header.verify_checksum(image) {
            warn!(error = %err, "rejected page image");
            return Err(err);
        }
        if header.page_type != PageType::Records {
            return Err(Error::Corrupted(format!(
                "unexpected page type {:?}",
                header.page_type
            )));
        }

        let layout = RecordLayout::new(header.num_columns as usize);
        let len = header.num_records as usize;
        let capacity = header.capacity as usize;
        if len > capacity {
            return Err(Error::Corrupted(format!(
                "{} records exceed capacity {}",
                len, capacity
            )));
        }

        let body = &image[PageHeader::SIZE..];
        let expected = len * layout.record_size();
        if body.len() != expected {
            return Err(Error::Corrupted(format!(
                "record area is {} bytes, expected {}",
                body.len(),
                expected
            )));
        }

        debug!(records = len, capacity, columns = layout.num_columns(), "decoded page image");

        // Sized to the records present; the header's capacity is untrusted.
        Ok(Self {
            layout,
            capacity,
            len,
            data: body.to_vec(),
        })
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("num_columns", &self.layout.num_columns())
            .field("records", &self.read_all())
            .finish()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({}/{})", self.len, self.capacity)?;
        for (i, record) in self.iter().enumerate() {
            write!(f, "\n  [{}] {}", i, record)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
