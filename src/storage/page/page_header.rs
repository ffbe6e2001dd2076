//! Page image header and type definitions.
//!
//! A serialized page starts with a [`PageHeader`] containing metadata:
//! - [`PageType`] discriminator
//! - CRC32 checksum for integrity
//! - Record layout and occupancy

use crate::common::{Error, Result};

/// Type of page image.
///
/// Uses `#[repr(u8)]` to guarantee a 1-byte representation for serialization.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// Uninitialized or corrupted page.
    #[default]
    Invalid = 0,
    /// Page of fixed-width records.
    Records = 1,
}

impl PageType {
    /// Convert from u8, returning Invalid for unknown values.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => PageType::Records,
            _ => PageType::Invalid,
        }
    }
}

/// Metadata stored at the beginning of every page image.
///
/// # Layout (15 bytes)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       1     page_type (PageType as u8)
/// 1       4     checksum (CRC32, little-endian)
/// 5       2     num_columns (little-endian)
/// 7       4     num_records (little-endian)
/// 11      4     capacity (little-endian)
/// ```
///
/// # Checksum
/// The checksum is computed over the entire image with the checksum field
/// itself set to zero. This allows verification without special handling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Type of this page.
    pub page_type: PageType,
    /// CRC32 checksum of the image.
    pub checksum: u32,
    /// User columns per record.
    pub num_columns: u16,
    /// Records written.
    pub num_records: u32,
    /// Maximum records the page accepts.
    pub capacity: u32,
}

impl PageHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 15;

    /// Offset of the checksum within the header.
    pub const OFFSET_CHECKSUM: usize = 1;

    const OFFSET_PAGE_TYPE: usize = 0;
    const OFFSET_NUM_COLUMNS: usize = 5;
    const OFFSET_NUM_RECORDS: usize = 7;
    const OFFSET_CAPACITY: usize = 11;

    /// Read a header from the beginning of a byte slice.
    ///
    /// # Errors
    /// - `Error::Corrupted` if `data` is shorter than [`PageHeader::SIZE`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::Corrupted(format!(
                "image is {} bytes, header needs {}",
                data.len(),
                Self::SIZE
            )));
        }

        let u16_at = |at: usize| u16::from_le_bytes([data[at], data[at + 1]]);
        let u32_at =
            |at: usize| u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);

        Ok(Self {
            page_type: PageType::from_u8(data[Self::OFFSET_PAGE_TYPE]),
            checksum: u32_at(Self::OFFSET_CHECKSUM),
            num_columns: u16_at(Self::OFFSET_NUM_COLUMNS),
            num_records: u32_at(Self::OFFSET_NUM_RECORDS),
            capacity: u32_at(Self::OFFSET_CAPACITY),
        })
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < PageHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for PageHeader");

        data[Self::OFFSET_PAGE_TYPE] = self.page_type as u8;
        data[Self::OFFSET_CHECKSUM..Self::OFFSET_CHECKSUM + 4]
            .copy_from_slice(&self.checksum.to_le_bytes());
        data[Self::OFFSET_NUM_COLUMNS..Self::OFFSET_NUM_COLUMNS + 2]
            .copy_from_slice(&self.num_columns.to_le_bytes());
        data[Self::OFFSET_NUM_RECORDS..Self::OFFSET_NUM_RECORDS + 4]
            .copy_from_slice(&self.num_records.to_le_bytes());
        data[Self::OFFSET_CAPACITY..Self::OFFSET_CAPACITY + 4]
            .copy_from_slice(&self.capacity.to_le_bytes());
    }

    /// Compute CRC32 checksum of a page image.
    ///
    /// The checksum is computed with the checksum field (bytes 1-4) zeroed out,
    /// so the checksum doesn't include itself.
    pub fn compute_checksum(image: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();

        // Hash bytes before checksum field (just byte 0: page_type)
        hasher.update(&image[..Self::OFFSET_CHECKSUM]);

        // Skip checksum field by feeding zeros instead
        hasher.update(&[0u8; 4]);

        hasher.update(&image[Self::OFFSET_CHECKSUM + 4..]);

        hasher.finalize()
    }

    /// Verify that the stored checksum matches the computed checksum.
    ///
    /// # Errors
    /// - `Error::ChecksumMismatch` with both values on mismatch.
    pub fn verify_checksum(&self, image: &[u8]) -> Result<()> {
        let computed = Self::compute_checksum(image);
        if self.checksum == computed {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch {
                stored: self.checksum,
                computed,
            })
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
