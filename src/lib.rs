//! tailstore - storage primitives for a column-oriented record store.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Record store (external caller)                  │
//! │        tables, queries, transactions, tail-record updates       │
//! ├────────────────────────────────┬────────────────────────────────┤
//! │  Index Layer (index/)          │  Storage Layer (storage/)      │
//! │  ┌──────────────────────────┐  │  ┌──────────────────────────┐  │
//! │  │ OrderedIndex             │  │  │ Page                     │  │
//! │  │  key → encoded value     │  │  │  fixed-width records     │  │
//! │  │  point / range / batch   │  │  │  append / overwrite rid  │  │
//! │  └──────────────────────────┘  │  └──────────────────────────┘  │
//! └────────────────────────────────┴────────────────────────────────┘
//! ```
//!
//! The two layers are independent. A store resolves keys to locations
//! through the index and keeps tuples in pages; a logical update writes a
//! tail record and redirects an earlier record's `rid` to it.
//!
//! # Modules
//! - [`common`] - Shared primitives (Rid, SlotId, Error, config)
//! - [`index`] - Ordered index and point/range lookups
//! - [`storage`] - Record pages
//!
//! # Quick Start
//! ```
//! use tailstore::{OrderedIndex, Page, Record, RecordLayout, Rid, SlotId};
//!
//! let mut page = Page::new(RecordLayout::new(2));
//! let slot = page.write(&Record::base(Rid(0), 0, vec![7, 8])).unwrap().unwrap();
//!
//! let mut index = OrderedIndex::with_defaults("index_0.idx");
//! index.insert(7, slot.index().to_le_bytes().to_vec());
//! assert_eq!(index.get(7).unwrap(), &0usize.to_le_bytes()[..]);
//! ```

pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_RECORD_CAPACITY;
pub use common::{Error, Result, Rid, SlotId};

pub use index::{IndexConfig, IndexEntry, Lookup, LookupResult, OrderedIndex, SharedIndex};
pub use storage::page::{Page, PageHeader, PageType, Record, RecordLayout, SharedPage};
