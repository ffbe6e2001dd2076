//! OrderedIndex - a sorted key → value container.
//!
//! The index keeps its entries in one contiguous, sorted `Vec`. Lookups
//! binary-search it; inserting a key in the middle shifts every larger
//! entry. That O(n) insert is the accepted cost of the flat layout, and
//! callers that load in key order should use [`OrderedIndex::batch_insert`],
//! which appends without searching.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::common::config::{DEFAULT_CACHE_SIZE, DEFAULT_ORDER};
use crate::common::{Error, Result};

/// An index shared between threads behind one exclusive lock.
///
/// The index does no locking of its own; this is the lock the owning store
/// holds around it.
pub type SharedIndex = Arc<RwLock<OrderedIndex>>;

/// Construction parameters for an [`OrderedIndex`].
///
/// Both fields are reserved for a future balanced-tree variant (node
/// fan-out and node cache size). They are stored and reported back but no
/// operation reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Node fan-out.
    pub order: usize,
    /// Number of nodes to keep cached.
    pub cache_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

/// One key → value pair held by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: i64,
    pub value: Vec<u8>,
}

impl IndexEntry {
    pub fn new(key: i64, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl<V: Into<Vec<u8>>> From<(i64, V)> for IndexEntry {
    fn from((key, value): (i64, V)) -> Self {
        Self::new(key, value)
    }
}

/// Sorted map from `i64` keys to opaque encoded values.
///
/// # Invariants
/// - `entries` is strictly ascending by key (no duplicates).
/// - A successful insert replaces one value or adds exactly one entry.
///
/// # Example
/// ```
/// use tailstore::OrderedIndex;
///
/// let mut index = OrderedIndex::with_defaults("index_0.idx");
/// index.insert(5, "a");
/// index.insert(3, "b");
/// index.insert(5, "c");
///
/// assert_eq!(index.size(), 2);
/// assert_eq!(index.get(5).unwrap(), b"c");
/// ```
#[derive(Debug, Clone)]
pub struct OrderedIndex {
    /// Backing file name. Reserved for a durable variant; never opened.
    path: PathBuf,

    config: IndexConfig,

    entries: Vec<IndexEntry>,
}

impl OrderedIndex {
    /// Create an empty index.
    ///
    /// `path` is recorded but no file is created or read.
    pub fn new(path: impl AsRef<Path>, config: IndexConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            entries: Vec::new(),
        }
    }

    /// Create an empty index with `order = 75` and `cache_size = 10000`.
    pub fn with_defaults(path: impl AsRef<Path>) -> Self {
        Self::new(path, IndexConfig::default())
    }

    /// Wrap the index for shared use behind a single lock.
    pub fn into_shared(self) -> SharedIndex {
        Arc::new(RwLock::new(self))
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> IndexConfig {
        self.config
    }

    pub fn order(&self) -> usize {
        self.config.order
    }

    pub fn cache_size(&self) -> usize {
        self.config.cache_size
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert `value` under `key`, replacing any existing value.
    ///
    /// Never fails. Entries with larger keys shift one position right.
    pub fn insert(&mut self, key: i64, value: impl Into<Vec<u8>>) {
        let value = value.into();
        match self.search(key) {
            Ok(pos) => self.entries[pos].value = value,
            Err(pos) => self.entries.insert(pos, IndexEntry { key, value }),
        }
    }

    /// Append a batch of entries that the caller has already sorted.
    ///
    /// When both the index and `pairs` are non-empty, the first key of
    /// `pairs` must be strictly greater than [`max_key`](Self::max_key).
    /// Only that boundary is checked: an internally unsorted batch is
    /// appended as given and breaks the sort order. Use
    /// [`batch_insert_strict`](Self::batch_insert_strict) to reject those.
    ///
    /// # Errors
    /// - `Error::OrderingViolation` if the boundary check fails. The index is
    ///   left unchanged.
    pub fn batch_insert<I, E>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
        E: Into<IndexEntry>,
    {
        let batch: Vec<IndexEntry> = pairs.into_iter().map(Into::into).collect();
        self.check_boundary(&batch)?;
        self.append(batch);
        Ok(())
    }

    /// Stricter variant of [`batch_insert`](Self::batch_insert) that also
    /// validates the batch is strictly ascending.
    ///
    /// # Errors
    /// - `Error::OrderingViolation` if the boundary check fails.
    /// - `Error::UnsortedBatch` naming the first key that does not exceed its
    ///   predecessor.
    ///
    /// The index is left unchanged on either error.
    pub fn batch_insert_strict<I, E>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
        E: Into<IndexEntry>,
    {
        let batch: Vec<IndexEntry> = pairs.into_iter().map(Into::into).collect();
        self.check_boundary(&batch)?;

        if let Some(position) = batch.windows(2).position(|w| w[0].key >= w[1].key) {
            let err = Error::UnsortedBatch {
                position: position + 1,
                previous: batch[position].key,
                key: batch[position + 1].key,
            };
            warn!(error = %err, "rejected batch insert");
            return Err(err);
        }

        self.append(batch);
        Ok(())
    }

    fn check_boundary(&self, batch: &[IndexEntry]) -> Result<()> {
        if let (Some(max), Some(first)) = (self.max_key(), batch.first()) {
            if first.key <= max {
                warn!(first = first.key, max, "rejected batch insert below current maximum");
                return Err(Error::OrderingViolation {
                    first: first.key,
                    max,
                });
            }
        }
        Ok(())
    }

    fn append(&mut self, batch: Vec<IndexEntry>) {
        debug!(
            path = %self.path.display(),
            count = batch.len(),
            size = self.entries.len(),
            "batch insert"
        );
        self.entries.extend(batch);
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Value stored under `key`.
    ///
    /// # Errors
    /// - `Error::KeyNotFound` if `key` is absent.
    pub fn get(&self, key: i64) -> Result<&[u8]> {
        self.search(key)
            .map(|pos| self.entries[pos].value.as_slice())
            .map_err(|_| Error::KeyNotFound(key))
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: i64) -> bool {
        self.search(key).is_ok()
    }

    /// Every entry with `start <= key < stop`, in key order.
    ///
    /// Returns an empty map when nothing falls in the range, including when
    /// `start >= stop`.
    pub fn range_query(&self, start: i64, stop: i64) -> BTreeMap<i64, &[u8]> {
        let from = self.entries.partition_point(|e| e.key < start);
        self.entries[from..]
            .iter()
            .take_while(|e| e.key < stop)
            .map(|e| (e.key, e.value.as_slice()))
            .collect()
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn min_key(&self) -> Option<i64> {
        self.entries.first().map(|e| e.key)
    }

    pub fn max_key(&self) -> Option<i64> {
        self.entries.last().map(|e| e.key)
    }

    /// All entries in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, IndexEntry> {
        self.entries.iter()
    }

    /// Binary search for `key`: `Ok(pos)` if present, otherwise `Err(pos)`
    /// with the insertion point.
    fn search(&self, key: i64) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by_key(&key, |e| e.key)
    }
}

impl<'a> IntoIterator for &'a OrderedIndex {
    type Item = &'a IndexEntry;
    type IntoIter = std::slice::Iter<'a, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(index: &OrderedIndex) -> Vec<i64> {
        index.iter().map(|e| e.key).collect()
    }

    #[test]
    fn test_new_index_is_empty() {
        let index = OrderedIndex::with_defaults("idx");
        assert_eq!(index.size(), 0);
        assert!(index.is_empty());
        assert_eq!(index.min_key(), None);
        assert_eq!(index.max_key(), None);
    }

    #[test]
    fn test_config_is_stored() {
        let config = IndexConfig {
            order: 16,
            cache_size: 128,
        };
        let index = OrderedIndex::new("index_3.txt", config);
        assert_eq!(index.order(), 16);
        assert_eq!(index.cache_size(), 128);
        assert_eq!(index.config(), config);
        assert_eq!(index.path(), Path::new("index_3.txt"));
    }

    #[test]
    fn test_default_config() {
        let index = OrderedIndex::with_defaults("idx");
        assert_eq!(index.order(), 75);
        assert_eq!(index.cache_size(), 10_000);
    }

    #[test]
    fn test_insert_keeps_keys_sorted() {
        let mut index = OrderedIndex::with_defaults("idx");
        for key in [7, -2, 4, 10, 0] {
            index.insert(key, key.to_string());
        }
        assert_eq!(keys(&index), vec![-2, 0, 4, 7, 10]);
        assert_eq!(index.min_key(), Some(-2));
        assert_eq!(index.max_key(), Some(10));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(1, "old");
        index.insert(1, "new");
        assert_eq!(index.size(), 1);
        assert_eq!(index.get(1).unwrap(), b"new");
    }

    #[test]
    fn test_get_missing_key() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(1, "a");
        assert_eq!(index.get(2), Err(Error::KeyNotFound(2)));
        assert!(index.contains_key(1));
        assert!(!index.contains_key(2));
    }

    #[test]
    fn test_batch_insert_into_empty() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.batch_insert([(1, "a"), (2, "b"), (3, "c")]).unwrap();
        assert_eq!(keys(&index), vec![1, 2, 3]);
    }

    #[test]
    fn test_batch_insert_empty_batch_always_succeeds() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(100, "x");
        index.batch_insert(Vec::<(i64, &str)>::new()).unwrap();
        assert_eq!(index.size(), 1);
    }

    #[test]
    fn test_batch_insert_rejects_equal_to_max() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(5, "a");
        let err = index.batch_insert([(5, "b")]).unwrap_err();
        assert_eq!(err, Error::OrderingViolation { first: 5, max: 5 });
        assert_eq!(index.get(5).unwrap(), b"a");
    }

    #[test]
    fn test_batch_insert_does_not_check_internal_order() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(1, "a");
        index.batch_insert([(10, "x"), (3, "y")]).unwrap();
        // Appended as given.
        assert_eq!(keys(&index), vec![1, 10, 3]);
    }

    #[test]
    fn test_batch_insert_strict_rejects_unsorted() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(1, "a");
        let err = index
            .batch_insert_strict([(10, "x"), (12, "y"), (12, "z")])
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnsortedBatch {
                position: 2,
                previous: 12,
                key: 12
            }
        );
        assert_eq!(keys(&index), vec![1]);
    }

    #[test]
    fn test_batch_insert_strict_checks_boundary_first() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(10, "a");
        let err = index.batch_insert_strict([(3, "x"), (1, "y")]).unwrap_err();
        assert_eq!(err, Error::OrderingViolation { first: 3, max: 10 });
    }

    #[test]
    fn test_range_query_half_open() {
        let mut index = OrderedIndex::with_defaults("idx");
        for key in 0..10 {
            index.insert(key, vec![key as u8]);
        }
        let result = index.range_query(3, 6);
        assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(result[&4], &[4u8][..]);
    }

    #[test]
    fn test_range_query_empty_ranges() {
        let mut index = OrderedIndex::with_defaults("idx");
        index.insert(1, "a");
        index.insert(2, "b");
        assert!(index.range_query(2, 2).is_empty());
        assert!(index.range_query(5, 1).is_empty());
        assert!(index.range_query(10, 20).is_empty());
    }

    #[test]
    fn test_shared_index() {
        let shared = OrderedIndex::with_defaults("idx").into_shared();
        shared.write().insert(1, "a");
        assert_eq!(shared.read().get(1).unwrap(), b"a");
    }
}
