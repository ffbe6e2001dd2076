//! Ordered index over integer keys.
//!
//! # Components
//! - [`OrderedIndex`] - Sorted key → value container with point and range access
//! - [`Lookup`] / [`LookupResult`] - Point-or-range request facade
//! - [`IndexConfig`] - Construction parameters (reserved for a balanced-tree variant)

mod lookup;
mod ordered_index;

pub use lookup::{Lookup, LookupResult};
pub use ordered_index::{IndexConfig, IndexEntry, OrderedIndex, SharedIndex};
