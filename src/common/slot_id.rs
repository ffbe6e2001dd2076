//! Slot identifier type.

use std::fmt;

/// Zero-based position of a record within a page.
///
/// Slots are handed out in write order and never move, so a `SlotId`
/// stays valid for the lifetime of the page that returned it.
///
/// # Example
/// ```
/// use tailstore::SlotId;
///
/// let slot = SlotId::new(5);
/// assert_eq!(slot.index(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

impl SlotId {
    /// Create a new SlotId.
    #[inline]
    pub fn new(id: usize) -> Self {
        SlotId(id)
    }

    /// The slot position as a plain index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for SlotId {
    fn from(id: usize) -> Self {
        SlotId(id)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}
