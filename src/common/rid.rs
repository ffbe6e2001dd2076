//! Record identifier type.

use std::fmt;

/// Identifies a record within the owning store.
///
/// The store uses rids for version indirection: a base record's
/// indirection field names the rid of its latest tail record, and a tail
/// record's rid is rewritten in place when it is superseded.
///
/// # Example
/// ```
/// use tailstore::Rid;
///
/// let rid = Rid(42);
/// assert!(rid.is_valid());
/// assert!(!Rid::NONE.is_valid());
/// assert_eq!(rid.0, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rid(pub u64);

impl Rid {
    /// Sentinel meaning "no record".
    ///
    /// Used for an indirection pointer that has never been redirected.
    pub const NONE: Rid = Rid(u64::MAX);

    /// Check if this rid names a record (is not the sentinel value).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Raw word as stored in a page.
    #[inline]
    pub(crate) fn to_word(self) -> u64 {
        self.0
    }
}

impl Default for Rid {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Rid({})", self.0)
        } else {
            write!(f, "Rid(NONE)")
        }
    }
}
