//! Point/range lookup requests.
//!
//! A [`Lookup`] is chosen by the caller: a single key resolves through
//! [`OrderedIndex::get`], a bounded range through
//! [`OrderedIndex::range_query`]. Requests can be built from Rust range
//! syntax or parsed from text such as `"5"`, `"3..11"` or `"3:11"`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::str::FromStr;

use crate::common::{Error, Result};

use super::OrderedIndex;

/// Shape of a lookup against an [`OrderedIndex`].
///
/// # Example
/// ```
/// use tailstore::{Error, Lookup, LookupResult, OrderedIndex};
///
/// let mut index = OrderedIndex::with_defaults("idx");
/// index.assign(1, "a");
/// index.assign(2, "b");
///
/// assert_eq!(index.lookup(1).unwrap(), LookupResult::Value(b"a"));
/// assert_eq!(index.lookup(0..2).unwrap().len(), 1);
/// assert_eq!(index.lookup(1..).unwrap_err(), Error::MissingBound);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A single key.
    Point(i64),
    /// Keys in `[start, stop)`. Both bounds are required at dispatch.
    Range {
        start: Option<i64>,
        stop: Option<i64>,
    },
}

impl Lookup {
    /// A range request with both bounds.
    pub fn range(start: i64, stop: i64) -> Self {
        Lookup::Range {
            start: Some(start),
            stop: Some(stop),
        }
    }
}

impl From<i64> for Lookup {
    fn from(key: i64) -> Self {
        Lookup::Point(key)
    }
}

impl From<Range<i64>> for Lookup {
    fn from(r: Range<i64>) -> Self {
        Lookup::range(r.start, r.end)
    }
}

impl From<RangeFrom<i64>> for Lookup {
    fn from(r: RangeFrom<i64>) -> Self {
        Lookup::Range {
            start: Some(r.start),
            stop: None,
        }
    }
}

impl From<RangeTo<i64>> for Lookup {
    fn from(r: RangeTo<i64>) -> Self {
        Lookup::Range {
            start: None,
            stop: Some(r.end),
        }
    }
}

impl From<RangeFull> for Lookup {
    fn from(_: RangeFull) -> Self {
        Lookup::Range {
            start: None,
            stop: None,
        }
    }
}

impl FromStr for Lookup {
    type Err = Error;

    /// Accepts `"<key>"`, `"<start>..<stop>"` or `"<start>:<stop>"`.
    /// Either bound may be left empty, which parses but fails at dispatch
    /// with `MissingBound`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRequestShape(s.to_string());
        let bound = |part: &str| -> Result<Option<i64>> {
            let part = part.trim();
            if part.is_empty() {
                Ok(None)
            } else {
                part.parse().map(Some).map_err(|_| invalid())
            }
        };

        let trimmed = s.trim();
        let split = trimmed
            .split_once("..")
            .or_else(|| trimmed.split_once(':'));

        match split {
            Some((start, stop)) => Ok(Lookup::Range {
                start: bound(start)?,
                stop: bound(stop)?,
            }),
            None => bound(trimmed)?.map(Lookup::Point).ok_or_else(invalid),
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Point(key) => write!(f, "{}", key),
            Lookup::Range { start, stop } => {
                if let Some(start) = start {
                    write!(f, "{}", start)?;
                }
                write!(f, "..")?;
                if let Some(stop) = stop {
                    write!(f, "{}", stop)?;
                }
                Ok(())
            }
        }
    }
}

/// Answer to a [`Lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult<'a> {
    Value(&'a [u8]),
    Entries(BTreeMap<i64, &'a [u8]>),
}

impl<'a> LookupResult<'a> {
    /// Number of entries in the answer (1 for a point hit).
    pub fn len(&self) -> usize {
        match self {
            LookupResult::Value(_) => 1,
            LookupResult::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The point value, if this answers a point lookup.
    pub fn value(&self) -> Option<&'a [u8]> {
        match self {
            LookupResult::Value(v) => Some(*v),
            LookupResult::Entries(_) => None,
        }
    }

    /// The range entries, if this answers a range lookup.
    pub fn into_entries(self) -> Option<BTreeMap<i64, &'a [u8]>> {
        match self {
            LookupResult::Value(_) => None,
            LookupResult::Entries(entries) => Some(entries),
        }
    }
}

impl OrderedIndex {
    /// Resolve a point or range request.
    ///
    /// # Errors
    /// - `Error::KeyNotFound` for a point lookup on an absent key.
    /// - `Error::MissingBound` for a range without both bounds.
    pub fn lookup(&self, request: impl Into<Lookup>) -> Result<LookupResult<'_>> {
        match request.into() {
            Lookup::Point(key) => self.get(key).map(LookupResult::Value),
            Lookup::Range {
                start: Some(start),
                stop: Some(stop),
            } => Ok(LookupResult::Entries(self.range_query(start, stop))),
            Lookup::Range { .. } => Err(Error::MissingBound),
        }
    }

    /// Assignment-style request; always an [`insert`](Self::insert).
    pub fn assign(&mut self, key: i64, value: impl Into<Vec<u8>>) {
        self.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderedIndex {
        let mut index = OrderedIndex::with_defaults("idx");
        for key in [1, 3, 5, 7] {
            index.assign(key, key.to_string());
        }
        index
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Lookup::from(4), Lookup::Point(4));
        assert_eq!(Lookup::from(2..9), Lookup::range(2, 9));
        assert_eq!(
            Lookup::from(2..),
            Lookup::Range {
                start: Some(2),
                stop: None
            }
        );
        assert_eq!(
            Lookup::from(..9),
            Lookup::Range {
                start: None,
                stop: Some(9)
            }
        );
        assert_eq!(
            Lookup::from(..),
            Lookup::Range {
                start: None,
                stop: None
            }
        );
    }

    #[test]
    fn test_parse_point_and_range() {
        assert_eq!("42".parse::<Lookup>().unwrap(), Lookup::Point(42));
        assert_eq!(" -3 ".parse::<Lookup>().unwrap(), Lookup::Point(-3));
        assert_eq!("3..11".parse::<Lookup>().unwrap(), Lookup::range(3, 11));
        assert_eq!("3:11".parse::<Lookup>().unwrap(), Lookup::range(3, 11));
        assert_eq!("-5:-1".parse::<Lookup>().unwrap(), Lookup::range(-5, -1));
        assert_eq!(
            "3:".parse::<Lookup>().unwrap(),
            Lookup::Range {
                start: Some(3),
                stop: None
            }
        );
    }

    #[test]
    fn test_parse_invalid_shape() {
        for input in ["", "abc", "1.5", "1..x", "a:b"] {
            assert_eq!(
                input.parse::<Lookup>().unwrap_err(),
                Error::InvalidRequestShape(input.to_string()),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_display_parses_back() {
        for request in [Lookup::Point(-7), Lookup::range(1, 4), Lookup::from(..4)] {
            assert_eq!(request.to_string().parse::<Lookup>().unwrap(), request);
        }
    }

    #[test]
    fn test_lookup_point() {
        let index = sample();
        assert_eq!(index.lookup(3).unwrap(), LookupResult::Value(b"3"));
        assert_eq!(index.lookup(4).unwrap_err(), Error::KeyNotFound(4));
    }

    #[test]
    fn test_lookup_range() {
        let index = sample();
        let entries = index.lookup(3..7).unwrap().into_entries().unwrap();
        assert_eq!(entries.keys().copied().collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn test_lookup_missing_bound() {
        let index = sample();
        assert_eq!(index.lookup(3..).unwrap_err(), Error::MissingBound);
        assert_eq!(index.lookup(..3).unwrap_err(), Error::MissingBound);
        assert_eq!(index.lookup(..).unwrap_err(), Error::MissingBound);
    }

    #[test]
    fn test_lookup_parsed_request() {
        let index = sample();
        let request: Lookup = "1:6".parse().unwrap();
        let result = index.lookup(request).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.value(), None);
    }

    #[test]
    fn test_assign_replaces() {
        let mut index = sample();
        index.assign(3, "three");
        assert_eq!(index.lookup(3).unwrap().value(), Some(&b"three"[..]));
        assert_eq!(index.size(), 4);
    }
}
