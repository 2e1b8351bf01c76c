//! Binary keys and sorted key sets.
//!
//! Every indexed value is reduced to a [`BytesRef`] by the field's value
//! encoder. Keys compare by unsigned lexicographic byte order, which is the
//! order of every term dictionary and doc-values dictionary in the index.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable byte sequence ordered lexicographically.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BytesRef(Vec<u8>);

impl BytesRef {
    /// Create a new key from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        BytesRef(bytes.into())
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the key for humans, replacing invalid UTF-8.
    pub fn to_utf8_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl fmt::Debug for BytesRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "BytesRef({s:?})"),
            Err(_) => write!(f, "BytesRef({:02x?})", self.0),
        }
    }
}

impl From<&str> for BytesRef {
    fn from(value: &str) -> Self {
        BytesRef(value.as_bytes().to_vec())
    }
}

impl From<String> for BytesRef {
    fn from(value: String) -> Self {
        BytesRef(value.into_bytes())
    }
}

impl From<Vec<u8>> for BytesRef {
    fn from(value: Vec<u8>) -> Self {
        BytesRef(value)
    }
}

impl From<&[u8]> for BytesRef {
    fn from(value: &[u8]) -> Self {
        BytesRef(value.to_vec())
    }
}

impl AsRef<[u8]> for BytesRef {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for BytesRef {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

/// A sorted, deduplicated set of query keys.
///
/// Built once when a query is constructed so that every consumer (term
/// dictionary seeks, automaton construction, ordinal resolution) visits the
/// keys in dictionary order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SortedTermSet {
    terms: Vec<BytesRef>,
}

impl SortedTermSet {
    /// Build a set from keys in arbitrary order, possibly with duplicates.
    pub fn new(mut terms: Vec<BytesRef>) -> Self {
        terms.sort();
        terms.dedup();
        SortedTermSet { terms }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate keys in ascending byte order.
    pub fn iter(&self) -> std::slice::Iter<'_, BytesRef> {
        self.terms.iter()
    }

    /// Keys as a sorted slice.
    pub fn as_slice(&self) -> &[BytesRef] {
        &self.terms
    }
}

impl fmt::Debug for SortedTermSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.terms.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a SortedTermSet {
    type Item = &'a BytesRef;
    type IntoIter = std::slice::Iter<'a, BytesRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl FromIterator<BytesRef> for SortedTermSet {
    fn from_iter<I: IntoIterator<Item = BytesRef>>(iter: I) -> Self {
        SortedTermSet::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_ordering_is_unsigned_lexicographic() {
        let a = BytesRef::from("apple");
        let b = BytesRef::from("banana");
        let high = BytesRef::new(vec![0xff]);
        let prefix = BytesRef::from("app");

        assert!(a < b);
        assert!(prefix < a);
        assert!(b < high);
        assert!(BytesRef::default() < prefix);
    }

    #[test]
    fn test_sorted_term_set_sorts_and_dedups() {
        let set: SortedTermSet = ["date", "banana", "date", "apple"]
            .into_iter()
            .map(BytesRef::from)
            .collect();

        let terms: Vec<String> = set.iter().map(|t| t.to_utf8_lossy()).collect();
        assert_eq!(terms, vec!["apple", "banana", "date"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_debug_renders_utf8_and_raw_bytes() {
        assert_eq!(format!("{:?}", BytesRef::from("a")), "BytesRef(\"a\")");
        assert_eq!(format!("{:?}", BytesRef::new(vec![0xff])), "BytesRef([ff])");
    }
}
