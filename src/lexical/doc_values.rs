//! Sorted-set doc values.
//!
//! A sorted-set column stores, for one field of one segment, a sorted and
//! deduplicated dictionary of binary values plus, per document, the sorted
//! list of ordinals (dictionary positions) the document holds. This is the
//! columnar layout used by the dictionary-ordinal terms strategies.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{DocTermsError, Result};
use crate::query::matcher::{Matcher, NO_MORE_DOCS};
use crate::util::bytes::BytesRef;

/// Outcome of a dictionary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermLookup {
    /// The key exists at this ordinal.
    Found(u64),
    /// The key is absent; it would be inserted at this ordinal.
    NotFound { insertion_point: u64 },
}

impl TermLookup {
    /// The ordinal if the key was found.
    pub fn ordinal(&self) -> Option<u64> {
        match self {
            TermLookup::Found(ord) => Some(*ord),
            TermLookup::NotFound { .. } => None,
        }
    }
}

/// A sorted, deduplicated dictionary of binary values addressable by ordinal.
pub trait OrdinalDictionary: Send + Sync {
    /// Number of distinct values.
    fn value_count(&self) -> u64;

    /// The value at `ord`.
    fn lookup_ord(&self, ord: u64) -> Result<&[u8]>;

    /// Binary search for `key` restricted to ordinals `[start_ord, value_count)`.
    ///
    /// Callers probing keys in ascending order may pass the ordinal of the
    /// previous hit, or the previous insertion point, as `start_ord`.
    fn lookup_term_from(&self, key: &[u8], start_ord: u64) -> Result<TermLookup> {
        let mut low = start_ord;
        let mut high = self.value_count();

        while low < high {
            let mid = low + (high - low) / 2;
            match self.lookup_ord(mid)?.cmp(key) {
                std::cmp::Ordering::Less => low = mid + 1,
                std::cmp::Ordering::Greater => high = mid,
                std::cmp::Ordering::Equal => return Ok(TermLookup::Found(mid)),
            }
        }

        Ok(TermLookup::NotFound {
            insertion_point: low,
        })
    }

    /// Binary search for `key` over the whole dictionary.
    fn lookup_term(&self, key: &[u8]) -> Result<TermLookup> {
        self.lookup_term_from(key, 0)
    }
}

impl<T: OrdinalDictionary + ?Sized> OrdinalDictionary for Arc<T> {
    fn value_count(&self) -> u64 {
        (**self).value_count()
    }

    fn lookup_ord(&self, ord: u64) -> Result<&[u8]> {
        (**self).lookup_ord(ord)
    }
}

/// Per-document access to sorted-set ordinals.
///
/// The matcher part walks documents that have at least one value; for the
/// current document `next_ord` yields its ordinals in ascending order.
pub trait SortedSetDocValues: Matcher {
    /// Next ordinal of the current document, `None` once its values are consumed.
    fn next_ord(&mut self) -> Result<Option<u64>>;
}

/// Immutable sorted-set column for one field of one segment.
#[derive(Debug, Clone)]
pub struct SortedSetColumn {
    /// Sorted, deduplicated values.
    dictionary: Vec<BytesRef>,
    /// `ords[doc_starts[d]..doc_starts[d + 1]]` are the ordinals of doc `d`.
    doc_starts: Vec<usize>,
    /// Concatenated per-document ordinals.
    ords: Vec<u64>,
    /// Number of documents holding at least one value.
    docs_with_values: u64,
}

impl SortedSetColumn {
    /// A column with no values for `max_doc` documents.
    pub fn empty(max_doc: u64) -> Self {
        SortedSetColumn {
            dictionary: Vec::new(),
            doc_starts: vec![0; max_doc as usize + 1],
            ords: Vec::new(),
            docs_with_values: 0,
        }
    }

    /// Number of documents covered by this column.
    pub fn max_doc(&self) -> u64 {
        (self.doc_starts.len() - 1) as u64
    }

    /// Number of documents holding at least one value.
    pub fn docs_with_values(&self) -> u64 {
        self.docs_with_values
    }

    /// The ordinals of a document, ascending.
    pub fn doc_ords(&self, doc: u64) -> &[u64] {
        let doc = doc as usize;
        if doc + 1 >= self.doc_starts.len() {
            return &[];
        }
        &self.ords[self.doc_starts[doc]..self.doc_starts[doc + 1]]
    }

    /// Iterate over the dictionary in ordinal order.
    pub fn values(&self) -> impl Iterator<Item = &BytesRef> {
        self.dictionary.iter()
    }

    /// Create a fresh per-document iterator.
    pub fn iter(self: &Arc<Self>) -> SortedSetColumnIter {
        SortedSetColumnIter::new(Arc::clone(self))
    }
}

impl OrdinalDictionary for SortedSetColumn {
    fn value_count(&self) -> u64 {
        self.dictionary.len() as u64
    }

    fn lookup_ord(&self, ord: u64) -> Result<&[u8]> {
        self.dictionary
            .get(ord as usize)
            .map(|value| value.as_bytes())
            .ok_or_else(|| {
                DocTermsError::index(format!(
                    "Ordinal {ord} out of range (value count {})",
                    self.dictionary.len()
                ))
            })
    }
}

/// Collects values per document and freezes them into a [`SortedSetColumn`].
#[derive(Debug, Default)]
pub struct SortedSetColumnBuilder {
    per_doc: Vec<Vec<BytesRef>>,
}

impl SortedSetColumnBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value for a document.
    pub fn add_value(&mut self, doc: u64, value: BytesRef) {
        let doc = doc as usize;
        if doc >= self.per_doc.len() {
            self.per_doc.resize_with(doc + 1, Vec::new);
        }
        self.per_doc[doc].push(value);
    }

    /// Build the column for a segment of `max_doc` documents.
    pub fn build(self, max_doc: u64) -> SortedSetColumn {
        let mut dictionary: Vec<BytesRef> = self.per_doc.iter().flatten().cloned().collect();
        dictionary.sort();
        dictionary.dedup();

        let mut doc_starts = Vec::with_capacity(max_doc as usize + 1);
        let mut ords = Vec::new();
        let mut docs_with_values = 0;
        doc_starts.push(0);

        for doc in 0..max_doc as usize {
            if let Some(values) = self.per_doc.get(doc) {
                let mut doc_ords: Vec<u64> = values
                    .iter()
                    .filter_map(|value| dictionary.binary_search(value).ok())
                    .map(|ord| ord as u64)
                    .collect();
                doc_ords.sort_unstable();
                doc_ords.dedup();
                if !doc_ords.is_empty() {
                    docs_with_values += 1;
                }
                ords.extend(doc_ords);
            }
            doc_starts.push(ords.len());
        }

        SortedSetColumn {
            dictionary,
            doc_starts,
            ords,
            docs_with_values,
        }
    }
}

/// Forward-only iterator over the documents and ordinals of one column.
///
/// Doc ids are local to the segment.
#[derive(Debug)]
pub struct SortedSetColumnIter {
    column: Arc<SortedSetColumn>,
    doc: u64,
    started: bool,
    exhausted: bool,
    ord_pos: usize,
    ord_end: usize,
}

impl SortedSetColumnIter {
    /// Create an iterator positioned before the first document.
    pub fn new(column: Arc<SortedSetColumn>) -> Self {
        SortedSetColumnIter {
            column,
            doc: 0,
            started: false,
            exhausted: false,
            ord_pos: 0,
            ord_end: 0,
        }
    }

    /// Position on the first document `>= target` holding a value.
    fn seek(&mut self, target: u64) -> bool {
        self.started = true;
        let max_doc = self.column.max_doc();
        let mut doc = target;
        while doc < max_doc {
            let start = self.column.doc_starts[doc as usize];
            let end = self.column.doc_starts[doc as usize + 1];
            if start < end {
                self.doc = doc;
                self.ord_pos = start;
                self.ord_end = end;
                return true;
            }
            doc += 1;
        }

        self.exhausted = true;
        self.doc = NO_MORE_DOCS;
        self.ord_pos = 0;
        self.ord_end = 0;
        false
    }
}

impl Matcher for SortedSetColumnIter {
    fn doc_id(&self) -> u64 {
        if self.exhausted { NO_MORE_DOCS } else { self.doc }
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let target = if self.started { self.doc + 1 } else { 0 };
        Ok(self.seek(target))
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        if self.started && self.doc >= target {
            return Ok(true);
        }
        Ok(self.seek(target))
    }

    fn cost(&self) -> u64 {
        self.column.docs_with_values()
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl SortedSetDocValues for SortedSetColumnIter {
    fn next_ord(&mut self) -> Result<Option<u64>> {
        if !self.started || self.exhausted || self.ord_pos >= self.ord_end {
            return Ok(None);
        }
        let ord = self.column.ords[self.ord_pos];
        self.ord_pos += 1;
        Ok(Some(ord))
    }
}
