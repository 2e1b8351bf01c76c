//! Term dictionary backed by an FST.
//!
//! The FST maps each indexed term to an index into a parallel postings
//! array. Postings are sorted, deduplicated segment-local doc ids.

use std::collections::BTreeMap;
use std::sync::Arc;

use fst::{Automaton, IntoStreamer, Map, MapBuilder, Streamer};

use crate::error::Result;
use crate::util::bytes::BytesRef;

/// Immutable term dictionary for one field of one segment.
#[derive(Debug)]
pub struct TermDictionary {
    /// FST mapping term -> index into `postings`.
    fst: Map<Vec<u8>>,
    postings: Vec<Arc<[u64]>>,
}

impl TermDictionary {
    /// Build a dictionary from term -> doc ids.
    pub fn build(terms: BTreeMap<BytesRef, Vec<u64>>) -> Result<Self> {
        let mut builder = MapBuilder::memory();
        let mut postings = Vec::with_capacity(terms.len());

        for (idx, (term, mut docs)) in terms.into_iter().enumerate() {
            builder.insert(term.as_bytes(), idx as u64)?;
            docs.sort_unstable();
            docs.dedup();
            postings.push(Arc::from(docs));
        }

        let fst = Map::new(builder.into_inner()?)?;
        Ok(TermDictionary { fst, postings })
    }

    /// Postings of a term.
    pub fn get(&self, term: &[u8]) -> Option<Arc<[u64]>> {
        self.fst
            .get(term)
            .and_then(|idx| self.postings.get(idx as usize))
            .cloned()
    }

    /// Check if a term exists.
    pub fn contains(&self, term: &[u8]) -> bool {
        self.fst.contains_key(term)
    }

    /// Number of documents containing a term.
    pub fn doc_freq(&self, term: &[u8]) -> u64 {
        self.get(term).map_or(0, |docs| docs.len() as u64)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Postings of every term accepted by `automaton`, in term order.
    pub fn search<A: Automaton>(&self, automaton: A) -> Vec<Arc<[u64]>> {
        let mut results = Vec::new();
        let mut stream = self.fst.search(automaton).into_stream();
        while let Some((_, idx)) = stream.next() {
            if let Some(docs) = self.postings.get(idx as usize) {
                results.push(Arc::clone(docs));
            }
        }
        results
    }

    /// All terms in order.
    pub fn terms(&self) -> Vec<BytesRef> {
        let mut results = Vec::with_capacity(self.len());
        let mut stream = self.fst.stream();
        while let Some((key, _)) = stream.next() {
            results.push(BytesRef::from(key));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fst::automaton::Str;

    fn dictionary() -> TermDictionary {
        let mut terms = BTreeMap::new();
        terms.insert(BytesRef::from("banana"), vec![3, 1, 1]);
        terms.insert(BytesRef::from("apple"), vec![0, 2]);
        terms.insert(BytesRef::from("cherry"), vec![2]);
        TermDictionary::build(terms).unwrap()
    }

    #[test]
    fn test_get_returns_sorted_postings() {
        let dict = dictionary();

        assert_eq!(dict.len(), 3);
        assert_eq!(&*dict.get(b"banana").unwrap(), &[1, 3]);
        assert_eq!(dict.doc_freq(b"apple"), 2);
        assert!(dict.get(b"date").is_none());
        assert!(!dict.contains(b"date"));
    }

    #[test]
    fn test_search_with_automaton() {
        let dict = dictionary();

        let hits = dict.search(Str::new("cherry"));
        assert_eq!(hits.len(), 1);
        assert_eq!(&*hits[0], &[2]);

        let hits = dict.search(Str::new("ch").starts_with());
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_terms_in_order() {
        let dict = dictionary();
        let terms: Vec<String> = dict.terms().iter().map(|t| t.to_utf8_lossy()).collect();
        assert_eq!(terms, vec!["apple", "banana", "cherry"]);
    }
}
