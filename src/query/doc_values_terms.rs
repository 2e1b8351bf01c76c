//! Per-segment dictionary-ordinal terms query.
//!
//! Every segment resolves the query terms against its own sorted-set
//! dictionary, then confirms candidate documents by testing their local
//! ordinals.

use std::sync::Arc;

use log::trace;

use crate::error::Result;
use crate::lexical::doc_values::{SortedSetColumnIter, SortedSetDocValues};
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::{Matcher, NO_MORE_DOCS};
use crate::query::ordinal_resolver::ResolvedOrdinals;
use crate::query::query::{Query, Weight};
use crate::query::two_phase::{TwoPhaseIterator, TwoPhaseMatcher};
use crate::util::bytes::SortedTermSet;

const MATCH_COST: f32 = 3.0;

/// Matches documents whose sorted-set doc values hold any of the terms.
#[derive(Debug, Clone)]
pub struct DocValuesTermsQuery {
    field: String,
    terms: SortedTermSet,
}

impl DocValuesTermsQuery {
    pub fn new<F: Into<String>>(field: F, terms: SortedTermSet) -> Self {
        DocValuesTermsQuery {
            field: field.into(),
            terms,
        }
    }

    pub fn terms(&self) -> &SortedTermSet {
        &self.terms
    }
}

impl Query for DocValuesTermsQuery {
    fn create_weight(&self, _reader: &IndexReader) -> Result<Box<dyn Weight>> {
        Ok(Box::new(DocValuesTermsWeight {
            query: self.clone(),
        }))
    }

    fn description(&self) -> String {
        let terms: Vec<String> = self.terms.iter().map(|t| t.to_utf8_lossy()).collect();
        format!("DocValuesTermsQuery({}:{})", self.field, terms.join(" "))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}

#[derive(Debug)]
struct DocValuesTermsWeight {
    query: DocValuesTermsQuery,
}

impl Weight for DocValuesTermsWeight {
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        if !leaf.segment.has_doc_values(&self.query.field) {
            return Ok(None);
        }

        let column = leaf.segment.sorted_set(&self.query.field);
        let resolved = ResolvedOrdinals::resolve(&*column, &self.query.terms)?;
        if !resolved.matches_at_least_one_term() {
            return Ok(None);
        }

        trace!(
            "Per-segment terms matcher for '{}' in segment {} ({} ordinals)",
            self.query.field,
            leaf.ord,
            resolved.matched_count()
        );

        Ok(Some(Box::new(TwoPhaseMatcher::new(SegmentOrdinalsTwoPhase {
            approximation: SegmentDocValues::new(column.iter(), leaf.doc_base),
            resolved: Arc::new(resolved),
        }))))
    }
}

/// Segment doc values reporting global doc ids.
#[derive(Debug)]
struct SegmentDocValues {
    values: SortedSetColumnIter,
    doc_base: u64,
}

impl SegmentDocValues {
    fn new(values: SortedSetColumnIter, doc_base: u64) -> Self {
        SegmentDocValues { values, doc_base }
    }
}

impl Matcher for SegmentDocValues {
    fn doc_id(&self) -> u64 {
        match self.values.doc_id() {
            NO_MORE_DOCS => NO_MORE_DOCS,
            local => self.doc_base + local,
        }
    }

    fn next(&mut self) -> Result<bool> {
        self.values.next()
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        self.values.skip_to(target.saturating_sub(self.doc_base))
    }

    fn cost(&self) -> u64 {
        self.values.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.values.is_exhausted()
    }
}

impl SortedSetDocValues for SegmentDocValues {
    fn next_ord(&mut self) -> Result<Option<u64>> {
        self.values.next_ord()
    }
}

#[derive(Debug)]
struct SegmentOrdinalsTwoPhase {
    approximation: SegmentDocValues,
    resolved: Arc<ResolvedOrdinals>,
}

impl TwoPhaseIterator for SegmentOrdinalsTwoPhase {
    fn approximation(&mut self) -> &mut dyn Matcher {
        &mut self.approximation
    }

    fn matches(&mut self) -> Result<bool> {
        while let Some(ord) = self.approximation.next_ord()? {
            if self.resolved.contains(ord) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn match_cost(&self) -> f32 {
        MATCH_COST
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fruit_reader, matching_docs};
    use crate::util::bytes::BytesRef;

    fn terms(values: &[&str]) -> SortedTermSet {
        values.iter().map(|v| BytesRef::from(*v)).collect()
    }

    #[test]
    fn test_per_segment_terms() {
        let reader = fruit_reader();

        let query = DocValuesTermsQuery::new("fruit", terms(&["date", "banana"]));
        assert_eq!(matching_docs(&query, &reader), vec![1, 3, 4]);

        let query = DocValuesTermsQuery::new("fruit", terms(&["apple"]));
        assert_eq!(matching_docs(&query, &reader), vec![0]);

        let query = DocValuesTermsQuery::new("fruit", terms(&["fig"]));
        assert!(matching_docs(&query, &reader).is_empty());
    }

    #[test]
    fn test_field_without_doc_values() {
        let reader = fruit_reader();
        let query = DocValuesTermsQuery::new("missing", terms(&["x"]));
        assert!(matching_docs(&query, &reader).is_empty());
    }

    #[test]
    fn test_skip_to_translates_doc_base() {
        let reader = fruit_reader();
        let query = DocValuesTermsQuery::new("fruit", terms(&["cherry", "elderberry"]));
        let weight = query.create_weight(&reader).unwrap();
        let leaves = reader.leaves();

        let mut matcher = weight.matcher(&leaves[1]).unwrap().unwrap();
        assert!(matcher.skip_to(3).unwrap());
        assert_eq!(matcher.doc_id(), 4);
        assert!(matcher.next().unwrap());
        assert_eq!(matcher.doc_id(), 5);
        assert!(!matcher.next().unwrap());
    }
}
