//! Top-level dictionary-ordinal terms query.
//!
//! The query terms are resolved once against the field's global ordinal
//! space (see [`GlobalOrdinalView`]). The resulting ordinal bitset is shared
//! read-only by every segment matcher, each of which walks the global
//! ordinals of its own documents.

use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lexical::doc_values::SortedSetDocValues;
use crate::lexical::global_ords::{GlobalOrdinalIter, GlobalOrdinalView};
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::{Matcher, NO_MORE_DOCS};
use crate::query::ordinal_resolver::ResolvedOrdinals;
use crate::query::query::{Query, Weight};
use crate::query::two_phase::{TwoPhaseIterator, TwoPhaseMatcher};
use crate::util::bytes::SortedTermSet;

/// Default cost of confirming one document.
pub const DEFAULT_MATCH_COST: f32 = 3.0;

/// Caching hints passed through to the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCacheHints {
    /// Whether results may be cached.
    pub cache: bool,
    /// Whether results should be cached separately from the main query.
    pub cache_separately: bool,
    /// Relative execution cost.
    pub cost: i32,
}

impl Default for QueryCacheHints {
    fn default() -> Self {
        QueryCacheHints {
            cache: true,
            cache_separately: false,
            cost: 0,
        }
    }
}

/// Dictionary-ordinal terms query evaluated over global ordinals.
#[derive(Debug, Clone)]
pub struct TopLevelDocValuesTermsQuery {
    field: String,
    terms: SortedTermSet,
    hints: QueryCacheHints,
    match_cost: f32,
}

impl TopLevelDocValuesTermsQuery {
    pub fn new<F: Into<String>>(field: F, terms: SortedTermSet) -> Self {
        TopLevelDocValuesTermsQuery {
            field: field.into(),
            terms,
            hints: QueryCacheHints::default(),
            match_cost: DEFAULT_MATCH_COST,
        }
    }

    pub fn with_match_cost(mut self, match_cost: f32) -> Self {
        self.match_cost = match_cost;
        self
    }

    pub fn with_hints(mut self, hints: QueryCacheHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn terms(&self) -> &SortedTermSet {
        &self.terms
    }

    pub fn hints(&self) -> QueryCacheHints {
        self.hints
    }

    pub fn set_cache(&mut self, cache: bool) {
        self.hints.cache = cache;
    }

    pub fn cache(&self) -> bool {
        self.hints.cache
    }

    pub fn set_cache_separately(&mut self, cache_separately: bool) {
        self.hints.cache_separately = cache_separately;
    }

    pub fn cache_separately(&self) -> bool {
        self.hints.cache_separately
    }

    pub fn set_cost(&mut self, cost: i32) {
        self.hints.cost = cost;
    }

    pub fn cost(&self) -> i32 {
        self.hints.cost
    }

    pub fn match_cost(&self) -> f32 {
        self.match_cost
    }

    /// Open the field's global ordinal view and resolve the terms against it.
    pub fn resolve(&self, reader: &IndexReader) -> Result<TopLevelWeight> {
        let view = GlobalOrdinalView::open(reader, &self.field)?;
        let resolved = ResolvedOrdinals::resolve(&view, &self.terms)?;

        debug!(
            "Top-level terms query on '{}': {} terms, {} of {} global ordinals matched",
            self.field,
            self.terms.len(),
            resolved.matched_count(),
            resolved.value_count()
        );

        Ok(TopLevelWeight {
            view: Arc::new(view),
            resolved: Arc::new(resolved),
            match_cost: self.match_cost,
            hints: self.hints,
        })
    }
}

impl Query for TopLevelDocValuesTermsQuery {
    fn create_weight(&self, reader: &IndexReader) -> Result<Box<dyn Weight>> {
        Ok(Box::new(self.resolve(reader)?))
    }

    fn description(&self) -> String {
        let terms: Vec<String> = self.terms.iter().map(|t| t.to_utf8_lossy()).collect();
        format!("TopLevelDocValuesTermsQuery({}:{})", self.field, terms.join(" "))
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

/// Resolved top-level terms query, shared by all segment workers.
#[derive(Debug)]
pub struct TopLevelWeight {
    view: Arc<GlobalOrdinalView>,
    resolved: Arc<ResolvedOrdinals>,
    match_cost: f32,
    hints: QueryCacheHints,
}

impl TopLevelWeight {
    pub fn view(&self) -> &GlobalOrdinalView {
        &self.view
    }

    pub fn resolved(&self) -> &ResolvedOrdinals {
        &self.resolved
    }

    pub fn cache_separately(&self) -> bool {
        self.hints.cache_separately
    }

    pub fn cost(&self) -> i32 {
        self.hints.cost
    }
}

impl Weight for TopLevelWeight {
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        if !self.resolved.matches_at_least_one_term() {
            return Ok(None);
        }

        trace!(
            "Top-level terms matcher for segment {} over [{}, {})",
            leaf.ord,
            leaf.doc_base,
            leaf.next_doc_base()
        );

        let approximation =
            PerSegmentView::new(self.view.iterator(), leaf.doc_base, leaf.next_doc_base());
        Ok(Some(Box::new(TwoPhaseMatcher::new(GlobalOrdinalsTwoPhase {
            approximation,
            resolved: Arc::clone(&self.resolved),
            match_cost: self.match_cost,
        }))))
    }

    fn is_cacheable(&self) -> bool {
        self.hints.cache
    }
}

/// A global ordinal iterator clamped to one segment's doc id window
/// `[doc_base, next_doc_base)`. Doc ids stay in global numbering.
#[derive(Debug)]
pub struct PerSegmentView {
    values: GlobalOrdinalIter,
    doc_base: u64,
    next_doc_base: u64,
    started: bool,
    exhausted: bool,
}

impl PerSegmentView {
    pub fn new(values: GlobalOrdinalIter, doc_base: u64, next_doc_base: u64) -> Self {
        PerSegmentView {
            values,
            doc_base,
            next_doc_base,
            started: false,
            exhausted: false,
        }
    }

    fn clamp(&mut self, found: bool) -> bool {
        if found && self.values.doc_id() < self.next_doc_base {
            return true;
        }
        self.exhausted = true;
        false
    }
}

impl Matcher for PerSegmentView {
    fn doc_id(&self) -> u64 {
        if self.exhausted { NO_MORE_DOCS } else { self.values.doc_id() }
    }

    fn next(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let found = if self.started {
            self.values.next()?
        } else {
            self.started = true;
            self.values.skip_to(self.doc_base)?
        };
        Ok(self.clamp(found))
    }

    fn skip_to(&mut self, target: u64) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        self.started = true;
        let found = self.values.skip_to(target.max(self.doc_base))?;
        Ok(self.clamp(found))
    }

    fn cost(&self) -> u64 {
        self.values.cost()
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl SortedSetDocValues for PerSegmentView {
    fn next_ord(&mut self) -> Result<Option<u64>> {
        if self.exhausted {
            return Ok(None);
        }
        self.values.next_ord()
    }
}

#[derive(Debug)]
struct GlobalOrdinalsTwoPhase {
    approximation: PerSegmentView,
    resolved: Arc<ResolvedOrdinals>,
    match_cost: f32,
}

impl TwoPhaseIterator for GlobalOrdinalsTwoPhase {
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
        self.match_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::doc_values_terms::DocValuesTermsQuery;
    use crate::testing::{fruit_reader, matching_docs};
    use crate::util::bytes::BytesRef;

    fn terms(values: &[&str]) -> SortedTermSet {
        values.iter().map(|v| BytesRef::from(*v)).collect()
    }

    #[test]
    fn test_matches_per_segment_strategy() {
        let reader = fruit_reader();
        let cases: [&[&str]; 4] = [
            &["banana", "date"],
            &["apple"],
            &["cherry", "elderberry", "fig"],
            &["date", "date"],
        ];
        for query_terms in cases {
            let top_level = TopLevelDocValuesTermsQuery::new("fruit", terms(query_terms));
            let per_segment = DocValuesTermsQuery::new("fruit", terms(query_terms));
            assert_eq!(
                matching_docs(&top_level, &reader),
                matching_docs(&per_segment, &reader),
                "{query_terms:?}"
            );
        }

        let query = TopLevelDocValuesTermsQuery::new("fruit", terms(&["banana", "date"]));
        assert_eq!(matching_docs(&query, &reader), vec![1, 3, 4]);
    }

    #[test]
    fn test_segment_windows() {
        let reader = fruit_reader();
        let query = TopLevelDocValuesTermsQuery::new("fruit", terms(&["cherry"]));
        let weight = query.resolve(&reader).unwrap();
        let leaves = reader.leaves();

        let mut first = weight.matcher(&leaves[0]).unwrap().unwrap();
        assert!(first.next().unwrap());
        assert_eq!(first.doc_id(), 0);
        // doc 4 holds cherry but belongs to the next segment
        assert!(!first.next().unwrap());

        let mut second = weight.matcher(&leaves[1]).unwrap().unwrap();
        assert!(second.next().unwrap());
        assert_eq!(second.doc_id(), 4);
        assert!(!second.next().unwrap());

        assert_eq!(weight.view().iterators_created(), 2);
    }

    #[test]
    fn test_no_match_skips_iterators() {
        let reader = fruit_reader();
        let query = TopLevelDocValuesTermsQuery::new("fruit", terms(&["fig", "grape"]));
        let weight = query.resolve(&reader).unwrap();

        assert!(!weight.resolved().matches_at_least_one_term());
        for leaf in reader.leaves() {
            assert!(weight.matcher(&leaf).unwrap().is_none());
        }
        assert_eq!(weight.view().iterators_created(), 0);
    }

    #[test]
    fn test_hints() {
        let mut query = TopLevelDocValuesTermsQuery::new("fruit", terms(&["a"]));
        assert!(query.cache());
        assert!(!query.cache_separately());
        assert_eq!(query.cost(), 0);
        assert_eq!(query.match_cost(), DEFAULT_MATCH_COST);

        query.set_cache(false);
        query.set_cache_separately(true);
        query.set_cost(150);
        let weight = query.resolve(&fruit_reader()).unwrap();
        assert!(!weight.is_cacheable());
        assert!(weight.cache_separately());
        assert_eq!(weight.cost(), 150);
    }

    #[test]
    fn test_per_segment_view_skip_to() {
        let reader = fruit_reader();
        let view = GlobalOrdinalView::open(&reader, "fruit").unwrap();
        let mut window = PerSegmentView::new(view.iterator(), 3, NO_MORE_DOCS);

        assert!(window.skip_to(0).unwrap());
        assert_eq!(window.doc_id(), 3);
        assert!(window.skip_to(5).unwrap());
        assert_eq!(window.doc_id(), 5);
        assert!(!window.next().unwrap());
        assert_eq!(window.doc_id(), NO_MORE_DOCS);
    }
}
