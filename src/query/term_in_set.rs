//! Exact term-set membership query.

use bit_vec::BitVec;

use crate::error::Result;
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::{BitSetMatcher, Matcher};
use crate::query::query::{Query, Weight};
use crate::util::bytes::SortedTermSet;

/// Matches documents holding any of a set of indexed terms.
///
/// Each segment looks every term up in its term dictionary and unions the
/// postings into a bitset.
#[derive(Debug, Clone)]
pub struct TermInSetQuery {
    field: String,
    terms: SortedTermSet,
}

impl TermInSetQuery {
    pub fn new<F: Into<String>>(field: F, terms: SortedTermSet) -> Self {
        TermInSetQuery {
            field: field.into(),
            terms,
        }
    }

    pub fn terms(&self) -> &SortedTermSet {
        &self.terms
    }
}

impl Query for TermInSetQuery {
    fn create_weight(&self, _reader: &IndexReader) -> Result<Box<dyn Weight>> {
        Ok(Box::new(TermInSetWeight {
            query: self.clone(),
        }))
    }

    fn description(&self) -> String {
        let terms: Vec<String> = self.terms.iter().map(|t| t.to_utf8_lossy()).collect();
        format!("{}:({})", self.field, terms.join(" "))
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
struct TermInSetWeight {
    query: TermInSetQuery,
}

impl Weight for TermInSetWeight {
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        let Some(dictionary) = leaf.segment.term_dictionary(&self.query.field) else {
            return Ok(None);
        };

        let mut docs = BitVec::from_elem(leaf.max_doc() as usize, false);
        let mut any = false;
        for term in &self.query.terms {
            if let Some(postings) = dictionary.get(term.as_bytes()) {
                for doc in postings.iter() {
                    docs.set(*doc as usize, true);
                    any = true;
                }
            }
        }

        if !any {
            return Ok(None);
        }
        Ok(Some(Box::new(BitSetMatcher::new(docs, leaf.doc_base))))
    }
}
