//! Term query implementation for exact term matching.

use crate::error::Result;
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::{Matcher, PostingMatcher};
use crate::query::query::{Query, Weight};
use crate::util::bytes::BytesRef;

/// A query that matches documents containing a specific indexed term.
#[derive(Debug, Clone)]
pub struct TermQuery {
    /// The field to search in.
    field: String,
    /// The encoded term to search for.
    term: BytesRef,
}

impl TermQuery {
    /// Create a new term query.
    ///
    /// The term must already be encoded with the field's value encoder.
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<BytesRef>,
    {
        TermQuery {
            field: field.into(),
            term: term.into(),
        }
    }

    /// Get the term.
    pub fn term(&self) -> &BytesRef {
        &self.term
    }
}

impl Query for TermQuery {
    fn create_weight(&self, _reader: &IndexReader) -> Result<Box<dyn Weight>> {
        Ok(Box::new(TermWeight {
            query: self.clone(),
        }))
    }

    fn description(&self) -> String {
        format!("{}:{}", self.field, self.term.to_utf8_lossy())
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
struct TermWeight {
    query: TermQuery,
}

impl Weight for TermWeight {
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        let postings = leaf
            .segment
            .term_dictionary(&self.query.field)
            .and_then(|dict| dict.get(self.query.term.as_bytes()));

        Ok(postings.map(|docs| Box::new(PostingMatcher::new(docs, leaf.doc_base)) as Box<dyn Matcher>))
    }
}
