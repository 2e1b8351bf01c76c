//! Boolean query implementation for disjunctions of sub-queries.

use crate::error::Result;
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::{DisjunctionMatcher, Matcher};
use crate::query::query::{Query, Weight};

/// A constant-score boolean query whose clauses all SHOULD match: a
/// document matches if any clause matches it.
#[derive(Debug, Default)]
pub struct BooleanQuery {
    clauses: Vec<Box<dyn Query>>,
}

impl Clone for BooleanQuery {
    fn clone(&self) -> Self {
        BooleanQuery {
            clauses: self.clauses.iter().map(|q| q.clone_box()).collect(),
        }
    }
}

impl BooleanQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a SHOULD clause.
    pub fn add_should(&mut self, query: Box<dyn Query>) {
        self.clauses.push(query);
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[Box<dyn Query>] {
        &self.clauses
    }

    /// Check if this query is empty.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Query for BooleanQuery {
    fn create_weight(&self, reader: &IndexReader) -> Result<Box<dyn Weight>> {
        let weights = self
            .clauses
            .iter()
            .map(|clause| clause.create_weight(reader))
            .collect::<Result<Vec<_>>>()?;
        Ok(Box::new(BooleanWeight { weights }))
    }

    fn description(&self) -> String {
        let clauses: Vec<String> = self.clauses.iter().map(|c| c.description()).collect();
        format!("({})", clauses.join(" OR "))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(Debug)]
struct BooleanWeight {
    weights: Vec<Box<dyn Weight>>,
}

impl Weight for BooleanWeight {
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        let mut matchers = Vec::with_capacity(self.weights.len());
        for weight in &self.weights {
            if let Some(matcher) = weight.matcher(leaf)? {
                matchers.push(matcher);
            }
        }

        Ok(match matchers.len() {
            0 => None,
            1 => matchers.pop(),
            _ => Some(Box::new(DisjunctionMatcher::new(matchers))),
        })
    }

    fn is_cacheable(&self) -> bool {
        self.weights.iter().all(|w| w.is_cacheable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::term::TermQuery;
    use crate::testing::{fruit_reader, matching_docs};

    fn query(terms: &[&str]) -> BooleanQuery {
        let mut query = BooleanQuery::new();
        for term in terms {
            query.add_should(Box::new(TermQuery::new("fruit", *term)));
        }
        query
    }

    #[test]
    fn test_disjunction_across_segments() {
        let reader = fruit_reader();
        assert_eq!(matching_docs(&query(&["banana", "date"]), &reader), vec![1, 3, 4]);
        assert_eq!(matching_docs(&query(&["cherry", "apple"]), &reader), vec![0, 4]);
    }

    #[test]
    fn test_empty_boolean_query() {
        let reader = fruit_reader();
        let empty = BooleanQuery::new();
        assert!(empty.is_empty());
        assert!(matching_docs(&empty, &reader).is_empty());
    }

    #[test]
    fn test_description() {
        let query = query(&["a", "b"]);
        assert_eq!(query.clauses().len(), 2);
        assert_eq!(query.description(), "(fruit:a OR fruit:b)");
    }
}
