//! Point set query for point-typed fields.

use crate::error::Result;
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::{BitSetMatcher, Matcher};
use crate::query::query::{Query, Weight};

/// Matches documents holding any of a set of long point values.
#[derive(Debug, Clone)]
pub struct PointInSetQuery {
    field: String,
    values: Vec<i64>,
}

impl PointInSetQuery {
    pub fn new<F: Into<String>>(field: F, mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        values.dedup();
        PointInSetQuery {
            field: field.into(),
            values,
        }
    }

    /// Sorted, deduplicated values.
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl Query for PointInSetQuery {
    fn create_weight(&self, _reader: &IndexReader) -> Result<Box<dyn Weight>> {
        Ok(Box::new(PointInSetWeight {
            query: self.clone(),
        }))
    }

    fn description(&self) -> String {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        format!("{}:{{{}}}", self.field, values.join(" "))
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
struct PointInSetWeight {
    query: PointInSetQuery,
}

impl Weight for PointInSetWeight {
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        let Some(points) = leaf.segment.points(&self.query.field) else {
            return Ok(None);
        };
        let docs = points.matching_docs(&self.query.values, leaf.max_doc());
        if docs.none() {
            return Ok(None);
        }
        Ok(Some(Box::new(BitSetMatcher::new(docs, leaf.doc_base))))
    }
}
