//! Query matching no documents.

use crate::error::Result;
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::Matcher;
use crate::query::query::{Query, Weight};

/// Matches nothing; carries the reason for diagnostics.
#[derive(Debug, Clone)]
pub struct MatchNoDocsQuery {
    reason: String,
}

impl MatchNoDocsQuery {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        MatchNoDocsQuery {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Query for MatchNoDocsQuery {
    fn create_weight(&self, _reader: &IndexReader) -> Result<Box<dyn Weight>> {
        Ok(Box::new(MatchNoDocsWeight))
    }

    fn description(&self) -> String {
        format!("MatchNoDocsQuery(\"{}\")", self.reason)
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(Debug)]
struct MatchNoDocsWeight;

impl Weight for MatchNoDocsWeight {
    fn matcher(&self, _leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>> {
        Ok(None)
    }
}
