//! Base query and weight traits.

use std::any::Any;
use std::fmt::Debug;

use crate::error::Result;
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::matcher::Matcher;

/// Trait for search queries.
pub trait Query: Send + Sync + Debug {
    /// Resolve this query against a reader.
    ///
    /// All request-level work (term lookups shared by every segment,
    /// validation) happens here, before any segment is scored.
    fn create_weight(&self, reader: &IndexReader) -> Result<Box<dyn Weight>>;

    /// Get a human-readable description of this query.
    fn description(&self) -> String;

    /// Clone this query.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get the field name this query searches in, if applicable.
    fn field(&self) -> Option<&str> {
        None
    }
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A query resolved against one reader.
///
/// Weights are shared by all segment workers and must not change once built.
pub trait Weight: Send + Sync + Debug {
    /// Create a matcher for one segment; `None` if it cannot match anything.
    fn matcher(&self, leaf: &LeafContext<'_>) -> Result<Option<Box<dyn Matcher>>>;

    /// Whether results of this weight may be cached.
    fn is_cacheable(&self) -> bool {
        true
    }
}
