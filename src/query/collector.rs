//! Collector implementations for gathering matching documents.

use std::fmt::Debug;

use crate::error::Result;

/// Trait for collecting matching documents.
pub trait Collector: Send + Debug {
    /// Collect a matching document (whole-index doc id).
    fn collect(&mut self, doc_id: u64) -> Result<()>;

    /// Get the total number of hits collected.
    fn total_hits(&self) -> u64;

    /// Check if this collector needs more results.
    fn needs_more(&self) -> bool;

    /// Reset the collector for a new search.
    fn reset(&mut self);
}

/// Collects doc ids in the order they are reported, up to an optional limit.
#[derive(Debug, Default)]
pub struct DocIdCollector {
    limit: Option<usize>,
    doc_ids: Vec<u64>,
}

impl DocIdCollector {
    /// Collect every matching document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `limit` documents.
    pub fn with_limit(limit: usize) -> Self {
        DocIdCollector {
            limit: Some(limit),
            doc_ids: Vec::new(),
        }
    }

    pub fn doc_ids(&self) -> &[u64] {
        &self.doc_ids
    }

    pub fn into_doc_ids(self) -> Vec<u64> {
        self.doc_ids
    }
}

impl Collector for DocIdCollector {
    fn collect(&mut self, doc_id: u64) -> Result<()> {
        if self.needs_more() {
            self.doc_ids.push(doc_id);
        }
        Ok(())
    }

    fn total_hits(&self) -> u64 {
        self.doc_ids.len() as u64
    }

    fn needs_more(&self) -> bool {
        self.limit.is_none_or(|limit| self.doc_ids.len() < limit)
    }

    fn reset(&mut self) {
        self.doc_ids.clear();
    }
}

/// A collector that only counts matching documents.
#[derive(Debug, Default)]
pub struct CountCollector {
    count: u64,
}

impl CountCollector {
    /// Create a new count collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the count of matching documents.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Collector for CountCollector {
    fn collect(&mut self, _doc_id: u64) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn total_hits(&self) -> u64 {
        self.count
    }

    fn needs_more(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_collector() {
        let mut collector = DocIdCollector::new();
        for doc in [1, 4, 9] {
            collector.collect(doc).unwrap();
        }
        assert!(collector.needs_more());
        assert_eq!(collector.total_hits(), 3);
        assert_eq!(collector.doc_ids(), &[1, 4, 9]);

        collector.reset();
        assert_eq!(collector.total_hits(), 0);
    }

    #[test]
    fn test_doc_id_collector_limit() {
        let mut collector = DocIdCollector::with_limit(2);
        for doc in [1, 4, 9] {
            collector.collect(doc).unwrap();
        }
        assert!(!collector.needs_more());
        assert_eq!(collector.into_doc_ids(), vec![1, 4]);
    }

    #[test]
    fn test_count_collector() {
        let mut collector = CountCollector::new();
        collector.collect(3).unwrap();
        collector.collect(7).unwrap();
        assert_eq!(collector.count(), 2);
        assert!(collector.needs_more());
        collector.reset();
        assert_eq!(collector.count(), 0);
    }
}
