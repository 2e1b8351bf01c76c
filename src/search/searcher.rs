//! Segment-parallel searcher.

use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{DocTermsError, Result};
use crate::lexical::reader::{IndexReader, LeafContext};
use crate::query::collector::{Collector, CountCollector, DocIdCollector};
use crate::query::{Query, Weight};

/// Configuration for [`IndexSearcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherConfig {
    /// Worker threads; `None` uses one per CPU.
    pub thread_pool_size: Option<usize>,

    /// Evaluate segments concurrently.
    pub parallel: bool,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        SearcherConfig {
            thread_pool_size: None,
            parallel: true,
        }
    }
}

/// Matching documents of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Whole-index doc ids in ascending order.
    pub doc_ids: Vec<u64>,
    /// Number of matches; may exceed `doc_ids.len()` when a limit applied.
    pub total_hits: u64,
}

/// Runs queries against a reader.
#[derive(Debug)]
pub struct IndexSearcher {
    reader: Arc<IndexReader>,
    config: SearcherConfig,
    thread_pool: Option<Arc<ThreadPool>>,
}

impl IndexSearcher {
    pub fn new(reader: Arc<IndexReader>, config: SearcherConfig) -> Result<Self> {
        let thread_pool = if config.parallel {
            let thread_pool_size = config.thread_pool_size.unwrap_or_else(num_cpus::get);
            if thread_pool_size == 0 {
                return Err(DocTermsError::bad_request(
                    "thread_pool_size must be greater than 0",
                ));
            }

            let pool = ThreadPoolBuilder::new()
                .num_threads(thread_pool_size)
                .thread_name(|i| format!("docterms-search-{i}"))
                .build()
                .map_err(|e| DocTermsError::internal(format!("Failed to create thread pool: {e}")))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(IndexSearcher {
            reader,
            config,
            thread_pool,
        })
    }

    /// Single-threaded searcher.
    pub fn sequential(reader: Arc<IndexReader>) -> Self {
        IndexSearcher {
            reader,
            config: SearcherConfig {
                thread_pool_size: None,
                parallel: false,
            },
            thread_pool: None,
        }
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    pub fn config(&self) -> &SearcherConfig {
        &self.config
    }

    /// Matching doc ids in ascending order, at most `limit` of them.
    ///
    /// `total_hits` always counts every match.
    pub fn search(&self, query: &dyn Query, limit: Option<usize>) -> Result<SearchResults> {
        let start = Instant::now();
        let weight = query.create_weight(&self.reader)?;

        let results = match &self.thread_pool {
            Some(pool) if self.reader.segment_count() > 1 => {
                let per_leaf = pool.install(|| {
                    self.reader
                        .leaves()
                        .into_par_iter()
                        .map(|leaf| leaf_doc_ids(weight.as_ref(), &leaf))
                        .collect::<Result<Vec<_>>>()
                })?;

                let total_hits = per_leaf.iter().map(|docs| docs.len() as u64).sum();
                let mut doc_ids: Vec<u64> = per_leaf.into_iter().flatten().collect();
                if let Some(limit) = limit {
                    doc_ids.truncate(limit);
                }
                SearchResults {
                    doc_ids,
                    total_hits,
                }
            }
            _ => {
                let mut docs = match limit {
                    Some(limit) => DocIdCollector::with_limit(limit),
                    None => DocIdCollector::new(),
                };
                let mut count = CountCollector::new();
                for leaf in self.reader.leaves() {
                    let collectors: &mut [&mut dyn Collector] = &mut [&mut docs as &mut dyn Collector, &mut count];
                    collect_leaf(weight.as_ref(), &leaf, collectors)?;
                }
                SearchResults {
                    doc_ids: docs.into_doc_ids(),
                    total_hits: count.count(),
                }
            }
        };

        debug!(
            "{} matched {} docs in {:?}",
            query.description(),
            results.total_hits,
            start.elapsed()
        );
        Ok(results)
    }

    /// Number of matching documents.
    pub fn count(&self, query: &dyn Query) -> Result<u64> {
        let mut collector = CountCollector::new();
        self.collect(query, &mut collector)?;
        Ok(collector.count())
    }

    /// Feed matches to `collector` in ascending doc id order until it needs
    /// no more.
    pub fn collect(&self, query: &dyn Query, collector: &mut dyn Collector) -> Result<()> {
        let weight = query.create_weight(&self.reader)?;
        for leaf in self.reader.leaves() {
            if !collector.needs_more() {
                break;
            }
            collect_leaf(weight.as_ref(), &leaf, &mut [&mut *collector])?;
        }
        Ok(())
    }
}

fn leaf_doc_ids(weight: &dyn Weight, leaf: &LeafContext<'_>) -> Result<Vec<u64>> {
    let mut collector = DocIdCollector::new();
    collect_leaf(weight, leaf, &mut [&mut collector as &mut dyn Collector])?;
    Ok(collector.into_doc_ids())
}

/// Drive one segment's matcher, stopping once no collector needs more.
fn collect_leaf(
    weight: &dyn Weight,
    leaf: &LeafContext<'_>,
    collectors: &mut [&mut dyn Collector],
) -> Result<()> {
    let Some(mut matcher) = weight.matcher(leaf)? else {
        return Ok(());
    };

    while collectors.iter().any(|c| c.needs_more()) && matcher.next()? {
        let doc_id = matcher.doc_id();
        for collector in collectors.iter_mut() {
            collector.collect(doc_id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::terms::{TermsParams, TermsQueryParser};
    use crate::testing::{fruit_reader, schema};

    fn query(value: &str, method: &str) -> Box<dyn Query> {
        TermsQueryParser::new(schema())
            .parse(&TermsParams::new("fruit", value).with_method(method))
            .unwrap()
    }

    fn searchers() -> Vec<IndexSearcher> {
        let reader = Arc::new(fruit_reader());
        vec![
            IndexSearcher::sequential(reader.clone()),
            IndexSearcher::new(
                reader,
                SearcherConfig {
                    thread_pool_size: Some(2),
                    parallel: true,
                },
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_search_all() {
        for searcher in searchers() {
            let results = searcher.search(query("cherry,date", "termsFilter").as_ref(), None).unwrap();
            assert_eq!(results.doc_ids, vec![0, 3, 4]);
            assert_eq!(results.total_hits, 3);
        }
    }

    #[test]
    fn test_search_limit() {
        for searcher in searchers() {
            let results = searcher
                .search(query("cherry,date", "docValuesTermsFilter").as_ref(), Some(2))
                .unwrap();
            assert_eq!(results.doc_ids, vec![0, 3]);
            assert_eq!(results.total_hits, 3);
        }
    }

    #[test]
    fn test_count() {
        for searcher in searchers() {
            assert_eq!(searcher.count(query("banana", "automaton").as_ref()).unwrap(), 2);
            assert_eq!(searcher.count(query("fig", "booleanQuery").as_ref()).unwrap(), 0);
        }
    }

    #[test]
    fn test_collect_stops_early() {
        let searcher = IndexSearcher::sequential(Arc::new(fruit_reader()));
        let mut collector = DocIdCollector::with_limit(1);
        searcher
            .collect(query("apple,banana,cherry", "termsFilter").as_ref(), &mut collector)
            .unwrap();
        assert_eq!(collector.doc_ids(), &[0]);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = SearcherConfig {
            thread_pool_size: Some(0),
            parallel: true,
        };
        let err = IndexSearcher::new(Arc::new(fruit_reader()), config).unwrap_err();
        assert!(err.is_bad_request());
    }
}
