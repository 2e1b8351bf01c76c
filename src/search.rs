//! Search execution over an [`IndexReader`](crate::lexical::reader::IndexReader).

pub mod searcher;

pub use searcher::{IndexSearcher, SearchResults, SearcherConfig};
