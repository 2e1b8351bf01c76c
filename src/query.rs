//! Query system for matching documents.
//!
//! A [`query::Query`] is resolved once against an
//! [`IndexReader`](crate::lexical::reader::IndexReader) into a
//! [`query::Weight`], which then hands out one [`matcher::Matcher`] per
//! segment. Matchers report doc ids in whole-index numbering.

pub mod automaton;
pub mod boolean;
pub mod collector;
pub mod doc_values_terms;
pub mod match_none;
pub mod matcher;
pub mod ordinal_resolver;
pub mod point_set;
#[allow(clippy::module_inception)]
pub mod query;
pub mod term;
pub mod term_in_set;
pub mod terms;
pub mod top_level;
pub mod two_phase;

pub use query::{Query, Weight};
