//! Segmented index storage.
//!
//! An index is an ordered list of immutable [`segment::Segment`]s. Each
//! segment owns, per field, an fst term dictionary with postings, a
//! sorted-set doc-values column and (for point fields) a sorted point list.
//! [`ordinal_map::OrdinalMap`] and [`global_ords::GlobalOrdinalView`] merge
//! the per-segment doc-values dictionaries into one corpus-wide ordinal
//! space.

pub mod doc_values;
pub mod global_ords;
pub mod ordinal_map;
pub mod points;
pub mod reader;
pub mod segment;
pub mod term_dict;
pub mod writer;
