//! # docterms
//!
//! Terms queries over a segmented, multi-valued field index.
//!
//! ## Features
//!
//! - Five interchangeable matching strategies for a set of field values
//! - Dictionary-ordinal matching over a merged, index-wide ordinal space
//! - Per-segment ordinal matching and exact term-set matching
//! - Segment-parallel search through a rayon pool
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use docterms::document::Document;
//! use docterms::lexical::writer::IndexWriter;
//! use docterms::query::terms::{TermsParams, TermsQueryParser};
//! use docterms::schema::{FieldDefinition, FieldType, Schema};
//! use docterms::search::IndexSearcher;
//!
//! let schema = Arc::new(
//!     Schema::new()
//!         .with_field("tags", FieldDefinition::new(FieldType::String))
//!         .unwrap(),
//! );
//! let mut writer = IndexWriter::with_schema(schema.clone());
//! writer.add_document(Document::builder().add_all("tags", ["red", "blue"]).build()).unwrap();
//! writer.add_document(Document::builder().add("tags", "green").build()).unwrap();
//! let reader = Arc::new(writer.commit().unwrap());
//!
//! let query = TermsQueryParser::new(schema)
//!     .parse(
//!         &TermsParams::new("tags", "green,yellow")
//!             .with_method("docValuesTermsFilter")
//!             .with_submethod("toplevel"),
//!     )
//!     .unwrap();
//! let results = IndexSearcher::sequential(reader).search(query.as_ref(), None).unwrap();
//! assert_eq!(results.doc_ids, vec![1]);
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod lexical;
pub mod query;
pub mod schema;
pub mod search;
pub mod util;

#[cfg(test)]
mod testing;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
