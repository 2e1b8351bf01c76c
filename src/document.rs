//! Document module.
//!
//! Documents are flat collections of `field -> values` pairs in readable
//! form. Values are encoded by the schema's field types when a segment is
//! built.
//!
//! # Examples
//!
//! ```
//! use docterms::document::Document;
//!
//! let doc = Document::builder()
//!     .add("tags", "rust")
//!     .add("tags", "search")
//!     .add("year", "2024")
//!     .build();
//!
//! assert_eq!(doc.values("tags"), &["rust".to_string(), "search".to_string()]);
//! ```

#[allow(clippy::module_inception)]
pub mod document;

pub use document::{Document, DocumentBuilder};
