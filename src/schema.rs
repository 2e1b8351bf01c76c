//! Schema module for docterms.
//!
//! This module provides field definitions and the value encoders that turn a
//! readable query value into the binary key stored in the index.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

pub use field::{FieldDefinition, FieldType, ValueEncoder};
pub use schema::Schema;
