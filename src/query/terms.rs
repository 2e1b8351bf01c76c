//! Terms query parsing.
//!
//! Turns a field name, a separated list of raw values and a method name
//! into one of the terms queries of this crate.

pub mod config;
pub mod method;
pub mod parser;

pub use config::TermsQueryConfig;
pub use method::{SubMethod, TermsMethod};
pub use parser::{TermsParams, TermsQueryParser, split_values};
