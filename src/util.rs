//! Shared utility modules used across docterms components.

pub mod bits;
pub mod bytes;
