//! jsonhook Format - Core primitives for hook-compatible JSON encoding
//!
//! This crate provides the byte-level building blocks used by the jsonhook
//! engine, with no knowledge of hooks or user types. It includes:
//!
//! - A validating scanner for JSON text
//! - Compaction of hook output into minified form
//! - String and number formatting
//! - A reader over already-validated input
//! - Error types
//! - Limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod compact;
pub mod constants;
pub mod error;
pub mod limits;
pub mod read;
pub mod scan;
pub mod types;
pub mod write;

// Re-export commonly used types
pub use compact::{compact, valid};
pub use error::{NonFiniteFloat, SyntaxError};
pub use limits::Limits;
pub use read::Reader;
pub use scan::{validate, value_end};
pub use types::ValueKind;
