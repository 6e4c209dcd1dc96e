//! jsonhook Codec - Encode/decode engine with custom hooks
//!
//! This crate provides the engine that drives user-defined marshal and
//! unmarshal hooks:
//!
//! - Capability traits and registration macros for custom hooks
//! - The encoder, which compacts hook output before splicing it
//! - The decoder, which hands each hook the exact span of its value
//! - Error propagation that keeps the hook's error reachable
//! - `RawMessage` and a serde bridge
//!
//! Decode-side hook errors come back unchanged; encode-side hook errors are
//! wrapped in a [`MarshalerError`] whose source is the original error. Either
//! way [`Error::find`] locates it.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bridge;
pub mod decode;
mod decode_impls;
pub mod encode;
mod encode_impls;
pub mod error;
pub mod hook;
pub mod options;
pub mod path;
mod propagate;
pub mod raw;

// Re-export commonly used types
pub use jsonhook_format::{Limits, SyntaxError, ValueKind};

// Re-export our own types
pub use bridge::Serde;
pub use decode::{decode, decode_with, from_slice, from_slice_with, Decode, Decoder};
pub use encode::{encode, encode_into, encode_with, ArrayWriter, Encode, Encoder, ObjectWriter};
pub use error::{
    find_in_chain, Error, ErrorShape, FailureOrigin, MarshalerError, ReconstructedError, Result,
    TypeError, UnsupportedValueError,
};
pub use hook::{
    DecodeHook, Direction, EncodeHook, HookError, HookKind, Marshaler, TextMarshaler,
    TextUnmarshaler, Unmarshaler,
};
pub use options::CodecOptions;
pub use path::FieldPath;
pub use raw::RawMessage;
