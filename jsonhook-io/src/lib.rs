//! jsonhook I/O - Writer and reader surfaces
//!
//! This crate connects the jsonhook engine to `std::io`:
//!
//! - Whole-document encode to a writer and decode from a reader
//! - Newline-delimited streams of documents
//!
//! A document is always encoded completely before any byte of it reaches the
//! writer, so a failing hook never leaves a partial document behind.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use jsonhook_codec::{CodecOptions, Decode, Encode};
pub use reader::{StreamIter, StreamReader};
pub use writer::StreamWriter;

use std::io::{Read, Write};

use thiserror::Error;

/// Errors from the I/O surfaces
#[derive(Debug, Error)]
pub enum IoError {
    /// Reading or writing failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding or decoding failed
    #[error(transparent)]
    Codec(#[from] jsonhook_codec::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Find the first error of type `K` in the cause chain
    pub fn find<K: std::error::Error + 'static>(&self) -> Option<&K> {
        match self {
            IoError::Io(err) => jsonhook_codec::find_in_chain(err),
            IoError::Codec(err) => err.find::<K>(),
        }
    }

    /// The codec error, if encoding or decoding failed
    pub fn as_codec(&self) -> Option<&jsonhook_codec::Error> {
        match self {
            IoError::Codec(err) => Some(err),
            IoError::Io(_) => None,
        }
    }
}

/// Encode `value` and write it to `writer` in one call
pub fn to_writer<W, T>(mut writer: W, value: &T, opts: &CodecOptions) -> Result<()>
where
    W: Write,
    T: Encode + ?Sized,
{
    let bytes = jsonhook_codec::encode_with(value, opts)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Read `reader` to the end and decode it into `target`
pub fn from_reader<R, T>(mut reader: R, target: &mut T, opts: &CodecOptions) -> Result<()>
where
    R: Read,
    T: Decode + ?Sized,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    jsonhook_codec::decode_with(&bytes, target, opts)?;
    Ok(())
}
