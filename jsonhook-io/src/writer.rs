//! Newline-delimited document writer

use std::io::Write;

use jsonhook_codec::{encode_into, CodecOptions, Encode};

use crate::Result;

/// Writes one compact JSON document per line.
///
/// Each document is encoded into a scratch buffer first; a document that
/// fails to encode writes nothing and the stream stays usable.
pub struct StreamWriter<W: Write> {
    inner: W,
    opts: CodecOptions,
    scratch: Vec<u8>,
    written: usize,
}

impl<W: Write> StreamWriter<W> {
    /// Create a writer with default options
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, CodecOptions::default())
    }

    /// Create a writer with explicit options.
    ///
    /// Hook output is always compacted so that no document spans lines.
    pub fn with_options(inner: W, opts: CodecOptions) -> Self {
        Self {
            inner,
            opts: opts.with_compact_hook_output(true),
            scratch: Vec::new(),
            written: 0,
        }
    }

    /// Encode `value` and write it as one line
    pub fn write<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.scratch.clear();
        if let Err(err) = encode_into(value, &mut self.scratch, &self.opts) {
            tracing::debug!(document = self.written, error = %err, "skipping document that failed to encode");
            return Err(err.into());
        }
        self.scratch.push(b'\n');
        self.inner.write_all(&self.scratch)?;
        self.written += 1;
        Ok(())
    }

    /// Number of documents written so far
    pub fn documents_written(&self) -> usize {
        self.written
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
