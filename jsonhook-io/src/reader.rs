//! Newline-delimited document reader

use std::io::BufRead;
use std::marker::PhantomData;

use jsonhook_codec::{decode_with, CodecOptions, Decode};

use crate::Result;

/// Reads one JSON document per line, skipping blank lines
pub struct StreamReader<R: BufRead> {
    inner: R,
    opts: CodecOptions,
    line: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> StreamReader<R> {
    /// Create a reader with default options
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, CodecOptions::default())
    }

    /// Create a reader with explicit options
    pub fn with_options(inner: R, opts: CodecOptions) -> Self {
        Self {
            inner,
            opts,
            line: Vec::new(),
            line_number: 0,
        }
    }

    /// Line number of the last document read, starting at 1
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Decode the next document into `target`.
    ///
    /// Returns `Ok(false)` at end of input.
    pub fn read_into<T: Decode + ?Sized>(&mut self, target: &mut T) -> Result<bool> {
        loop {
            self.line.clear();
            if self.inner.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            if self.line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            if let Err(err) = decode_with(&self.line, target, &self.opts) {
                tracing::debug!(line = self.line_number, error = %err, "document failed to decode");
                return Err(err.into());
            }
            return Ok(true);
        }
    }

    /// Decode the next document into a fresh `T`
    pub fn next_value<T: Decode + Default>(&mut self) -> Option<Result<T>> {
        let mut value = T::default();
        match self.read_into(&mut value) {
            Ok(true) => Some(Ok(value)),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }

    /// Iterate over the remaining documents as `T`
    pub fn iter<T: Decode + Default>(&mut self) -> StreamIter<'_, R, T> {
        StreamIter {
            reader: self,
            _marker: PhantomData,
        }
    }
}

/// Iterator over the documents of a [`StreamReader`]
pub struct StreamIter<'r, R: BufRead, T> {
    reader: &'r mut StreamReader<R>,
    _marker: PhantomData<fn() -> T>,
}

impl<R: BufRead, T: Decode + Default> Iterator for StreamIter<'_, R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_value()
    }
}
