//! Encoder: value to JSON bytes
//!
//! Every value goes through [`Encoder::encode_value`], which asks the value
//! for a hook before falling back to its structural [`Encode::encode`]. Hook
//! output is validated and compacted before it reaches the buffer, and any
//! failure rolls the buffer back to where the failing value started.

use std::any::type_name;

use jsonhook_format::compact::{compact_with_limits, trim_ws};
use jsonhook_format::{validate, write};

use crate::error::{Error, FailureOrigin, Result, UnsupportedValueError};
use crate::hook::{
    invoke_marshaler, invoke_text_marshaler, EncodeHook, HookKind, Marshaler, TextMarshaler,
};
use crate::options::CodecOptions;
use crate::path::FieldPath;
use crate::propagate::envelope;

/// A value that can be written as JSON
pub trait Encode {
    /// Write `self` structurally
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()>;

    /// Custom hook for this value, if its type registered one.
    ///
    /// When this returns `Some`, the engine calls the hook and never
    /// [`encode`](Self::encode).
    fn encode_hook(&self) -> Option<EncodeHook<'_>> {
        None
    }
}

/// Encode `value` with default options
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    encode_with(value, &CodecOptions::default())
}

/// Encode `value` with explicit options
pub fn encode_with<T: Encode + ?Sized>(value: &T, opts: &CodecOptions) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_into(value, &mut buf, opts)?;
    Ok(buf)
}

/// Append the encoding of `value` to `buf`.
///
/// On error `buf` is left exactly as it was.
pub fn encode_into<T: Encode + ?Sized>(
    value: &T,
    buf: &mut Vec<u8>,
    opts: &CodecOptions,
) -> Result<()> {
    let mark = buf.len();
    let result = Encoder::new(buf, opts).encode_value(value);
    if let Err(err) = &result {
        tracing::debug!(error = %err, "encode failed, discarding output");
        buf.truncate(mark);
    }
    result
}

/// Output state for one encode call
pub struct Encoder<'a> {
    buf: &'a mut Vec<u8>,
    opts: &'a CodecOptions,
    path: FieldPath,
    depth: usize,
}

impl<'a> Encoder<'a> {
    /// Create an encoder appending to `buf`
    pub fn new(buf: &'a mut Vec<u8>, opts: &'a CodecOptions) -> Self {
        Self {
            buf,
            opts,
            path: FieldPath::root(),
            depth: 0,
        }
    }

    /// Options for this call
    pub fn options(&self) -> &CodecOptions {
        self.opts
    }

    /// Location of the value being written
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Write a value, routing it through its hook if it has one
    pub fn encode_value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mark = self.buf.len();
        let depth = self.depth;
        let result = match value.encode_hook() {
            Some(EncodeHook::Json(hook, name)) => self.splice_marshaler(hook, name),
            Some(EncodeHook::Text(hook, name)) => self.splice_text_marshaler(hook, name),
            None => value.encode(self),
        };
        if result.is_err() {
            // Containers opened by the failed value were never closed
            self.buf.truncate(mark);
            self.depth = depth;
        }
        result
    }

    /// Write `value` through its [`Marshaler`] impl
    pub fn encode_marshaler<T: Marshaler>(&mut self, value: &T) -> Result<()> {
        self.splice_marshaler(value, type_name::<T>())
    }

    /// Write `value` through its [`TextMarshaler`] impl
    pub fn encode_text_marshaler<T: TextMarshaler>(&mut self, value: &T) -> Result<()> {
        self.splice_text_marshaler(value, type_name::<T>())
    }

    fn splice_marshaler(&mut self, hook: &dyn Marshaler, type_name: &'static str) -> Result<()> {
        let raw = invoke_marshaler(hook, type_name, &self.path).map_err(|cause| {
            envelope(
                type_name,
                HookKind::MarshalJson,
                FailureOrigin::Hook,
                &self.path,
                cause,
            )
        })?;

        let spliced = if self.opts.compact_hook_output {
            compact_with_limits(self.buf, &raw, self.opts.escape_html, &self.opts.limits)
        } else {
            validate(&raw, &self.opts.limits).map(|()| self.buf.extend_from_slice(trim_ws(&raw)))
        };
        spliced.map_err(|err| {
            envelope(
                type_name,
                HookKind::MarshalJson,
                FailureOrigin::Compaction,
                &self.path,
                Box::new(err),
            )
        })
    }

    fn splice_text_marshaler(
        &mut self,
        hook: &dyn TextMarshaler,
        type_name: &'static str,
    ) -> Result<()> {
        let text = invoke_text_marshaler(hook, type_name, &self.path).map_err(|cause| {
            envelope(
                type_name,
                HookKind::MarshalText,
                FailureOrigin::Hook,
                &self.path,
                cause,
            )
        })?;
        write::write_str(self.buf, &text, self.opts.escape_html);
        Ok(())
    }

    /// Write `null`
    pub fn write_null(&mut self) -> Result<()> {
        write::write_null(self.buf);
        Ok(())
    }

    /// Write `true` or `false`
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        write::write_bool(self.buf, value);
        Ok(())
    }

    /// Write a signed integer
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        write::write_i64(self.buf, value);
        Ok(())
    }

    /// Write an unsigned integer
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        write::write_u64(self.buf, value);
        Ok(())
    }

    /// Write a 128-bit signed integer
    pub fn write_i128(&mut self, value: i128) -> Result<()> {
        write::write_i128(self.buf, value);
        Ok(())
    }

    /// Write a 128-bit unsigned integer
    pub fn write_u128(&mut self, value: u128) -> Result<()> {
        write::write_u128(self.buf, value);
        Ok(())
    }

    /// Write a 64-bit float; NaN and infinities are rejected
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        write::write_f64(self.buf, value).map_err(|err| self.unsupported(err.name()))
    }

    /// Write a 32-bit float; NaN and infinities are rejected
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        write::write_f32(self.buf, value).map_err(|err| self.unsupported(err.name()))
    }

    /// Write a quoted, escaped string
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        write::write_str(self.buf, value, self.opts.escape_html);
        Ok(())
    }

    /// Start an object
    pub fn object(&mut self) -> Result<ObjectWriter<'_, 'a>> {
        self.enter()?;
        self.buf.push(b'{');
        Ok(ObjectWriter {
            enc: self,
            empty: true,
        })
    }

    /// Start an array
    pub fn array(&mut self) -> Result<ArrayWriter<'_, 'a>> {
        self.enter()?;
        self.buf.push(b'[');
        Ok(ArrayWriter { enc: self, len: 0 })
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.opts.limits.max_depth {
            return Err(Error::DepthExceeded {
                max_depth: self.opts.limits.max_depth,
                path: self.path.to_string(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn unsupported(&self, value: &str) -> Error {
        Error::UnsupportedValue(UnsupportedValueError {
            value: value.to_string(),
            path: self.path.to_string(),
        })
    }
}

/// Writes the members of one object.
///
/// A member whose value fails leaves no trace in the output.
pub struct ObjectWriter<'e, 'a> {
    enc: &'e mut Encoder<'a>,
    empty: bool,
}

impl ObjectWriter<'_, '_> {
    /// Write one member
    pub fn field<T: Encode + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        let mark = self.enc.buf.len();
        if !self.empty {
            self.enc.buf.push(b',');
        }
        write::write_str(self.enc.buf, name, self.enc.opts.escape_html);
        self.enc.buf.push(b':');

        self.enc.path.push_field(name);
        let result = self.enc.encode_value(value);
        self.enc.path.pop();

        match result {
            Ok(()) => {
                self.empty = false;
                Ok(())
            }
            Err(err) => {
                self.enc.buf.truncate(mark);
                Err(err)
            }
        }
    }

    /// Write one member, or nothing when `value` is `None`
    pub fn field_if_some<T: Encode>(&mut self, name: &str, value: &Option<T>) -> Result<()> {
        match value {
            Some(value) => self.field(name, value),
            None => Ok(()),
        }
    }

    /// Close the object
    pub fn end(self) -> Result<()> {
        self.enc.buf.push(b'}');
        self.enc.leave();
        Ok(())
    }
}

/// Writes the elements of one array
pub struct ArrayWriter<'e, 'a> {
    enc: &'e mut Encoder<'a>,
    len: usize,
}

impl ArrayWriter<'_, '_> {
    /// Write one element
    pub fn element<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mark = self.enc.buf.len();
        if self.len > 0 {
            self.enc.buf.push(b',');
        }

        self.enc.path.push_index(self.len);
        let result = self.enc.encode_value(value);
        self.enc.path.pop();

        match result {
            Ok(()) => {
                self.len += 1;
                Ok(())
            }
            Err(err) => {
                self.enc.buf.truncate(mark);
                Err(err)
            }
        }
    }

    /// Close the array
    pub fn end(self) -> Result<()> {
        self.enc.buf.push(b']');
        self.enc.leave();
        Ok(())
    }
}
