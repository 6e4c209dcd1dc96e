//! Decoder: JSON bytes into an existing value
//!
//! The whole input is validated before any value is touched, so malformed
//! documents fail with a [`SyntaxError`] and no hook ever runs on them. After
//! that the decoder walks the document with a [`Reader`], handing each
//! registered hook the exact byte span of its value.

use std::any::type_name;
use std::borrow::Cow;

use jsonhook_format::{validate, Reader, SyntaxError, ValueKind};

use crate::error::{Error, Result, TypeError};
use crate::hook::{
    invoke_text_unmarshaler, invoke_unmarshaler, DecodeHook, HookKind, TextUnmarshaler,
    Unmarshaler,
};
use crate::options::CodecOptions;
use crate::path::FieldPath;
use crate::propagate::classify_decode_failure;

/// A value that can be overwritten from JSON
pub trait Decode {
    /// Read the next value into `self` structurally
    fn decode(&mut self, dec: &mut Decoder<'_>) -> Result<()>;

    /// Custom hook for this value, if its type registered one.
    ///
    /// When this returns `Some`, the engine calls the hook and never
    /// [`decode`](Self::decode).
    fn decode_hook(&mut self) -> Option<DecodeHook<'_>> {
        None
    }
}

/// Decode `input` into `target` with default options
pub fn decode<T: Decode + ?Sized>(input: &[u8], target: &mut T) -> Result<()> {
    decode_with(input, target, &CodecOptions::default())
}

/// Decode `input` into `target` with explicit options
pub fn decode_with<T: Decode + ?Sized>(
    input: &[u8],
    target: &mut T,
    opts: &CodecOptions,
) -> Result<()> {
    validate(input, &opts.limits)?;
    Decoder::new(input, opts).decode_value(target)
}

/// Decode `input` into a fresh `T`
pub fn from_slice<T: Decode + Default>(input: &[u8]) -> Result<T> {
    from_slice_with(input, &CodecOptions::default())
}

/// Decode `input` into a fresh `T` with explicit options
pub fn from_slice_with<T: Decode + Default>(input: &[u8], opts: &CodecOptions) -> Result<T> {
    let mut value = T::default();
    decode_with(input, &mut value, opts)?;
    Ok(value)
}

/// Input state for one decode call
pub struct Decoder<'a> {
    reader: Reader<'a>,
    opts: &'a CodecOptions,
    path: FieldPath,
    target_type: &'static str,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder over `input`, which must already be valid JSON
    pub fn new(input: &'a [u8], opts: &'a CodecOptions) -> Self {
        Self {
            reader: Reader::new(input),
            opts,
            path: FieldPath::root(),
            target_type: "",
            depth: 0,
        }
    }

    /// Options for this call
    pub fn options(&self) -> &CodecOptions {
        self.opts
    }

    /// Location of the value being read
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Read the next value into `target`, routing it through its hook if it
    /// has one
    pub fn decode_value<T: Decode + ?Sized>(&mut self, target: &mut T) -> Result<()> {
        let outer = std::mem::replace(&mut self.target_type, type_name::<T>());
        let result = match target.decode_hook() {
            Some(DecodeHook::Json(hook, name)) => self.run_unmarshaler(hook, name),
            Some(DecodeHook::Text(hook, name)) => self.run_text_unmarshaler(hook, name),
            None => target.decode(self),
        };
        self.target_type = outer;
        result
    }

    /// Read the next value through `target`'s [`Unmarshaler`] impl
    pub fn decode_unmarshaler<T: Unmarshaler>(&mut self, target: &mut T) -> Result<()> {
        self.run_unmarshaler(target, type_name::<T>())
    }

    /// Read the next value through `target`'s [`TextUnmarshaler`] impl
    pub fn decode_text_unmarshaler<T: TextUnmarshaler>(&mut self, target: &mut T) -> Result<()> {
        self.run_text_unmarshaler(target, type_name::<T>())
    }

    fn run_unmarshaler(&mut self, hook: &mut dyn Unmarshaler, type_name: &'static str) -> Result<()> {
        let span = self.reader.skip_value()?;
        let input = self.reader.input();
        invoke_unmarshaler(hook, &input[span.clone()], type_name, &self.path).map_err(|cause| {
            classify_decode_failure(
                self.opts,
                type_name,
                HookKind::UnmarshalJson,
                &self.path,
                input,
                span.end,
                cause,
            )
        })
    }

    fn run_text_unmarshaler(
        &mut self,
        hook: &mut dyn TextUnmarshaler,
        type_name: &'static str,
    ) -> Result<()> {
        match self.reader.peek_kind() {
            Some(ValueKind::Null) => {
                self.reader.eat_null();
                Ok(())
            }
            Some(ValueKind::String) => {
                let text = self.reader.read_str()?;
                let head = self.reader.pos();
                invoke_text_unmarshaler(hook, &text, type_name, &self.path).map_err(|cause| {
                    classify_decode_failure(
                        self.opts,
                        type_name,
                        HookKind::UnmarshalText,
                        &self.path,
                        self.reader.input(),
                        head,
                        cause,
                    )
                })
            }
            _ => Err(self.type_mismatch()),
        }
    }

    /// Kind of the next value
    pub fn peek_kind(&mut self) -> Option<ValueKind> {
        self.reader.peek_kind()
    }

    /// Consume `null` if it is next
    pub fn take_null(&mut self) -> bool {
        self.reader.eat_null()
    }

    /// Read a boolean
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.reader.peek_kind() {
            Some(ValueKind::Bool) => Ok(self.reader.read_bool()?),
            _ => Err(self.type_mismatch()),
        }
    }

    /// Read a string, unescaped
    pub fn read_string(&mut self) -> Result<Cow<'a, str>> {
        match self.reader.peek_kind() {
            Some(ValueKind::String) => Ok(self.reader.read_str()?),
            _ => Err(self.type_mismatch()),
        }
    }

    /// Read a number and return its literal text
    pub fn read_number(&mut self) -> Result<&'a str> {
        match self.reader.peek_kind() {
            Some(ValueKind::Number) => Ok(self.reader.read_number()?),
            _ => Err(self.type_mismatch()),
        }
    }

    /// Skip the next value and return its raw bytes
    pub fn raw_value(&mut self) -> Result<&'a [u8]> {
        let span = self.reader.skip_value()?;
        Ok(&self.reader.input()[span])
    }

    /// Read an object, calling `member` for each key.
    ///
    /// `member` returns `Ok(true)` after consuming the value, or `Ok(false)`
    /// without touching it when the key is not recognised. Unrecognised
    /// members are skipped, or rejected when unknown fields are denied.
    pub fn object<F>(&mut self, mut member: F) -> Result<()>
    where
        F: FnMut(&str, &mut Decoder<'a>) -> Result<bool>,
    {
        if self.reader.peek_kind() != Some(ValueKind::Object) {
            return Err(self.type_mismatch());
        }
        self.enter()?;
        let result = self.object_members(&mut member);
        self.leave();
        result
    }

    fn object_members<F>(&mut self, member: &mut F) -> Result<()>
    where
        F: FnMut(&str, &mut Decoder<'a>) -> Result<bool>,
    {
        self.reader.expect(b'{')?;
        if self.reader.eat(b'}') {
            return Ok(());
        }

        loop {
            let key = self.reader.read_str()?;
            self.reader.expect(b':')?;

            self.path.push_field(&key);
            let consumed = member(&*key, self);
            self.path.pop();

            if !consumed? {
                if self.opts.deny_unknown_fields {
                    return Err(Error::UnknownField {
                        name: key.into_owned(),
                        path: self.path.to_string(),
                    });
                }
                tracing::trace!(field = %key, path = %self.path, "skipping unknown field");
                self.reader.skip_value()?;
            }

            if !self.reader.eat(b',') {
                self.reader.expect(b'}')?;
                return Ok(());
            }
        }
    }

    /// Read an array, calling `element` with the index of each element.
    ///
    /// `element` must consume exactly one value.
    pub fn array<F>(&mut self, mut element: F) -> Result<()>
    where
        F: FnMut(usize, &mut Decoder<'a>) -> Result<()>,
    {
        if self.reader.peek_kind() != Some(ValueKind::Array) {
            return Err(self.type_mismatch());
        }
        self.enter()?;
        let result = self.array_elements(&mut element);
        self.leave();
        result
    }

    fn array_elements<F>(&mut self, element: &mut F) -> Result<()>
    where
        F: FnMut(usize, &mut Decoder<'a>) -> Result<()>,
    {
        self.reader.expect(b'[')?;
        if self.reader.eat(b']') {
            return Ok(());
        }

        let mut index = 0;
        loop {
            self.path.push_index(index);
            let result = element(index, self);
            self.path.pop();
            result?;
            index += 1;

            if !self.reader.eat(b',') {
                self.reader.expect(b']')?;
                return Ok(());
            }
        }
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

    /// Skip the next value
    pub fn skip(&mut self) -> Result<()> {
        self.reader.skip_value()?;
        Ok(())
    }

    /// Type error for the value at the cursor, described as `value`
    pub fn type_error(&mut self, value: impl Into<String>) -> Error {
        self.reader.skip_ws();
        Error::Type(TypeError {
            value: value.into(),
            type_name: self.target_type,
            path: self.path.to_string(),
            offset: self.reader.pos(),
        })
    }

    /// Type error naming the kind of the value at the cursor
    pub fn type_mismatch(&mut self) -> Error {
        match self.reader.peek_kind() {
            Some(kind) => self.type_error(kind.name()),
            None => Error::Syntax(SyntaxError::unexpected_eof(self.reader.input().len())),
        }
    }
}
