//! Custom hook capabilities and the adapter that invokes them
//!
//! A type opts into custom encoding by implementing one of the capability
//! traits and registering it with one of the `register_*` macros. Registration
//! generates the type's [`Encode`](crate::Encode) or [`Decode`](crate::Decode)
//! impl so that the engine routes every value of that type through the hook
//! and never through structural traversal.

use std::any::type_name;
use std::fmt;

use crate::path::FieldPath;

/// Error raised by a hook. Boxed so the engine can hand it back unchanged.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Produces the JSON encoding of a value
pub trait Marshaler {
    /// Return JSON text for `self`. Whitespace is allowed; the engine
    /// compacts it before splicing.
    fn marshal_json(&self) -> Result<Vec<u8>, HookError>;
}

/// Consumes the JSON encoding of a value
pub trait Unmarshaler {
    /// Replace `self` with the value encoded in `raw`, the exact span of this
    /// value in the source document. `raw` must not be retained.
    fn unmarshal_json(&mut self, raw: &[u8]) -> Result<(), HookError>;
}

/// Produces a textual form that the engine encodes as a JSON string
pub trait TextMarshaler {
    /// Return the unquoted text for `self`
    fn marshal_text(&self) -> Result<String, HookError>;
}

/// Consumes the unescaped contents of a JSON string
pub trait TextUnmarshaler {
    /// Replace `self` with the value described by `text`
    fn unmarshal_text(&mut self, text: &str) -> Result<(), HookError>;
}

/// Which hook method was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// [`Marshaler::marshal_json`]
    MarshalJson,
    /// [`TextMarshaler::marshal_text`]
    MarshalText,
    /// [`Unmarshaler::unmarshal_json`]
    UnmarshalJson,
    /// [`TextUnmarshaler::unmarshal_text`]
    UnmarshalText,
}

impl HookKind {
    /// Name of the hook method
    pub fn method_name(&self) -> &'static str {
        match self {
            HookKind::MarshalJson => "marshal_json",
            HookKind::MarshalText => "marshal_text",
            HookKind::UnmarshalJson => "unmarshal_json",
            HookKind::UnmarshalText => "unmarshal_text",
        }
    }

    /// Direction this hook runs in
    pub fn direction(&self) -> Direction {
        match self {
            HookKind::MarshalJson | HookKind::MarshalText => Direction::Encode,
            HookKind::UnmarshalJson | HookKind::UnmarshalText => Direction::Decode,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Direction of a codec call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Value to bytes
    Encode,
    /// Bytes to value
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => f.write_str("encode"),
            Direction::Decode => f.write_str("decode"),
        }
    }
}

/// Encode-side capability declared by a value
pub enum EncodeHook<'h> {
    /// JSON marshaler and the concrete type name it was registered for
    Json(&'h dyn Marshaler, &'static str),
    /// Text marshaler and the concrete type name it was registered for
    Text(&'h dyn TextMarshaler, &'static str),
}

impl<'h> EncodeHook<'h> {
    /// Declare a JSON marshaler
    pub fn json<T: Marshaler>(hook: &'h T) -> Self {
        EncodeHook::Json(hook, type_name::<T>())
    }

    /// Declare a text marshaler
    pub fn text<T: TextMarshaler>(hook: &'h T) -> Self {
        EncodeHook::Text(hook, type_name::<T>())
    }
}

/// Decode-side capability declared by a value
pub enum DecodeHook<'h> {
    /// JSON unmarshaler and the concrete type name it was registered for
    Json(&'h mut dyn Unmarshaler, &'static str),
    /// Text unmarshaler and the concrete type name it was registered for
    Text(&'h mut dyn TextUnmarshaler, &'static str),
}

impl<'h> DecodeHook<'h> {
    /// Declare a JSON unmarshaler
    pub fn json<T: Unmarshaler>(hook: &'h mut T) -> Self {
        DecodeHook::Json(hook, type_name::<T>())
    }

    /// Declare a text unmarshaler
    pub fn text<T: TextUnmarshaler>(hook: &'h mut T) -> Self {
        DecodeHook::Text(hook, type_name::<T>())
    }
}

pub(crate) fn invoke_marshaler(
    hook: &dyn Marshaler,
    type_name: &'static str,
    path: &FieldPath,
) -> Result<Vec<u8>, HookError> {
    tracing::trace!(type_name, path = %path, "invoking marshal_json");
    let raw = hook.marshal_json()?;
    tracing::trace!(type_name, len = raw.len(), "marshal_json returned");
    Ok(raw)
}

pub(crate) fn invoke_text_marshaler(
    hook: &dyn TextMarshaler,
    type_name: &'static str,
    path: &FieldPath,
) -> Result<String, HookError> {
    tracing::trace!(type_name, path = %path, "invoking marshal_text");
    hook.marshal_text()
}

pub(crate) fn invoke_unmarshaler(
    hook: &mut dyn Unmarshaler,
    raw: &[u8],
    type_name: &'static str,
    path: &FieldPath,
) -> Result<(), HookError> {
    tracing::trace!(type_name, path = %path, len = raw.len(), "invoking unmarshal_json");
    hook.unmarshal_json(raw)
}

pub(crate) fn invoke_text_unmarshaler(
    hook: &mut dyn TextUnmarshaler,
    text: &str,
    type_name: &'static str,
    path: &FieldPath,
) -> Result<(), HookError> {
    tracing::trace!(type_name, path = %path, len = text.len(), "invoking unmarshal_text");
    hook.unmarshal_text(text)
}

/// Route all encoding of a type through its [`Marshaler`] impl.
///
/// ```ignore
/// register_marshaler!(Celsius);
/// register_marshaler!(Label, text); // uses TextMarshaler
/// ```
#[macro_export]
macro_rules! register_marshaler {
    ($ty:ty) => {
        impl $crate::Encode for $ty {
            fn encode(&self, enc: &mut $crate::Encoder<'_>) -> $crate::Result<()> {
                enc.encode_marshaler(self)
            }

            fn encode_hook(&self) -> ::core::option::Option<$crate::EncodeHook<'_>> {
                ::core::option::Option::Some($crate::EncodeHook::json(self))
            }
        }
    };
    ($ty:ty, text) => {
        impl $crate::Encode for $ty {
            fn encode(&self, enc: &mut $crate::Encoder<'_>) -> $crate::Result<()> {
                enc.encode_text_marshaler(self)
            }

            fn encode_hook(&self) -> ::core::option::Option<$crate::EncodeHook<'_>> {
                ::core::option::Option::Some($crate::EncodeHook::text(self))
            }
        }
    };
}

/// Route all decoding of a type through its [`Unmarshaler`] impl.
///
/// ```ignore
/// register_unmarshaler!(Celsius);
/// register_unmarshaler!(Label, text); // uses TextUnmarshaler
/// ```
#[macro_export]
macro_rules! register_unmarshaler {
    ($ty:ty) => {
        impl $crate::Decode for $ty {
            fn decode(&mut self, dec: &mut $crate::Decoder<'_>) -> $crate::Result<()> {
                dec.decode_unmarshaler(self)
            }

            fn decode_hook(&mut self) -> ::core::option::Option<$crate::DecodeHook<'_>> {
                ::core::option::Option::Some($crate::DecodeHook::json(self))
            }
        }
    };
    ($ty:ty, text) => {
        impl $crate::Decode for $ty {
            fn decode(&mut self, dec: &mut $crate::Decoder<'_>) -> $crate::Result<()> {
                dec.decode_text_unmarshaler(self)
            }

            fn decode_hook(&mut self) -> ::core::option::Option<$crate::DecodeHook<'_>> {
                ::core::option::Option::Some($crate::DecodeHook::text(self))
            }
        }
    };
}
