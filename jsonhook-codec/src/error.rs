//! Error types for the jsonhook engine

use std::error::Error as StdError;

use jsonhook_format::SyntaxError;
use thiserror::Error;

use crate::hook::{HookError, HookKind};

/// Where an encode-side failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureOrigin {
    /// The hook itself returned an error
    Hook,
    /// The hook succeeded but its output was not valid JSON
    Compaction,
}

/// Envelope around an encode-side hook failure.
///
/// Carries the concrete type and location of the failing value while keeping
/// the original error reachable through [`source`](StdError::source).
#[derive(Debug, Error)]
#[error("error calling {} for type {}: {}", .hook.method_name(), .type_name, .source)]
pub struct MarshalerError {
    type_name: &'static str,
    hook: HookKind,
    origin: FailureOrigin,
    path: String,
    #[source]
    source: HookError,
}

impl MarshalerError {
    pub(crate) fn new(
        type_name: &'static str,
        hook: HookKind,
        origin: FailureOrigin,
        path: String,
        source: HookError,
    ) -> Self {
        Self {
            type_name,
            hook,
            origin,
            path,
            source,
        }
    }

    /// Concrete type whose hook failed
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Hook method that was called
    pub fn hook(&self) -> HookKind {
        self.hook
    }

    /// Whether the hook or the compaction of its output failed
    pub fn origin(&self) -> FailureOrigin {
        self.origin
    }

    /// Location of the value in the document, e.g. `$.items[0]`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The original error
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    /// Unwrap into the original error
    pub fn into_cause(self) -> HookError {
        self.source
    }
}

/// Hook failure rebuilt from its message alone.
///
/// The original error value is gone, so cause lookups cannot find it. Only
/// produced when error identity preservation is turned off.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ReconstructedError {
    message: String,
}

impl ReconstructedError {
    pub(crate) fn new(message: String) -> Self {
        Self { message }
    }

    /// Full rebuilt message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// JSON value that does not fit the target type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot unmarshal {value} into {path} of type {type_name}")]
pub struct TypeError {
    /// Description of the JSON value, e.g. `string` or `number 300`
    pub value: String,
    /// Rust type that was expected
    pub type_name: &'static str,
    /// Location of the value in the document
    pub path: String,
    /// Byte offset where the value starts
    pub offset: usize,
}

/// Value with no JSON representation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported value: {value} at {path}")]
pub struct UnsupportedValueError {
    /// Rendering of the rejected value
    pub value: String,
    /// Location of the value in the document
    pub path: String,
}

/// Shape in which a failure reaches the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorShape {
    /// Hook error returned unchanged
    Direct,
    /// Hook error wrapped in a [`MarshalerError`]
    Enveloped,
    /// Hook error rebuilt from its message
    Reconstructed,
    /// Failure raised by the engine itself
    Engine,
}

/// jsonhook engine errors
#[derive(Debug, Error)]
pub enum Error {
    /// Decode-side hook error, forwarded unchanged.
    #[error(transparent)]
    Direct(HookError),
    /// Encode-side hook or compaction failure, wrapped with context.
    #[error(transparent)]
    Enveloped(MarshalerError),
    /// Decode-side hook error rebuilt from its message.
    #[error(transparent)]
    Reconstructed(ReconstructedError),
    /// Input text is not valid JSON.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// JSON value does not fit the target type.
    #[error(transparent)]
    Type(#[from] TypeError),
    /// Value has no JSON representation.
    #[error(transparent)]
    UnsupportedValue(#[from] UnsupportedValueError),
    /// Object member not accepted by the target, with unknown fields denied.
    #[error("unknown field {name:?} at {path}")]
    UnknownField {
        /// Member name
        name: String,
        /// Location of the object
        path: String,
    },
    /// Encoding or decoding nested deeper than the configured limit.
    #[error("exceeded max depth of {max_depth} at {path}")]
    DepthExceeded {
        /// Configured limit
        max_depth: usize,
        /// Location where the limit was hit
        path: String,
    },
    /// serde_json failed on a bridged value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// How this failure was shaped on its way to the caller
    pub fn shape(&self) -> ErrorShape {
        match self {
            Error::Direct(_) => ErrorShape::Direct,
            Error::Enveloped(_) => ErrorShape::Enveloped,
            Error::Reconstructed(_) => ErrorShape::Reconstructed,
            _ => ErrorShape::Engine,
        }
    }

    /// The concrete error at the top of the chain.
    ///
    /// For `Direct` this is the hook's own error; for every other variant it
    /// is the carrier itself.
    pub fn head(&self) -> &(dyn StdError + 'static) {
        match self {
            Error::Direct(err) => &**err,
            Error::Enveloped(err) => err,
            Error::Reconstructed(err) => err,
            Error::Syntax(err) => err,
            Error::Type(err) => err,
            Error::UnsupportedValue(err) => err,
            Error::Json(err) => err,
            Error::UnknownField { .. } | Error::DepthExceeded { .. } => self,
        }
    }

    /// Top-level concrete type check, without unwrapping any envelope
    pub fn downcast_ref<K: StdError + 'static>(&self) -> Option<&K> {
        self.head().downcast_ref::<K>()
    }

    /// Find the first error of type `K` in the cause chain.
    ///
    /// Walks from [`head`](Self::head) through every `source()` link, so it
    /// sees through envelopes. A reconstructed error has no source and the
    /// original type cannot be found behind it.
    pub fn find<K: StdError + 'static>(&self) -> Option<&K> {
        find_in_chain(self.head())
    }

    /// Whether the cause chain contains an error of type `K`
    pub fn is<K: StdError + 'static>(&self) -> bool {
        self.find::<K>().is_some()
    }

    /// Take the original hook error out of a `Direct` or `Enveloped` failure
    pub fn into_hook_error(self) -> std::result::Result<HookError, Self> {
        match self {
            Error::Direct(err) => Ok(err),
            Error::Enveloped(err) => Ok(err.into_cause()),
            other => Err(other),
        }
    }

    /// The envelope, if this is an encode-side hook failure
    pub fn as_marshaler_error(&self) -> Option<&MarshalerError> {
        match self {
            Error::Enveloped(err) => Some(err),
            _ => None,
        }
    }
}

/// Walk `err` and its sources looking for a `K`
pub fn find_in_chain<'e, K: StdError + 'static>(
    err: &'e (dyn StdError + 'static),
) -> Option<&'e K> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<K>() {
            return Some(found);
        }
        current = err.source();
    }
    None
}
