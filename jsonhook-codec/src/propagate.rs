//! Classification of hook failures into the shape returned to callers
//!
//! | direction | origin     | shape                                         |
//! |-----------|------------|-----------------------------------------------|
//! | decode    | hook       | Direct (Reconstructed if identity is not kept) |
//! | encode    | hook       | Enveloped                                     |
//! | encode    | compaction | Enveloped                                     |

use crate::error::{Error, FailureOrigin, MarshalerError, ReconstructedError};
use crate::hook::{HookError, HookKind};
use crate::options::CodecOptions;
use crate::path::FieldPath;

/// Operation name used in rebuilt decode messages
const DECODE_OPERATION: &str = "unmarshalerDecoder";
/// Bytes either side of the failure shown in the short excerpt
const PEEK_WINDOW: usize = 10;
/// Bytes either side of the failure shown in the wide excerpt
const CONTEXT_WINDOW: usize = 50;

/// Wrap an encode-side failure with the type and location of the value
pub(crate) fn envelope(
    type_name: &'static str,
    hook: HookKind,
    origin: FailureOrigin,
    path: &FieldPath,
    cause: HookError,
) -> Error {
    tracing::debug!(
        type_name,
        hook = %hook,
        origin = ?origin,
        path = %path,
        "enveloping encode failure"
    );
    Error::Enveloped(MarshalerError::new(
        type_name,
        hook,
        origin,
        path.to_string(),
        cause,
    ))
}

/// Shape a decode-side hook failure.
///
/// `head` is the offset just past the value the hook was given.
pub(crate) fn classify_decode_failure(
    opts: &CodecOptions,
    type_name: &'static str,
    hook: HookKind,
    path: &FieldPath,
    input: &[u8],
    head: usize,
    cause: HookError,
) -> Error {
    if opts.preserve_error_identity {
        tracing::debug!(type_name, hook = %hook, path = %path, "forwarding decode failure");
        return Error::Direct(cause);
    }

    tracing::debug!(
        type_name,
        hook = %hook,
        path = %path,
        head,
        "rebuilding decode failure from its message"
    );
    let message = reconstruct(DECODE_OPERATION, &cause.to_string(), input, head);
    Error::Reconstructed(ReconstructedError::new(message))
}

/// Render `msg` with excerpts of `input` around `head`
pub(crate) fn reconstruct(operation: &str, msg: &str, input: &[u8], head: usize) -> String {
    let head = head.min(input.len());
    let peek_start = head.saturating_sub(PEEK_WINDOW);
    let peek_end = (head + PEEK_WINDOW).min(input.len());
    let context_start = head.saturating_sub(CONTEXT_WINDOW);
    let context_end = (head + CONTEXT_WINDOW).min(input.len());

    format!(
        "{}: {}, error found in #{} byte of ...|{}|..., bigger context ...|{}|...",
        operation,
        msg,
        head - peek_start,
        String::from_utf8_lossy(&input[peek_start..peek_end]),
        String::from_utf8_lossy(&input[context_start..context_end]),
    )
}
