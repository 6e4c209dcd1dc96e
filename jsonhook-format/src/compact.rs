//! Compaction of JSON text
//!
//! Hook output is rewritten into minified form before it is spliced into a
//! document. Compaction validates while it copies: member order and string
//! contents are preserved, insignificant whitespace is dropped, and nothing
//! is left in the destination when the input turns out to be malformed.

use crate::constants::HEX_DIGITS;
use crate::error::SyntaxError;
use crate::limits::Limits;
use crate::scan::{Scanner, Sink};

struct Compactor<'v> {
    out: &'v mut Vec<u8>,
    escape_html: bool,
}

impl Sink for Compactor<'_> {
    fn token(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    fn string(&mut self, raw: &[u8]) {
        if !self.escape_html {
            self.out.extend_from_slice(raw);
            return;
        }

        let mut start = 0;
        let mut i = 0;
        while i < raw.len() {
            let b = raw[i];
            if matches!(b, b'<' | b'>' | b'&') {
                self.out.extend_from_slice(&raw[start..i]);
                push_unicode_escape(self.out, b as u32);
                i += 1;
                start = i;
            } else if b == 0xE2 && i + 2 < raw.len() && raw[i + 1] == 0x80 && raw[i + 2] & !1 == 0xA8
            {
                // U+2028 LINE SEPARATOR / U+2029 PARAGRAPH SEPARATOR
                self.out.extend_from_slice(&raw[start..i]);
                push_unicode_escape(self.out, 0x2028 | (raw[i + 2] & 1) as u32);
                i += 3;
                start = i;
            } else {
                i += 1;
            }
        }
        self.out.extend_from_slice(&raw[start..]);
    }
}

pub(crate) fn push_unicode_escape(out: &mut Vec<u8>, code: u32) {
    out.extend_from_slice(b"\\u");
    for shift in [12, 8, 4, 0] {
        out.push(HEX_DIGITS[((code >> shift) & 0xF) as usize]);
    }
}

/// Append the minified form of `src` to `dst`.
///
/// With `escape_html`, `<`, `>`, `&`, U+2028 and U+2029 inside strings are
/// replaced by their `\u` escapes. On error `dst` is restored to its original
/// length.
pub fn compact(dst: &mut Vec<u8>, src: &[u8], escape_html: bool) -> Result<(), SyntaxError> {
    compact_with_limits(dst, src, escape_html, &Limits::default())
}

/// [`compact`] with explicit scanner limits
pub fn compact_with_limits(
    dst: &mut Vec<u8>,
    src: &[u8],
    escape_html: bool,
    limits: &Limits,
) -> Result<(), SyntaxError> {
    let mark = dst.len();
    let result = {
        let mut sink = Compactor {
            out: &mut *dst,
            escape_html,
        };
        Scanner::new(src, limits).scan_document(&mut sink)
    };
    if result.is_err() {
        dst.truncate(mark);
    }
    result
}

/// Whether `src` is a single valid JSON value
pub fn valid(src: &[u8]) -> bool {
    crate::scan::validate(src, &Limits::default()).is_ok()
}

/// Trim insignificant whitespace surrounding a document
pub fn trim_ws(src: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r');
    let start = src.iter().position(|b| !is_ws(b)).unwrap_or(src.len());
    let end = src.iter().rposition(|b| !is_ws(b)).map_or(start, |i| i + 1);
    &src[start..end]
}
