//! Scalar formatting: strings, integers and floats

use std::fmt::{Display, LowerExp};

use crate::compact::push_unicode_escape;
use crate::constants::{FALSE, FLOAT_PLAIN_MAX, FLOAT_PLAIN_MIN, NULL, TRUE};
use crate::error::NonFiniteFloat;

/// Append `null`
pub fn write_null(dst: &mut Vec<u8>) {
    dst.extend_from_slice(NULL);
}

/// Append `true` or `false`
pub fn write_bool(dst: &mut Vec<u8>, value: bool) {
    dst.extend_from_slice(if value { TRUE } else { FALSE });
}

/// Append a quoted, escaped JSON string.
///
/// Quotes, backslashes and control characters are always escaped, as are
/// U+2028 and U+2029. `escape_html` additionally escapes `<`, `>` and `&`.
pub fn write_str(dst: &mut Vec<u8>, value: &str, escape_html: bool) {
    let bytes = value.as_bytes();
    dst.push(b'"');

    let mut start = 0;
    for (i, ch) in value.char_indices() {
        let short: Option<&[u8]> = match ch {
            '"' => Some(b"\\\""),
            '\\' => Some(b"\\\\"),
            '\n' => Some(b"\\n"),
            '\r' => Some(b"\\r"),
            '\t' => Some(b"\\t"),
            '\u{8}' => Some(b"\\b"),
            '\u{c}' => Some(b"\\f"),
            _ => None,
        };
        let needs_unicode = (ch as u32) < 0x20
            || ch == '\u{2028}'
            || ch == '\u{2029}'
            || (escape_html && matches!(ch, '<' | '>' | '&'));

        if short.is_none() && !needs_unicode {
            continue;
        }

        dst.extend_from_slice(&bytes[start..i]);
        match short {
            Some(seq) => dst.extend_from_slice(seq),
            None => push_unicode_escape(dst, ch as u32),
        }
        start = i + ch.len_utf8();
    }

    dst.extend_from_slice(&bytes[start..]);
    dst.push(b'"');
}

/// Append a signed integer
pub fn write_i64(dst: &mut Vec<u8>, value: i64) {
    dst.extend_from_slice(value.to_string().as_bytes());
}

/// Append an unsigned integer
pub fn write_u64(dst: &mut Vec<u8>, value: u64) {
    dst.extend_from_slice(value.to_string().as_bytes());
}

/// Append a 128-bit signed integer
pub fn write_i128(dst: &mut Vec<u8>, value: i128) {
    dst.extend_from_slice(value.to_string().as_bytes());
}

/// Append a 128-bit unsigned integer
pub fn write_u128(dst: &mut Vec<u8>, value: u128) {
    dst.extend_from_slice(value.to_string().as_bytes());
}

/// Append a 64-bit float using the shortest round-trip digits.
///
/// Magnitudes below 1e-6 or from 1e21 up use exponent form (`1e+21`,
/// `1e-7`). NaN and infinities have no JSON form and are rejected.
pub fn write_f64(dst: &mut Vec<u8>, value: f64) -> Result<(), NonFiniteFloat> {
    if !value.is_finite() {
        return Err(NonFiniteFloat(value));
    }
    push_float(dst, value.abs(), value);
    Ok(())
}

/// Append a 32-bit float using the shortest digits that round-trip as `f32`
pub fn write_f32(dst: &mut Vec<u8>, value: f32) -> Result<(), NonFiniteFloat> {
    if !value.is_finite() {
        return Err(NonFiniteFloat(value as f64));
    }
    push_float(dst, (value as f64).abs(), value);
    Ok(())
}

fn push_float<F: Display + LowerExp>(dst: &mut Vec<u8>, abs: f64, value: F) {
    if abs != 0.0 && (abs < FLOAT_PLAIN_MIN || abs >= FLOAT_PLAIN_MAX) {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                dst.extend_from_slice(mantissa.as_bytes());
                dst.push(b'e');
                if !exponent.starts_with('-') {
                    dst.push(b'+');
                }
                dst.extend_from_slice(exponent.as_bytes());
            }
            None => dst.extend_from_slice(formatted.as_bytes()),
        }
    } else {
        dst.extend_from_slice(value.to_string().as_bytes());
    }
}
