//! Error types for jsonhook format primitives

use thiserror::Error;

use crate::constants::MSG_UNEXPECTED_EOF;

/// Malformed JSON text.
///
/// `offset` counts the bytes consumed when the problem was detected, so an
/// invalid character at index `i` reports `i + 1` and truncated input reports
/// the input length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{msg}")]
pub struct SyntaxError {
    msg: String,
    offset: usize,
}

impl SyntaxError {
    /// Build a syntax error with an explicit message
    pub fn new(msg: impl Into<String>, offset: usize) -> Self {
        Self {
            msg: msg.into(),
            offset,
        }
    }

    /// Invalid character `byte` found at index `at` in the given context
    pub fn invalid_char(byte: u8, context: &str, at: usize) -> Self {
        Self::new(
            format!("invalid character {} {}", quote_char(byte), context),
            at + 1,
        )
    }

    /// Input ended before the value was complete
    pub fn unexpected_eof(len: usize) -> Self {
        Self::new(MSG_UNEXPECTED_EOF, len)
    }

    /// Human-readable description, without offset
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Number of bytes consumed when the error was detected
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// A float that has no JSON representation (NaN or an infinity)
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("unsupported value: {}", float_name(.0))]
pub struct NonFiniteFloat(pub f64);

impl NonFiniteFloat {
    /// `NaN`, `-Inf` or `+Inf`
    pub fn name(&self) -> &'static str {
        float_name(&self.0)
    }
}

fn float_name(value: &f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_negative() {
        "-Inf"
    } else {
        "+Inf"
    }
}

/// Render a byte for an error message: `'x'`, `'\''`, `'\n'`, `'\x01'`
pub fn quote_char(byte: u8) -> String {
    match byte {
        b'\'' => "'\\''".to_string(),
        b'"' => "'\"'".to_string(),
        b'\n' => "'\\n'".to_string(),
        b'\r' => "'\\r'".to_string(),
        b'\t' => "'\\t'".to_string(),
        0x20..=0x7e => format!("'{}'", byte as char),
        0x00..=0x1f | 0x7f => format!("'\\x{:02x}'", byte),
        _ => format!("'{}'", char::from(byte)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_char_message_and_offset() {
        let err = SyntaxError::invalid_char(b'x', "looking for beginning of value", 3);
        assert_eq!(
            err.to_string(),
            "invalid character 'x' looking for beginning of value"
        );
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_quote_char_escapes() {
        assert_eq!(quote_char(b'\''), "'\\''");
        assert_eq!(quote_char(b'"'), "'\"'");
        assert_eq!(quote_char(b'\n'), "'\\n'");
        assert_eq!(quote_char(0x01), "'\\x01'");
        assert_eq!(quote_char(b'}'), "'}'");
    }

    #[test]
    fn test_non_finite_display() {
        assert_eq!(NonFiniteFloat(f64::NAN).to_string(), "unsupported value: NaN");
        assert_eq!(
            NonFiniteFloat(f64::INFINITY).to_string(),
            "unsupported value: +Inf"
        );
        assert_eq!(
            NonFiniteFloat(f64::NEG_INFINITY).to_string(),
            "unsupported value: -Inf"
        );
    }
}
