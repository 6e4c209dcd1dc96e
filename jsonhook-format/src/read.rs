//! Reader over validated JSON text
//!
//! The decoder validates a whole document before reading it, so the reader
//! assumes well-formed input. Methods still return `Result` rather than
//! panicking when that assumption does not hold.

use std::borrow::Cow;
use std::ops::Range;

use crate::error::SyntaxError;
use crate::limits::Limits;
use crate::types::ValueKind;

/// Cursor over a validated JSON document
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `input`
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// The complete input
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Current byte offset
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Skip insignificant whitespace
    pub fn skip_ws(&mut self) {
        while matches!(
            self.input.get(self.pos),
            Some(b' ' | b'\t' | b'\n' | b'\r')
        ) {
            self.pos += 1;
        }
    }

    /// Next significant byte, without consuming it
    pub fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.input.get(self.pos).copied()
    }

    /// Kind of the next value
    pub fn peek_kind(&mut self) -> Option<ValueKind> {
        self.peek().and_then(ValueKind::from_lead_byte)
    }

    /// Consume `byte` after optional whitespace
    pub fn expect(&mut self, byte: u8) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(SyntaxError::invalid_char(
                b,
                &format!("looking for {}", crate::error::quote_char(byte)),
                self.pos,
            )),
            None => Err(SyntaxError::unexpected_eof(self.input.len())),
        }
    }

    /// Consume `byte` if it is next
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip the next value and return its byte span
    pub fn skip_value(&mut self) -> Result<Range<usize>, SyntaxError> {
        self.skip_ws();
        let start = self.pos;
        let end = crate::scan::value_end(self.input, start, &Limits::unbounded())?;
        self.pos = end;
        Ok(start..end)
    }

    /// Consume `null` if it is next
    pub fn eat_null(&mut self) -> bool {
        if self.peek_kind() == Some(ValueKind::Null) {
            self.pos += crate::constants::NULL.len();
            true
        } else {
            false
        }
    }

    /// Read `true` or `false`
    pub fn read_bool(&mut self) -> Result<bool, SyntaxError> {
        match self.peek() {
            Some(b't') => {
                self.pos += crate::constants::TRUE.len();
                Ok(true)
            }
            Some(b'f') => {
                self.pos += crate::constants::FALSE.len();
                Ok(false)
            }
            Some(b) => Err(SyntaxError::invalid_char(b, "looking for boolean", self.pos)),
            None => Err(SyntaxError::unexpected_eof(self.input.len())),
        }
    }

    /// Read a numeric literal and return its text
    pub fn read_number(&mut self) -> Result<&'a str, SyntaxError> {
        self.skip_ws();
        let start = self.pos;
        while matches!(
            self.input.get(self.pos),
            Some(b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9')
        ) {
            self.pos += 1;
        }
        if start == self.pos {
            return match self.input.get(self.pos) {
                Some(&b) => Err(SyntaxError::invalid_char(
                    b,
                    "looking for beginning of value",
                    self.pos,
                )),
                None => Err(SyntaxError::unexpected_eof(self.input.len())),
            };
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| SyntaxError::new("invalid numeric literal", self.pos))
    }

    /// Read a string value, unescaping it.
    ///
    /// Strings without escapes are borrowed from the input. Invalid UTF-8 and
    /// unpaired surrogate escapes become U+FFFD.
    pub fn read_str(&mut self) -> Result<Cow<'a, str>, SyntaxError> {
        self.expect(b'"')?;
        let start = self.pos;

        let mut escaped = false;
        loop {
            match self.input.get(self.pos) {
                Some(b'"') => break,
                Some(b'\\') => {
                    escaped = true;
                    self.pos += 2;
                }
                Some(_) => self.pos += 1,
                None => return Err(SyntaxError::unexpected_eof(self.input.len())),
            }
        }
        let raw = &self.input[start..self.pos];
        self.pos += 1;

        if !escaped {
            return Ok(String::from_utf8_lossy(raw));
        }
        Ok(Cow::Owned(unescape(raw, start)?))
    }
}

fn unescape(raw: &[u8], base: usize) -> Result<String, SyntaxError> {
    let mut out: Vec<u8> = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let b = raw[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }

        let Some(&code) = raw.get(i + 1) else {
            return Err(SyntaxError::unexpected_eof(base + raw.len()));
        };
        i += 2;
        let simple = match code {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0c),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'u' => None,
            other => {
                return Err(SyntaxError::invalid_char(
                    other,
                    "in string escape code",
                    base + i - 1,
                ))
            }
        };
        if let Some(byte) = simple {
            out.push(byte);
            continue;
        }

        let first = hex4(raw, i, base)?;
        i += 4;
        let ch = if (0xD800..0xDC00).contains(&first) {
            // High surrogate; only a following low surrogate completes it.
            let low = if raw.get(i) == Some(&b'\\') && raw.get(i + 1) == Some(&b'u') {
                Some(hex4(raw, i + 2, base)?)
            } else {
                None
            };
            match low {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    i += 6;
                    let combined = 0x10000 + ((first - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER)
                }
                _ => char::REPLACEMENT_CHARACTER,
            }
        } else {
            char::from_u32(first).unwrap_or(char::REPLACEMENT_CHARACTER)
        };
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn hex4(raw: &[u8], at: usize, base: usize) -> Result<u32, SyntaxError> {
    let digits = raw
        .get(at..at + 4)
        .ok_or_else(|| SyntaxError::unexpected_eof(base + raw.len()))?;
    let mut value = 0u32;
    for (offset, &d) in digits.iter().enumerate() {
        let nibble = (d as char).to_digit(16).ok_or_else(|| {
            SyntaxError::invalid_char(d, "in \\u hexadecimal character escape", base + at + offset)
        })?;
        value = (value << 4) | nibble;
    }
    Ok(value)
}
