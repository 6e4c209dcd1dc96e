//! Validating scanner for JSON text
//!
//! The scanner walks one value iteratively, keeping open containers on an
//! explicit stack so that deeply nested input cannot exhaust the call stack.
//! Every token it accepts is forwarded to a [`Sink`]; validation uses a sink
//! that discards, compaction uses one that copies tokens into a buffer.

use smallvec::SmallVec;

use crate::constants::{FALSE, MSG_MAX_DEPTH, NULL, TRUE};
use crate::error::SyntaxError;
use crate::limits::Limits;

/// Receiver for the significant tokens of a scanned value
pub(crate) trait Sink {
    /// Structural character, number or literal, copied verbatim
    fn token(&mut self, bytes: &[u8]);
    /// Complete string token including both quotes
    fn string(&mut self, raw: &[u8]);
}

/// Sink that drops every token
pub(crate) struct Discard;

impl Sink for Discard {
    fn token(&mut self, _bytes: &[u8]) {}
    fn string(&mut self, _raw: &[u8]) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// Scanner over a byte slice
pub(crate) struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    max_depth: usize,
    stack: SmallVec<[Container; 32]>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a [u8], limits: &Limits) -> Self {
        Self::at(input, 0, limits)
    }

    pub(crate) fn at(input: &'a [u8], pos: usize, limits: &Limits) -> Self {
        Self {
            input,
            pos,
            max_depth: limits.max_depth,
            stack: SmallVec::new(),
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Scan a whole document: one value surrounded by optional whitespace
    pub(crate) fn scan_document<S: Sink>(&mut self, sink: &mut S) -> Result<(), SyntaxError> {
        self.scan_value(sink)?;
        self.skip_ws();
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(SyntaxError::invalid_char(
                c,
                "after top-level value",
                self.pos,
            )),
        }
    }

    /// Scan exactly one value, leaving the position just past it
    pub(crate) fn scan_value<S: Sink>(&mut self, sink: &mut S) -> Result<(), SyntaxError> {
        self.stack.clear();

        'value: loop {
            self.skip_ws();
            let Some(c) = self.peek() else {
                return Err(self.eof());
            };

            match c {
                b'{' => {
                    self.push(Container::Object)?;
                    self.pos += 1;
                    sink.token(b"{");
                    self.skip_ws();
                    match self.peek() {
                        Some(b'}') => {
                            self.pos += 1;
                            sink.token(b"}");
                            self.stack.pop();
                        }
                        Some(b'"') => {
                            self.scan_key(sink)?;
                            continue 'value;
                        }
                        Some(c) => {
                            return Err(SyntaxError::invalid_char(
                                c,
                                "looking for beginning of object key string",
                                self.pos,
                            ))
                        }
                        None => return Err(self.eof()),
                    }
                }
                b'[' => {
                    self.push(Container::Array)?;
                    self.pos += 1;
                    sink.token(b"[");
                    self.skip_ws();
                    match self.peek() {
                        Some(b']') => {
                            self.pos += 1;
                            sink.token(b"]");
                            self.stack.pop();
                        }
                        Some(_) => continue 'value,
                        None => return Err(self.eof()),
                    }
                }
                b'"' => self.scan_string(sink)?,
                b'-' | b'0'..=b'9' => self.scan_number(sink)?,
                b't' => self.scan_literal(TRUE, "true", sink)?,
                b'f' => self.scan_literal(FALSE, "false", sink)?,
                b'n' => self.scan_literal(NULL, "null", sink)?,
                c => {
                    return Err(SyntaxError::invalid_char(
                        c,
                        "looking for beginning of value",
                        self.pos,
                    ))
                }
            }

            // A value just completed; close containers until one wants more.
            loop {
                let Some(&top) = self.stack.last() else {
                    return Ok(());
                };
                self.skip_ws();
                let Some(c) = self.peek() else {
                    return Err(self.eof());
                };

                match (top, c) {
                    (Container::Object, b',') => {
                        self.pos += 1;
                        sink.token(b",");
                        self.skip_ws();
                        match self.peek() {
                            Some(b'"') => {
                                self.scan_key(sink)?;
                                continue 'value;
                            }
                            Some(c) => {
                                return Err(SyntaxError::invalid_char(
                                    c,
                                    "looking for beginning of object key string",
                                    self.pos,
                                ))
                            }
                            None => return Err(self.eof()),
                        }
                    }
                    (Container::Object, b'}') => {
                        self.pos += 1;
                        sink.token(b"}");
                        self.stack.pop();
                    }
                    (Container::Object, c) => {
                        return Err(SyntaxError::invalid_char(
                            c,
                            "after object key:value pair",
                            self.pos,
                        ))
                    }
                    (Container::Array, b',') => {
                        self.pos += 1;
                        sink.token(b",");
                        continue 'value;
                    }
                    (Container::Array, b']') => {
                        self.pos += 1;
                        sink.token(b"]");
                        self.stack.pop();
                    }
                    (Container::Array, c) => {
                        return Err(SyntaxError::invalid_char(
                            c,
                            "after array element",
                            self.pos,
                        ))
                    }
                }
            }
        }
    }

    fn push(&mut self, container: Container) -> Result<(), SyntaxError> {
        if self.stack.len() >= self.max_depth {
            return Err(SyntaxError::new(MSG_MAX_DEPTH, self.pos));
        }
        self.stack.push(container);
        Ok(())
    }

    fn scan_key<S: Sink>(&mut self, sink: &mut S) -> Result<(), SyntaxError> {
        self.scan_string(sink)?;
        self.skip_ws();
        match self.peek() {
            Some(b':') => {
                self.pos += 1;
                sink.token(b":");
                Ok(())
            }
            Some(c) => Err(SyntaxError::invalid_char(c, "after object key", self.pos)),
            None => Err(self.eof()),
        }
    }

    fn scan_string<S: Sink>(&mut self, sink: &mut S) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 1;

        loop {
            let Some(c) = self.peek() else {
                return Err(self.eof());
            };
            match c {
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                            self.pos += 1;
                        }
                        Some(b'u') => {
                            self.pos += 1;
                            for _ in 0..4 {
                                match self.peek() {
                                    Some(h) if h.is_ascii_hexdigit() => self.pos += 1,
                                    Some(h) => {
                                        return Err(SyntaxError::invalid_char(
                                            h,
                                            "in \\u hexadecimal character escape",
                                            self.pos,
                                        ))
                                    }
                                    None => return Err(self.eof()),
                                }
                            }
                        }
                        Some(e) => {
                            return Err(SyntaxError::invalid_char(
                                e,
                                "in string escape code",
                                self.pos,
                            ))
                        }
                        None => return Err(self.eof()),
                    }
                }
                c if c < 0x20 => {
                    return Err(SyntaxError::invalid_char(c, "in string literal", self.pos))
                }
                _ => self.pos += 1,
            }
        }

        sink.string(&self.input[start..self.pos]);
        Ok(())
    }

    fn scan_number<S: Sink>(&mut self, sink: &mut S) -> Result<(), SyntaxError> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.skip_digits(),
            Some(c) => {
                return Err(SyntaxError::invalid_char(
                    c,
                    "in numeric literal",
                    self.pos,
                ))
            }
            None => return Err(self.eof()),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            match self.peek() {
                Some(b'0'..=b'9') => self.skip_digits(),
                Some(c) => {
                    return Err(SyntaxError::invalid_char(
                        c,
                        "after decimal point in numeric literal",
                        self.pos,
                    ))
                }
                None => return Err(self.eof()),
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            match self.peek() {
                Some(b'0'..=b'9') => self.skip_digits(),
                Some(c) => {
                    return Err(SyntaxError::invalid_char(
                        c,
                        "in exponent of numeric literal",
                        self.pos,
                    ))
                }
                None => return Err(self.eof()),
            }
        }

        sink.token(&self.input[start..self.pos]);
        Ok(())
    }

    fn scan_literal<S: Sink>(
        &mut self,
        literal: &'static [u8],
        name: &str,
        sink: &mut S,
    ) -> Result<(), SyntaxError> {
        for &expected in literal {
            match self.peek() {
                Some(c) if c == expected => self.pos += 1,
                Some(c) => {
                    return Err(SyntaxError::invalid_char(
                        c,
                        &format!(
                            "in literal {} (expecting {})",
                            name,
                            crate::error::quote_char(expected)
                        ),
                        self.pos,
                    ))
                }
                None => return Err(self.eof()),
            }
        }
        sink.token(literal);
        Ok(())
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    pub(crate) fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eof(&self) -> SyntaxError {
        SyntaxError::unexpected_eof(self.input.len())
    }
}

/// Check that `input` holds exactly one JSON value
pub fn validate(input: &[u8], limits: &Limits) -> Result<(), SyntaxError> {
    Scanner::new(input, limits).scan_document(&mut Discard)
}

/// Offset just past the single value starting at (or after whitespace from) `start`
pub fn value_end(input: &[u8], start: usize, limits: &Limits) -> Result<usize, SyntaxError> {
    let mut scanner = Scanner::at(input, start, limits);
    scanner.scan_value(&mut Discard)?;
    Ok(scanner.pos())
}
