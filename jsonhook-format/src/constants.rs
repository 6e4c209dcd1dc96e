//! Constants shared by the scanner, compactor and writers

/// Default maximum nesting depth of arrays and objects
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Literal `null`
pub const NULL: &[u8] = b"null";
/// Literal `true`
pub const TRUE: &[u8] = b"true";
/// Literal `false`
pub const FALSE: &[u8] = b"false";

/// Lowercase hex digits used in `\u` escapes
pub const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Smallest magnitude formatted without an exponent
pub const FLOAT_PLAIN_MIN: f64 = 1e-6;
/// Magnitude from which floats switch to exponent notation
pub const FLOAT_PLAIN_MAX: f64 = 1e21;

/// Message reported when input ends inside a value
pub const MSG_UNEXPECTED_EOF: &str = "unexpected end of JSON input";
/// Message reported when nesting exceeds the configured depth
pub const MSG_MAX_DEPTH: &str = "exceeded max depth";
