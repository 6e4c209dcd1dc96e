//! JSON value kinds

/// Kind of a JSON value, derived from its first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// Numeric literal
    Number,
    /// Quoted string
    String,
    /// Array
    Array,
    /// Object
    Object,
}

impl ValueKind {
    /// Classify a value by its leading byte
    pub fn from_lead_byte(byte: u8) -> Option<Self> {
        match byte {
            b'n' => Some(ValueKind::Null),
            b't' | b'f' => Some(ValueKind::Bool),
            b'-' | b'0'..=b'9' => Some(ValueKind::Number),
            b'"' => Some(ValueKind::String),
            b'[' => Some(ValueKind::Array),
            b'{' => Some(ValueKind::Object),
            _ => None,
        }
    }

    /// Name used in type mismatch messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}
