//! Pre-encoded JSON carried through the engine as-is

use std::ops::Deref;

use crate::hook::{HookError, Marshaler, Unmarshaler};

/// Raw JSON bytes.
///
/// Encoding splices the bytes in (compacted like any marshal hook output);
/// an empty message encodes as `null`. Decoding stores a copy of the value's
/// span, whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawMessage(Vec<u8>);

impl RawMessage {
    /// Wrap bytes that are expected to hold one JSON value
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unwrap into the raw bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for RawMessage {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for RawMessage {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for RawMessage {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl Marshaler for RawMessage {
    fn marshal_json(&self) -> Result<Vec<u8>, HookError> {
        if self.0.is_empty() {
            return Ok(jsonhook_format::constants::NULL.to_vec());
        }
        Ok(self.0.clone())
    }
}

impl Unmarshaler for RawMessage {
    fn unmarshal_json(&mut self, raw: &[u8]) -> Result<(), HookError> {
        self.0.clear();
        self.0.extend_from_slice(raw);
        Ok(())
    }
}

crate::register_marshaler!(RawMessage);
crate::register_unmarshaler!(RawMessage);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureOrigin;
    use crate::{decode, encode};
    use std::collections::BTreeMap;

    #[test]
    fn test_encode_compacts() {
        let raw = RawMessage::from(r#" { "a" : 1 } "#);
        assert_eq!(encode(&raw).unwrap(), br#"{"a":1}"#);
        assert_eq!(encode(&RawMessage::default()).unwrap(), b"null");
    }

    #[test]
    fn test_invalid_bytes_fail_compaction() {
        let err = encode(&RawMessage::from("{")).unwrap_err();
        assert_eq!(
            err.as_marshaler_error().map(|e| e.origin()),
            Some(FailureOrigin::Compaction)
        );
    }

    #[test]
    fn test_decode_keeps_span() {
        let mut fields: BTreeMap<String, RawMessage> = BTreeMap::new();
        decode(br#"{"a": [1, 2 ], "b": "x"}"#, &mut fields).unwrap();
        assert_eq!(fields["a"].as_bytes(), b"[1, 2 ]");
        assert_eq!(&*fields["b"], br#""x""#);
    }
}
