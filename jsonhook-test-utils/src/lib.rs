//! jsonhook Test Utilities
//!
//! Hook fixtures shared by the jsonhook test suites: types whose hooks fail,
//! emit oddly formatted or invalid JSON, or record what they are given.

use jsonhook_codec::{
    register_marshaler, register_unmarshaler, Decode, Decoder, Encode, Encoder, HookError,
    Marshaler, TextMarshaler, TextUnmarshaler, Unmarshaler,
};
use proptest::prelude::*;
use serde_json::Value;

/// Error raised by the failing fixtures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error: {msg}")]
pub struct FixtureError {
    /// Message supplied by the fixture
    pub msg: String,
}

impl FixtureError {
    /// Boxed fixture error with `msg`
    pub fn boxed(msg: &str) -> HookError {
        Box::new(Self {
            msg: msg.to_string(),
        })
    }
}

/// Type whose marshal and unmarshal hooks always fail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailingDoc;

impl Marshaler for FailingDoc {
    fn marshal_json(&self) -> Result<Vec<u8>, HookError> {
        Err(FixtureError::boxed("syntax error"))
    }
}

impl Unmarshaler for FailingDoc {
    fn unmarshal_json(&mut self, _raw: &[u8]) -> Result<(), HookError> {
        Err(FixtureError::boxed("syntax error"))
    }
}

register_marshaler!(FailingDoc);
register_unmarshaler!(FailingDoc);

/// Value whose marshal hook pretty-prints it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacedValue(pub Value);

impl Marshaler for SpacedValue {
    fn marshal_json(&self) -> Result<Vec<u8>, HookError> {
        Ok(serde_json::to_vec_pretty(&self.0)?)
    }
}

register_marshaler!(SpacedValue);

/// Type whose marshal hook returns fixed bytes, valid or not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GarbageDoc(pub Vec<u8>);

impl GarbageDoc {
    /// Fixture returning `text`
    pub fn new(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl Marshaler for GarbageDoc {
    fn marshal_json(&self) -> Result<Vec<u8>, HookError> {
        Ok(self.0.clone())
    }
}

register_marshaler!(GarbageDoc);

/// Unmarshal hook that keeps every span it receives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingUnmarshaler {
    /// Spans in call order
    pub seen: Vec<Vec<u8>>,
}

impl Unmarshaler for RecordingUnmarshaler {
    fn unmarshal_json(&mut self, raw: &[u8]) -> Result<(), HookError> {
        self.seen.push(raw.to_vec());
        Ok(())
    }
}

register_unmarshaler!(RecordingUnmarshaler);

/// Text hooks that upper-case on encode and reject lower-case on decode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upper(pub String);

impl TextMarshaler for Upper {
    fn marshal_text(&self) -> Result<String, HookError> {
        Ok(self.0.to_uppercase())
    }
}

impl TextUnmarshaler for Upper {
    fn unmarshal_text(&mut self, text: &str) -> Result<(), HookError> {
        if text.chars().any(char::is_lowercase) {
            return Err(FixtureError::boxed("lower-case text"));
        }
        self.0 = text.to_string();
        Ok(())
    }
}

register_marshaler!(Upper, text);
register_unmarshaler!(Upper, text);

/// Record with an id and a body that may carry hooks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope<T> {
    /// Record id
    pub id: u64,
    /// Record body
    pub body: T,
}

impl<T> Envelope<T> {
    /// Record `id` wrapping `body`
    pub fn new(id: u64, body: T) -> Self {
        Self { id, body }
    }
}

impl<T: Encode> Encode for Envelope<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> jsonhook_codec::Result<()> {
        let mut obj = enc.object()?;
        obj.field("id", &self.id)?;
        obj.field("body", &self.body)?;
        obj.end()
    }
}

impl<T: Decode> Decode for Envelope<T> {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> jsonhook_codec::Result<()> {
        dec.object(|key, dec| match key {
            "id" => dec.decode_value(&mut self.id).map(|()| true),
            "body" => dec.decode_value(&mut self.body).map(|()| true),
            _ => Ok(false),
        })
    }
}

/// Equivalent renderings of `value` that differ only in whitespace
pub fn whitespace_variants(value: &Value) -> Vec<Vec<u8>> {
    let compact = serde_json::to_vec(value).unwrap_or_default();
    let pretty = serde_json::to_vec_pretty(value).unwrap_or_default();
    let mut padded = b" \n\t".to_vec();
    padded.extend_from_slice(&pretty);
    padded.extend_from_slice(b"\r\n ");
    vec![compact, pretty, padded]
}

/// Arbitrary JSON values of bounded size
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[ -~]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,6}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Arbitrary JSON values whose text also carries floats, escapes and
/// non-ASCII line separators
pub fn arb_json_text() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[ a-zA-Z0-9<>&\"\\\\/\n\t\u{e9}\u{2028}]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}
