//! Error propagation through marshal and unmarshal hooks

use jsonhook_codec::{
    decode, decode_with, encode, encode_with, register_marshaler, register_unmarshaler,
    CodecOptions, Decode, Decoder, Encode, Encoder, Error, ErrorShape, FailureOrigin, HookError,
    HookKind, Marshaler, MarshalerError, ReconstructedError, SyntaxError, TextMarshaler,
    TextUnmarshaler, Unmarshaler,
};
use jsonhook_test_utils::{FailingDoc, FixtureError};
use std::cell::Cell;

fn hook_error() -> HookError {
    FixtureError::boxed("syntax error")
}

#[test]
fn decode_hook_error_is_returned_unchanged() {
    let mut doc = FailingDoc;
    let err = decode(br#"{"key": "value"}"#, &mut doc).unwrap_err();

    assert_eq!(err.shape(), ErrorShape::Direct);
    let found = err.find::<FixtureError>().expect("cause reachable");
    assert_eq!(found.msg, "syntax error");
    assert!(err.downcast_ref::<FixtureError>().is_some());
    assert_eq!(err.to_string(), "syntax error: syntax error");

    let original = err.into_hook_error().unwrap();
    assert!(original.downcast_ref::<FixtureError>().is_some());
}

#[test]
fn encode_hook_error_is_enveloped() {
    let err = encode(&FailingDoc).unwrap_err();

    assert_eq!(err.shape(), ErrorShape::Enveloped);
    assert!(err.find::<FixtureError>().is_some());
    assert!(err.downcast_ref::<FixtureError>().is_none());
    assert!(err.downcast_ref::<MarshalerError>().is_some());

    let envelope = err.as_marshaler_error().unwrap();
    assert_eq!(envelope.hook(), HookKind::MarshalJson);
    assert_eq!(envelope.origin(), FailureOrigin::Hook);
    assert!(envelope.type_name().ends_with("FailingDoc"));
    assert!(err
        .to_string()
        .starts_with("error calling marshal_json for type "));
    assert!(err.to_string().ends_with(": syntax error: syntax error"));
}

#[test]
fn identity_fallback_rebuilds_decode_errors() {
    let opts = CodecOptions::default().with_preserve_error_identity(false);
    let mut doc = FailingDoc;
    let err = decode_with(br#"{"key": "value"}"#, &mut doc, &opts).unwrap_err();

    assert_eq!(err.shape(), ErrorShape::Reconstructed);
    assert!(err.find::<FixtureError>().is_none());
    assert!(err.is::<ReconstructedError>());
    assert_eq!(
        err.to_string(),
        r#"unmarshalerDecoder: syntax error: syntax error, error found in #10 byte of ...|: "value"}|..., bigger context ...|{"key": "value"}|..."#
    );
}

#[test]
fn identity_fallback_does_not_change_encode() {
    let opts = CodecOptions::default().with_preserve_error_identity(false);
    let err = encode_with(&FailingDoc, &opts).unwrap_err();
    assert_eq!(err.shape(), ErrorShape::Enveloped);
    assert!(err.find::<FixtureError>().is_some());
}

/// Container placing the failing type at a nested position
#[derive(Default)]
struct Envelope {
    items: Vec<Item>,
}

#[derive(Default)]
struct Item {
    name: String,
    doc: Option<FailingDoc>,
}

impl Encode for Envelope {
    fn encode(&self, enc: &mut Encoder<'_>) -> jsonhook_codec::Result<()> {
        let mut obj = enc.object()?;
        obj.field("items", &self.items)?;
        obj.end()
    }
}

impl Decode for Envelope {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> jsonhook_codec::Result<()> {
        dec.object(|key, dec| match key {
            "items" => dec.decode_value(&mut self.items).map(|()| true),
            _ => Ok(false),
        })
    }
}

impl Encode for Item {
    fn encode(&self, enc: &mut Encoder<'_>) -> jsonhook_codec::Result<()> {
        let mut obj = enc.object()?;
        obj.field("name", &self.name)?;
        obj.field_if_some("doc", &self.doc)?;
        obj.end()
    }
}

impl Decode for Item {
    fn decode(&mut self, dec: &mut Decoder<'_>) -> jsonhook_codec::Result<()> {
        dec.object(|key, dec| match key {
            "name" => dec.decode_value(&mut self.name).map(|()| true),
            "doc" => dec.decode_value(&mut self.doc).map(|()| true),
            _ => Ok(false),
        })
    }
}

#[test]
fn nested_encode_failure_carries_path() {
    let value = Envelope {
        items: vec![
            Item {
                name: "a".to_string(),
                doc: None,
            },
            Item {
                name: "b".to_string(),
                doc: Some(FailingDoc),
            },
        ],
    };
    let err = encode(&value).unwrap_err();
    assert_eq!(err.as_marshaler_error().unwrap().path(), "$.items[1].doc");
    assert!(err.find::<FixtureError>().is_some());
}

#[test]
fn nested_decode_failure_keeps_identity() {
    let input = br#"{"items": [{"name": "a"}, {"name": "b", "doc": {"key": "value"}}]}"#;
    let mut value = Envelope::default();
    let err = decode(input, &mut value).unwrap_err();
    assert_eq!(err.shape(), ErrorShape::Direct);
    assert!(err.downcast_ref::<FixtureError>().is_some());
}

#[test]
fn invalid_hook_output_is_enveloped_syntax_error() {
    struct Unterminated;

    impl Marshaler for Unterminated {
        fn marshal_json(&self) -> Result<Vec<u8>, HookError> {
            Ok(br#"{"a": "aValue""#.to_vec())
        }
    }

    register_marshaler!(Unterminated);

    let err = encode(&Unterminated).unwrap_err();
    let envelope = err.as_marshaler_error().unwrap();
    assert_eq!(envelope.origin(), FailureOrigin::Compaction);
    let syntax = err.find::<SyntaxError>().expect("syntax error reachable");
    assert_eq!(syntax.message(), "unexpected end of JSON input");
}

#[test]
fn syntax_errors_surface_before_hooks_run() {
    thread_local! {
        static CALLS: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Default)]
    struct Counting;

    impl Unmarshaler for Counting {
        fn unmarshal_json(&mut self, _raw: &[u8]) -> Result<(), HookError> {
            CALLS.with(|calls| calls.set(calls.get() + 1));
            Ok(())
        }
    }

    register_unmarshaler!(Counting);

    let mut values: Vec<Counting> = Vec::new();
    let err = decode(b"[{}, {}, ]", &mut values).unwrap_err();
    assert!(matches!(err, Error::Syntax(_)));
    assert_eq!(CALLS.with(Cell::get), 0);

    decode(b"[{}, {}]", &mut values).unwrap();
    assert_eq!(CALLS.with(Cell::get), 2);
}

/// Text hooks fail with the same shapes as JSON hooks
#[derive(Debug, Default)]
struct Label(String);

impl TextMarshaler for Label {
    fn marshal_text(&self) -> Result<String, HookError> {
        if self.0.is_empty() {
            return Err(hook_error());
        }
        Ok(self.0.to_uppercase())
    }
}

impl TextUnmarshaler for Label {
    fn unmarshal_text(&mut self, text: &str) -> Result<(), HookError> {
        if text.is_empty() {
            return Err(hook_error());
        }
        self.0 = text.to_lowercase();
        Ok(())
    }
}

register_marshaler!(Label, text);
register_unmarshaler!(Label, text);

#[test]
fn text_hooks_follow_the_same_shapes() {
    assert_eq!(encode(&Label("ok".to_string())).unwrap(), br#""OK""#);
    let err = encode(&Label::default()).unwrap_err();
    assert_eq!(err.shape(), ErrorShape::Enveloped);
    assert_eq!(err.as_marshaler_error().unwrap().hook(), HookKind::MarshalText);

    let mut label = Label::default();
    decode(br#""MiXeD""#, &mut label).unwrap();
    assert_eq!(label.0, "mixed");

    let err = decode(br#""""#, &mut label).unwrap_err();
    assert_eq!(err.shape(), ErrorShape::Direct);
    assert!(err.downcast_ref::<FixtureError>().is_some());

    let err = decode(b"12", &mut label).unwrap_err();
    assert!(matches!(err, Error::Type(_)));

    decode(b"null", &mut label).unwrap();
    assert_eq!(label.0, "mixed");
}
