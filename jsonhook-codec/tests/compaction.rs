//! Compaction of marshal hook output

use jsonhook_codec::{
    encode, encode_into, encode_with, register_marshaler, CodecOptions, Encode, Encoder,
    FailureOrigin, HookError, Marshaler, RawMessage,
};
use jsonhook_test_utils::arb_json;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Mapping whose hook emits spaced separators
struct SpacedMap;

impl Marshaler for SpacedMap {
    fn marshal_json(&self) -> Result<Vec<u8>, HookError> {
        Ok(br#"{"a": "aValue", "b": "bValue"}"#.to_vec())
    }
}

register_marshaler!(SpacedMap);

/// Same mapping, pretty-printed
struct PrettyMap;

impl Marshaler for PrettyMap {
    fn marshal_json(&self) -> Result<Vec<u8>, HookError> {
        Ok(b"{\n  \"a\" : \"aValue\",\n\t\"b\":\r\n\"bValue\"\n}\n".to_vec())
    }
}

register_marshaler!(PrettyMap);

#[test]
fn spaced_hook_output_is_compacted() {
    let mut expected = BTreeMap::new();
    expected.insert("a".to_string(), "aValue".to_string());
    expected.insert("b".to_string(), "bValue".to_string());

    let out = encode(&SpacedMap).unwrap();
    assert_eq!(out, br#"{"a":"aValue","b":"bValue"}"#);
    assert_eq!(out, encode(&expected).unwrap());
}

#[test]
fn whitespace_variants_produce_identical_output() {
    assert_eq!(encode(&SpacedMap).unwrap(), encode(&PrettyMap).unwrap());
}

#[test]
fn compaction_can_be_disabled() {
    let opts = CodecOptions::default().with_compact_hook_output(false);
    assert_eq!(
        encode_with(&PrettyMap, &opts).unwrap(),
        b"{\n  \"a\" : \"aValue\",\n\t\"b\":\r\n\"bValue\"\n}"
    );

    let err = encode_with(&RawMessage::from("[1,"), &opts).unwrap_err();
    assert_eq!(
        err.as_marshaler_error().unwrap().origin(),
        FailureOrigin::Compaction
    );
}

#[test]
fn hook_output_strings_are_html_escaped() {
    let raw = RawMessage::from(r#"{"html": "<a href='x'>&</a>"}"#);
    let escaped = String::from_utf8(encode(&raw).unwrap()).unwrap();
    assert!(!escaped.contains('<'));
    assert!(!escaped.contains('&'));
    assert!(escaped.contains("\\u003ca href='x'\\u003e\\u0026\\u003c/a\\u003e"));

    let opts = CodecOptions::default().with_escape_html(false);
    assert_eq!(
        encode_with(&raw, &opts).unwrap(),
        br#"{"html":"<a href='x'>&</a>"}"#
    );
}

/// Record with a valid field, then a hook that fails or emits bad JSON
struct Record {
    ok: SpacedMap,
    bad: RawMessage,
}

impl Encode for Record {
    fn encode(&self, enc: &mut Encoder<'_>) -> jsonhook_codec::Result<()> {
        let mut obj = enc.object()?;
        obj.field("ok", &self.ok)?;
        obj.field("bad", &self.bad)?;
        obj.end()
    }
}

#[test]
fn failing_field_leaves_no_partial_output() {
    let record = Record {
        ok: SpacedMap,
        bad: RawMessage::from(r#"{"a": "aValue","#),
    };

    let mut buf = b"[".to_vec();
    let err = encode_into(&record, &mut buf, &CodecOptions::default()).unwrap_err();
    assert_eq!(buf, b"[");
    assert_eq!(err.as_marshaler_error().unwrap().path(), "$.bad");
}

#[test]
fn failing_element_is_rolled_back_within_its_container() {
    // An element writer that swallows the failure keeps only complete elements
    struct Lenient(Vec<RawMessage>);

    impl Encode for Lenient {
        fn encode(&self, enc: &mut Encoder<'_>) -> jsonhook_codec::Result<()> {
            let mut arr = enc.array()?;
            for item in &self.0 {
                let _ = arr.element(item);
            }
            arr.end()
        }
    }

    let value = Lenient(vec![
        RawMessage::from(" 1 "),
        RawMessage::from("{\"x\": "),
        RawMessage::from(" [2] "),
    ]);
    assert_eq!(encode(&value).unwrap(), b"[1,[2]]");
}

#[test]
fn failing_nested_container_releases_its_depth() {
    struct LenientRows(Vec<Vec<RawMessage>>);

    impl Encode for LenientRows {
        fn encode(&self, enc: &mut Encoder<'_>) -> jsonhook_codec::Result<()> {
            let mut arr = enc.array()?;
            for row in &self.0 {
                let _ = arr.element(row);
            }
            arr.end()
        }
    }

    let value = LenientRows(vec![
        vec![RawMessage::from("{")],
        vec![RawMessage::from("1")],
        vec![RawMessage::from("2")],
    ]);
    let opts = CodecOptions::default().with_max_depth(2);
    assert_eq!(encode_with(&value, &opts).unwrap(), b"[[1],[2]]");
}

proptest! {
    #[test]
    fn pretty_and_compact_hook_output_agree(value in arb_json()) {
        let compact = RawMessage::new(serde_json::to_vec(&value).unwrap());
        let pretty = RawMessage::new(serde_json::to_vec_pretty(&value).unwrap());
        prop_assert_eq!(encode(&compact).unwrap(), encode(&pretty).unwrap());
    }

    #[test]
    fn hook_output_matches_structural_encoding(value in arb_json()) {
        let pretty = RawMessage::new(serde_json::to_vec_pretty(&value).unwrap());
        prop_assert_eq!(encode(&pretty).unwrap(), encode(&value).unwrap());
    }
}
