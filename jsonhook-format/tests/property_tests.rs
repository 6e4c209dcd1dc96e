//! Property-based tests for scanning and compaction

use jsonhook_format::{compact, scan, valid, Limits};
use jsonhook_test_utils::arb_json_text as arb_json;
use proptest::prelude::*;
use serde_json::Value;

/// Re-serialize `value` with whitespace between every token
fn spaced(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(spaced).collect();
            format!("[ \n {} \t]", inner.join(" ,\r\n "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} :  {}", Value::String(k.clone()), spaced(v)))
                .collect();
            format!("{{\n  {}\n}}", inner.join(" ,  "))
        }
        other => other.to_string(),
    }
}

fn compacted(src: &[u8], escape_html: bool) -> Vec<u8> {
    let mut out = Vec::new();
    compact(&mut out, src, escape_html).expect("valid JSON");
    out
}

proptest! {
    #[test]
    fn compaction_is_idempotent(value in arb_json(), escape_html in any::<bool>()) {
        let pretty = serde_json::to_vec_pretty(&value).unwrap();
        let once = compacted(&pretty, escape_html);
        let twice = compacted(&once, escape_html);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn whitespace_variants_converge(value in arb_json()) {
        let pretty = serde_json::to_vec_pretty(&value).unwrap();
        let dense = serde_json::to_vec(&value).unwrap();
        let loose = spaced(&value).into_bytes();

        let expected = compacted(&dense, false);
        prop_assert_eq!(&compacted(&pretty, false), &expected);
        prop_assert_eq!(&compacted(&loose, false), &expected);
    }

    #[test]
    fn compaction_preserves_semantics(value in arb_json(), escape_html in any::<bool>()) {
        let pretty = serde_json::to_vec_pretty(&value).unwrap();
        let out = compacted(&pretty, escape_html);
        let reparsed: Value = serde_json::from_slice(&out).unwrap();
        prop_assert_eq!(reparsed, value);
    }

    #[test]
    fn compacted_output_has_no_whitespace_outside_strings(value in arb_json()) {
        let out = compacted(spaced(&value).as_bytes(), true);
        let mut in_string = false;
        let mut escaped = false;
        for &b in &out {
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
            } else if b == b'"' {
                in_string = true;
            } else {
                prop_assert!(!matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
            }
        }
    }

    #[test]
    fn scanner_agrees_with_serde_json(bytes in prop::collection::vec(
        prop::sample::select(b"{}[],:\"0123456789-+.eEtrufalsn \\".to_vec()), 0..24
    )) {
        let ours = valid(&bytes);
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(_) => prop_assert!(ours),
            // serde_json also rejects numbers outside the f64 range, which are valid text.
            Err(err) => prop_assert!(!ours || err.to_string().contains("out of range")),
        }
    }

    #[test]
    fn truncated_documents_are_rejected(value in arb_json(), cut in 0usize..64) {
        let dense = serde_json::to_vec(&value).unwrap();
        prop_assume!(cut < dense.len());
        let truncated = &dense[..cut];
        // A prefix of a number is itself a number, so only structured values qualify.
        prop_assume!(matches!(value, Value::Array(_) | Value::Object(_) | Value::String(_)));
        prop_assert!(scan::validate(truncated, &Limits::default()).is_err());
    }
}
