//! Independent calls sharing options across threads

use jsonhook_codec::{
    decode_with, encode_with, CodecOptions, Error, ErrorShape, RawMessage, ReconstructedError,
};
use jsonhook_test_utils::{
    Envelope, FailingDoc, FixtureError, RecordingUnmarshaler, SpacedValue, Upper,
};
use serde_json::json;
use std::thread;

const THREADS: u64 = 8;
const ROUNDS: usize = 25;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn shared_types_are_send_and_sync() {
    assert_send_sync::<CodecOptions>();
    assert_send_sync::<Error>();
    assert_send_sync::<RawMessage>();
}

#[derive(Debug, PartialEq)]
struct Outcome {
    encoded: Vec<u8>,
    text: Vec<u8>,
    spans: Vec<Vec<u8>>,
    failure: String,
}

fn run(id: u64, opts: &CodecOptions) -> Outcome {
    let body = SpacedValue(json!({"n": id, "tags": ["a", "<b>"], "nested": {"k": [1, 2]}}));
    let encoded = encode_with(&Envelope::new(id, body), opts).unwrap();
    let text = encode_with(&Envelope::new(id, Upper(format!("id-{id}"))), opts).unwrap();

    let mut recorded = Envelope::<RecordingUnmarshaler>::default();
    decode_with(&encoded, &mut recorded, opts).unwrap();
    assert_eq!(recorded.id, id);

    let input = format!(r#"{{"id": {id}, "body": {{"key": "value"}}}}"#);
    let mut failing = Envelope::<FailingDoc>::default();
    let failure = decode_with(input.as_bytes(), &mut failing, opts)
        .unwrap_err()
        .to_string();

    Outcome {
        encoded,
        text,
        spans: recorded.body.seen,
        failure,
    }
}

#[test]
fn parallel_calls_match_sequential_results() {
    for opts in [
        CodecOptions::default(),
        CodecOptions::default()
            .with_preserve_error_identity(false)
            .with_escape_html(false),
    ] {
        let expected: Vec<Outcome> = (0..THREADS).map(|id| run(id, &opts)).collect();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|id| {
                    let opts = &opts;
                    scope.spawn(move || (0..ROUNDS).map(|_| run(id, opts)).collect::<Vec<_>>())
                })
                .collect();

            for (id, handle) in handles.into_iter().enumerate() {
                for outcome in handle.join().unwrap() {
                    assert_eq!(outcome, expected[id]);
                }
            }
        });
    }
}

#[test]
fn parallel_failures_keep_their_shape() {
    let direct = CodecOptions::default();
    let rebuilt = CodecOptions::default().with_preserve_error_identity(false);
    thread::scope(|scope| {
        for id in 0..THREADS {
            let (direct, rebuilt) = (&direct, &rebuilt);
            scope.spawn(move || {
                let input = format!(r#"[{{"id": {id}}}]"#);
                for _ in 0..ROUNDS {
                    let mut docs: Vec<FailingDoc> = Vec::new();
                    let err = decode_with(input.as_bytes(), &mut docs, direct).unwrap_err();
                    assert_eq!(err.shape(), ErrorShape::Direct);
                    assert!(err.downcast_ref::<FixtureError>().is_some());

                    let err = decode_with(input.as_bytes(), &mut docs, rebuilt).unwrap_err();
                    assert!(err.is::<ReconstructedError>());
                    assert!(err.to_string().contains(&input));
                }
            });
        }
    });
}
