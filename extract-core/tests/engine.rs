//! End-to-end tests of the retry loop against scripted responders.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use extract_core::{
    ExtractError, ExtractionEngine, FieldKind, Message, Responder, Role, Schema, TransportError,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Responder that replays a fixed script and records every conversation
/// it was shown.
struct Scripted {
    replies: Mutex<VecDeque<Result<String, TransportError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl Scripted {
    fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, TransportError>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn texts<'a, I>(replies: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(replies.into_iter().map(|text| Ok(text.to_string())))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for Scripted {
    async fn respond(
        &self,
        messages: &[Message],
        _schema: &Value,
    ) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("{}".to_string()))
    }
}

fn spam_schema() -> Schema {
    Schema::builder()
        .field("label", FieldKind::choice(["spam", "not_spam"]))
        .build()
}

fn user_schema() -> Schema {
    Schema::builder()
        .field(
            "name",
            FieldKind::Text {
                min_len: None,
                require_uppercase: true,
            },
        )
        .field("age", FieldKind::integer())
        .build()
}

#[tokio::test]
async fn first_attempt_success_makes_one_call() {
    // Scenario A: enum label, valid on the first call, max_retries = 0.
    let responder = Scripted::texts([r#"{"label": "spam"}"#]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(0);

    let (value, metrics) = engine
        .extract(&responder, vec![Message::user("Classify this text.")])
        .await
        .unwrap();

    assert_eq!(value, json!({"label": "spam"}));
    assert_eq!(responder.calls(), 1);
    assert_eq!(metrics.total_attempts, 1);
}

#[tokio::test]
async fn schema_instruction_is_appended_before_first_attempt() {
    let responder = Scripted::texts([r#"{"label": "spam"}"#]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(0);

    engine
        .extract(&responder, vec![Message::user("Classify this text.")])
        .await
        .unwrap();

    let seen = responder.seen();
    let last = seen[0].last().unwrap();
    assert_eq!(last.role, Role::System);
    let text = match &last.content[0] {
        extract_core::ContentPart::Text { text } => text.clone(),
        extract_core::ContentPart::ImageUrl { .. } => String::new(),
    };
    assert!(text.contains("schema"));
    assert!(text.contains("not_spam"));
}

#[tokio::test]
async fn retry_recovers_from_failed_validation() {
    // Scenario B: first reply fails the uppercase rule, second passes.
    let responder = Scripted::texts([
        r#"{"name": "jason", "age": 12}"#,
        r#"{"name": "JASON", "age": 12}"#,
    ]);
    let engine = ExtractionEngine::new(user_schema()).max_retries(3);

    let (value, metrics) = engine
        .extract(&responder, vec![Message::user("Extract `jason is 12`")])
        .await
        .unwrap();

    assert_eq!(value, json!({"name": "JASON", "age": 12}));
    assert_eq!(responder.calls(), 2);
    assert_eq!(metrics.total_attempts, 2);

    // The second call saw exactly one feedback turn, and it names `name`.
    let seen = responder.seen();
    let feedback = seen[1].last().unwrap();
    assert_eq!(feedback.role, Role::User);
    let text = match &feedback.content[0] {
        extract_core::ContentPart::Text { text } => text.clone(),
        extract_core::ContentPart::ImageUrl { .. } => String::new(),
    };
    assert!(text.contains("`name`"));
    assert!(text.contains("ALL CAPS"));
    assert!(!text.contains("`age`"));
}

#[tokio::test]
async fn conversation_grows_by_two_turns_per_failed_attempt() {
    // P3: each retry sees the prior conversation plus a failed-payload
    // assistant turn and a feedback user turn.
    let responder = Scripted::texts([
        r#"{"name": "jason", "age": 12}"#,
        r#"{"name": "danny", "age": 125}"#,
        r#"{"name": "DANNY", "age": 125}"#,
    ]);
    let engine = ExtractionEngine::new(user_schema()).max_retries(3);

    engine
        .extract(&responder, vec![Message::user("Extract `danny is 125`")])
        .await
        .unwrap();

    let seen = responder.seen();
    assert_eq!(seen.len(), 3);
    for window in seen.windows(2) {
        assert_eq!(window[1].len(), window[0].len() + 2);
        assert_eq!(&window[1][..window[0].len()], window[0].as_slice());
        assert_eq!(window[1][window[0].len()].role, Role::Assistant);
        assert_eq!(window[1][window[0].len() + 1].role, Role::User);
    }
}

#[tokio::test]
async fn exhausted_retries_carries_full_history() {
    // Scenario C / P2: always-invalid enum with max_retries = 3 makes
    // exactly 4 calls and surfaces one record per attempt.
    let responder = Scripted::texts([
        r#"{"label": "ham"}"#,
        r#"{"label": "eggs"}"#,
        r#"{"label": "ham"}"#,
        r#"{"label": "ham"}"#,
    ]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(3);

    let err = engine
        .extract(&responder, vec![Message::user("Classify this text.")])
        .await
        .unwrap_err();

    assert_eq!(responder.calls(), 4);
    match err {
        ExtractError::ExhaustedRetries {
            attempts,
            history,
            metrics,
        } => {
            assert_eq!(attempts, 4);
            assert_eq!(history.len(), 4);
            assert_eq!(metrics.total_attempts, 4);
            for (index, record) in history.iter().enumerate() {
                assert_eq!(record.attempt_number, index + 1);
                assert_eq!(record.errors.len(), 1);
                assert!(record.errors[0].message.contains("spam, not_spam"));
            }
        }
        other => panic!("expected ExhaustedRetries, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_retries_fails_terminally_on_first_invalid_attempt() {
    let responder = Scripted::texts([r#"{"label": "ham"}"#]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(0);

    let err = engine
        .extract(&responder, vec![Message::user("Classify this text.")])
        .await
        .unwrap_err();

    assert_eq!(responder.calls(), 1);
    assert!(matches!(
        err,
        ExtractError::ExhaustedRetries { attempts: 1, .. }
    ));
}

#[tokio::test]
async fn transport_error_propagates_without_retrying() {
    // Scenario D / P4: transport failure on the first call ends the run.
    let responder = Scripted::new([Err(TransportError::new("rate limited"))]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(3);

    let err = engine
        .extract(&responder, vec![Message::user("Classify this text.")])
        .await
        .unwrap_err();

    assert_eq!(responder.calls(), 1);
    match err {
        ExtractError::Transport(transport) => assert_eq!(transport.cause, "rate limited"),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_error_mid_run_is_still_immediate() {
    let responder = Scripted::new([
        Ok(r#"{"label": "ham"}"#.to_string()),
        Err(TransportError::new("connection reset")),
    ]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(3);

    let err = engine
        .extract(&responder, vec![Message::user("Classify this text.")])
        .await
        .unwrap_err();

    assert_eq!(responder.calls(), 2);
    assert!(matches!(err, ExtractError::Transport(_)));
}

#[tokio::test]
async fn nested_list_failure_reports_indexed_path() {
    // P5: malformed element at index 2 shows up in the error path.
    let subtask = Schema::builder()
        .field("id", FieldKind::integer())
        .field("name", FieldKind::text())
        .build();
    let schema = Schema::builder()
        .field("subtasks", FieldKind::list(FieldKind::Object(subtask)))
        .build();

    let responder = Scripted::texts([
        r#"{"subtasks": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}, {"id": 3}]}"#,
    ]);
    let engine = ExtractionEngine::new(schema).max_retries(0);

    let err = engine
        .extract(&responder, vec![Message::user("List the subtasks.")])
        .await
        .unwrap_err();

    match err {
        ExtractError::ExhaustedRetries { history, .. } => {
            assert_eq!(history[0].errors.len(), 1);
            assert_eq!(history[0].errors[0].path, "subtasks[2].name");
        }
        other => panic!("expected ExhaustedRetries, got {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_output_consumes_a_retry() {
    let responder = Scripted::texts(["Sure! The label is spam.", r#"{"label": "spam"}"#]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(1);

    let (value, metrics) = engine
        .extract(&responder, vec![Message::user("Classify this text.")])
        .await
        .unwrap();

    assert_eq!(value, json!({"label": "spam"}));
    assert_eq!(responder.calls(), 2);
    assert_eq!(metrics.total_attempts, 2);

    // The feedback for the unparsable attempt echoes the raw output.
    let seen = responder.seen();
    let feedback = seen[1].last().unwrap();
    let text = match &feedback.content[0] {
        extract_core::ContentPart::Text { text } => text.clone(),
        extract_core::ContentPart::ImageUrl { .. } => String::new(),
    };
    assert!(text.contains("not parsable JSON"));
    assert!(text.contains("Sure! The label is spam."));
}

#[tokio::test]
async fn empty_schema_is_rejected_before_any_call() {
    let responder = Scripted::texts(["{}"]);
    let engine = ExtractionEngine::new(Schema::builder().build());

    let err = engine
        .extract(&responder, vec![Message::user("anything")])
        .await
        .unwrap_err();

    assert_eq!(responder.calls(), 0);
    assert!(matches!(err, ExtractError::Schema(_)));
}

#[tokio::test]
async fn extract_typed_deserializes_the_validated_payload() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct UserDetail {
        name: String,
        age: u32,
    }

    let responder = Scripted::texts([r#"{"name": "DONALD", "age": 45}"#]);
    let engine = ExtractionEngine::new(user_schema()).max_retries(3);

    let (user, metrics): (UserDetail, _) = engine
        .extract_typed(&responder, vec![Message::user("Extract `DONALD is 45`")])
        .await
        .unwrap();

    assert_eq!(
        user,
        UserDetail {
            name: "DONALD".to_string(),
            age: 45
        }
    );
    assert_eq!(metrics.total_attempts, 1);
}

#[tokio::test]
async fn image_turns_pass_through_to_the_responder() {
    let responder = Scripted::texts([r#"{"label": "spam"}"#]);
    let engine = ExtractionEngine::new(spam_schema()).max_retries(0);

    engine
        .extract(
            &responder,
            vec![
                Message::user("Classify the text in this image."),
                Message::user_image("https://example.com/scan.png"),
            ],
        )
        .await
        .unwrap();

    let seen = responder.seen();
    assert!(seen[0].iter().any(|message| {
        message.content.iter().any(|part| {
            matches!(part, extract_core::ContentPart::ImageUrl { url } if url.ends_with("scan.png"))
        })
    }));
}
