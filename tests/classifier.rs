use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use kinetic_notes::{
    analyze_note, ClassificationRequest, CreativityAssessment, CreativityClassifier,
    DisabledClassifier, HttpClassifier, KnError, MemoryKeyValueStore, NoteDraft, NoteStore,
    Result, EMPTY_NOTE_EXPLANATION, UNAVAILABLE_EXPLANATION,
};
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

struct Verdict(bool);

#[async_trait]
impl CreativityClassifier for Verdict {
    async fn classify(&self, request: ClassificationRequest) -> Result<CreativityAssessment> {
        Ok(CreativityAssessment {
            is_creative: self.0,
            creativity_explanation: format!("{} chars", request.note_content.len()),
        })
    }
}

#[derive(Default)]
struct Failing {
    calls: AtomicUsize,
}

#[async_trait]
impl CreativityClassifier for Failing {
    async fn classify(&self, _request: ClassificationRequest) -> Result<CreativityAssessment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(KnError::ClassifierError {
            message: "service down".to_string(),
        })
    }
}

struct Slow;

#[async_trait]
impl CreativityClassifier for Slow {
    async fn classify(&self, _request: ClassificationRequest) -> Result<CreativityAssessment> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(CreativityAssessment {
            is_creative: true,
            creativity_explanation: "too late".to_string(),
        })
    }
}

#[tokio::test]
async fn successful_verdict_is_passed_through() {
    let assessment = analyze_note(&Verdict(true), "a poem", Duration::from_secs(1)).await;
    assert!(assessment.is_creative);
    assert_eq!(assessment.creativity_explanation, "6 chars");
}

#[tokio::test]
async fn blank_content_is_never_sent() {
    let failing = Failing::default();
    let assessment = analyze_note(&failing, "  \n ", Duration::from_secs(1)).await;
    assert_eq!(
        assessment,
        CreativityAssessment::not_creative(EMPTY_NOTE_EXPLANATION)
    );
    assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failure_degrades_without_retry() {
    let failing = Failing::default();
    let assessment = analyze_note(&failing, "text", Duration::from_secs(1)).await;
    assert!(!assessment.is_creative);
    assert_eq!(assessment.creativity_explanation, UNAVAILABLE_EXPLANATION);
    assert_eq!(failing.calls.load(Ordering::SeqCst), 1);

    let disabled = analyze_note(&DisabledClassifier, "text", Duration::from_secs(1)).await;
    assert_eq!(disabled.creativity_explanation, UNAVAILABLE_EXPLANATION);
}

#[tokio::test]
async fn timeout_degrades_to_fallback() {
    let assessment = analyze_note(&Slow, "text", Duration::from_millis(50)).await;
    assert!(!assessment.is_creative);
    assert_eq!(assessment.creativity_explanation, UNAVAILABLE_EXPLANATION);
}

#[tokio::test]
async fn verdict_is_attached_within_the_add_itself() {
    let mut store = NoteStore::open(MemoryKeyValueStore::new(), Duration::from_secs(5));
    let draft = NoteDraft::new("Haiku", "old pond, frog jumps in");

    let assessment = analyze_note(&Verdict(true), &draft.content, Duration::from_secs(1)).await;
    let note = store.add(draft.with_assessment(assessment));

    let stored = store.get(&note.id).unwrap();
    assert_eq!(stored.is_creative, Some(true));
    assert_eq!(stored.creativity_explanation.as_deref(), Some("23 chars"));
}

#[test]
fn wire_format_uses_camel_case() {
    let request = ClassificationRequest {
        note_content: "x".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        serde_json::json!({ "noteContent": "x" })
    );

    let response: CreativityAssessment =
        serde_json::from_str(r#"{"isCreative":true,"creativityExplanation":"vivid"}"#).unwrap();
    assert!(response.is_creative);
    assert_eq!(response.creativity_explanation, "vivid");
}

fn classifier_for(server: &MockServer) -> HttpClassifier {
    HttpClassifier::new(format!("{}/classify", server.uri())).unwrap()
}

#[tokio::test]
async fn http_verdict_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .and(body_json(serde_json::json!({ "noteContent": "a sonnet" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "isCreative": true,
            "creativityExplanation": "vivid imagery"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let assessment = analyze_note(&classifier, "a sonnet", Duration::from_secs(5)).await;
    assert!(assessment.is_creative);
    assert_eq!(assessment.creativity_explanation, "vivid imagery");
}

#[tokio::test]
async fn http_server_error_degrades_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let request = ClassificationRequest {
        note_content: "text".to_string(),
    };
    assert!(matches!(
        classifier.classify(request).await,
        Err(KnError::ClassifierError { .. })
    ));

    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let assessment = analyze_note(&classifier, "text", Duration::from_secs(5)).await;
    assert!(!assessment.is_creative);
    assert_eq!(assessment.creativity_explanation, UNAVAILABLE_EXPLANATION);
}

#[tokio::test]
async fn malformed_http_body_degrades_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let assessment = analyze_note(&classifier, "text", Duration::from_secs(5)).await;
    assert_eq!(
        assessment,
        CreativityAssessment::not_creative(UNAVAILABLE_EXPLANATION)
    );
}
