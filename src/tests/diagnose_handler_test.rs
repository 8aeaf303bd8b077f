// Diagnosis endpoint tests

use crate::services::llm::{ContentPart, LLMError, LLMScenario};
use crate::tests::common::{
    FakeLLMService, jpeg_bytes, post_json, post_multipart, test_app,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

fn honda_request() -> Value {
    json!({
        "vehicle": {"make": "Honda", "model": "Civic", "year": 2015},
        "history": [{"role": "user", "content": "car shakes at idle"}]
    })
}

fn mount_report() -> Value {
    json!({
        "potential_problems": [{"name": "Worn motor mount", "description": "..."}],
        "severity": {"level": "CAUTION", "message": "..."},
        "next_steps": ["Inspect mounts"],
        "estimated_cost": {"range": "$150-$400", "disclaimer": "..."},
        "disclaimers": []
    })
}

#[tokio::test]
async fn test_conversation_returns_report_unchanged() {
    let llm = FakeLLMService::replying(&mount_report().to_string());
    let app = test_app(llm.clone());

    let (status, body) = post_json(app, "/diagnose/conversation", &honda_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, mount_report());

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].scenario, LLMScenario::ConversationDiagnosis);
    assert_eq!(
        requests[0].parts[0].as_text(),
        Some("Vehicle: 2015 Honda Civic\nConversation History:\nuser: car shakes at idle")
    );
}

#[tokio::test]
async fn test_conversation_accepts_fenced_reply() {
    let fenced = format!("```json\n{}\n```", mount_report());
    let app = test_app(FakeLLMService::replying(&fenced));

    let (status, body) = post_json(app, "/diagnose/conversation", &honda_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, mount_report());
}

#[tokio::test]
async fn test_conversation_malformed_report_is_not_passed_through() {
    let app = test_app(FakeLLMService::replying(r#"{"foo":"bar"}"#));

    let (status, body) = post_json(app, "/diagnose/conversation", &honda_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Diagnostic assistant returned a malformed report. Please try again."})
    );
}

#[tokio::test]
async fn test_conversation_rejects_unknown_severity() {
    let mut report = mount_report();
    report["severity"]["level"] = json!("URGENT");
    let app = test_app(FakeLLMService::replying(&report.to_string()));

    let (status, body) = post_json(app, "/diagnose/conversation", &honda_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("malformed report"));
}

#[tokio::test]
async fn test_conversation_gateway_failure_message() {
    let app = test_app(FakeLLMService::replying("I'm not sure what is wrong with your car."));

    let (status, body) = post_json(app, "/diagnose/conversation", &honda_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "The diagnostic assistant failed to generate a valid response. Please try again."})
    );
}

#[tokio::test]
async fn test_conversation_transport_failure_uses_same_message() {
    let app = test_app(FakeLLMService::failing(|| LLMError::Timeout(Some(30))));

    let (status, body) = post_json(app, "/diagnose/conversation", &honda_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "The diagnostic assistant failed to generate a valid response. Please try again."
    );
}

#[tokio::test]
async fn test_conversation_invalid_body_never_reaches_gateway() {
    let llm = FakeLLMService::replying(&mount_report().to_string());
    let app = test_app(llm.clone());
    let body = json!({
        "vehicle": {"make": "Honda", "model": "Civic", "year": 2015},
        "history": [{"role": "mechanic", "content": "hi"}]
    });

    let (status, response) = post_json(app, "/diagnose/conversation", &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["error"].is_string());
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_image_diagnosis_returns_report() {
    let llm = FakeLLMService::replying(&mount_report().to_string());
    let app = test_app(llm.clone());
    let jpeg = jpeg_bytes();

    let (status, body) = post_multipart(
        app,
        "/diagnose/image",
        &[("make", "Honda"), ("model", "Civic"), ("year", "2015"), ("prompt", "What is this leak?")],
        Some(jpeg.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, mount_report());

    let requests = llm.requests();
    assert_eq!(requests[0].scenario, LLMScenario::ImageDiagnosis);
    assert_eq!(requests[0].parts[1].as_text(), Some("User's question: What is this leak?\n\n"));
    match &requests[0].parts[3] {
        ContentPart::Image(image) => assert_eq!(image.data(), jpeg.as_slice()),
        other => panic!("expected image part, got {:?}", other),
    }
}

#[tokio::test]
async fn test_image_diagnosis_empty_reply_uses_image_message() {
    let app = test_app(FakeLLMService::without_text());

    let (status, body) = post_multipart(
        app,
        "/diagnose/image",
        &[("make", "Honda"), ("model", "Civic"), ("year", "2015"), ("prompt", "noise")],
        Some(jpeg_bytes().as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "The diagnostic assistant failed to generate a valid response from the image."
    );
}

#[tokio::test]
async fn test_image_diagnosis_requires_integer_year() {
    let llm = FakeLLMService::replying(&mount_report().to_string());
    let app = test_app(llm.clone());

    let (status, body) = post_multipart(
        app,
        "/diagnose/image",
        &[("make", "Honda"), ("model", "Civic"), ("year", "twenty"), ("prompt", "noise")],
        Some(jpeg_bytes().as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("year"));
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_image_diagnosis_rejects_non_image_upload() {
    let llm = FakeLLMService::replying(&mount_report().to_string());
    let app = test_app(llm.clone());

    let (status, _) = post_multipart(
        app,
        "/diagnose/image",
        &[("make", "Honda"), ("model", "Civic"), ("year", "2015"), ("prompt", "noise")],
        Some(b"definitely not an image"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_image_diagnosis_rejects_corrupt_jpeg() {
    let llm = FakeLLMService::replying(&mount_report().to_string());
    let app = test_app(llm.clone());
    let mut truncated = jpeg_bytes();
    truncated.truncate(20);

    let (status, body) = post_multipart(
        app,
        "/diagnose/image",
        &[("make", "Honda"), ("model", "Civic"), ("year", "2015"), ("prompt", "noise")],
        Some(truncated.as_slice()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Uploaded image could not be decoded"));
    assert!(llm.requests().is_empty());
}
