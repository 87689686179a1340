//! Contract tests for the evaluate-access call.
//!
//! Request body: `role`, `location_class`, `time_of_day`, `purpose`,
//! `emergency_override`, `justification` (empty unless break-glass).
//! Response body: `{ "decision": "ALLOW"|"RESTRICT"|"DENY", "log": string }`.

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use ehr_access_console::decision::DecisionClient;
use ehr_access_console::models::decision::{Decision, DecisionOutcome};
use ehr_access_console::models::request::{AccessRequest, ClinicalRole, LocationClass, TimeOfDay};
use ehr_access_console::request::RequestBuilder;
use ehr_access_console::service::PolicyService;
use ehr_access_console::AppError;
use serde_json::{json, Value};

use super::fake_service;

type Captured = Arc<Mutex<Option<Value>>>;

fn answering(decision: &'static str, log: &'static str, captured: &Captured) -> Router {
    let captured = Arc::clone(captured);
    Router::new().route(
        "/evaluate",
        post(move |Json(body): Json<Value>| {
            let captured = Arc::clone(&captured);
            async move {
                *captured.lock().unwrap() = Some(body);
                Json(json!({ "decision": decision, "log": log }))
            }
        }),
    )
}

fn night_request() -> AccessRequest {
    AccessRequest::new(
        ClinicalRole::Doctor,
        LocationClass::ExternalNetwork,
        TimeOfDay::Nighttime,
        "Lab Results",
        false,
        "",
    )
    .unwrap()
}

#[tokio::test]
async fn request_body_carries_classification_token_only() {
    let captured = Captured::default();
    let base = fake_service::spawn(answering("ALLOW", "ok", &captured)).await;
    let service = fake_service::client_for(&base);

    let mut builder = RequestBuilder::new();
    builder.set_location("Internal_IP (Hospital)").unwrap();
    let request = builder.build().unwrap();
    service.evaluate(&request).await.unwrap();

    let body = captured.lock().unwrap().clone().expect("body captured");
    assert_eq!(body["location_class"], "Internal_IP");
    assert!(!body.to_string().contains("Hospital"));
}

#[tokio::test]
async fn request_body_has_expected_fields() {
    let captured = Captured::default();
    let base = fake_service::spawn(answering("DENY", "no", &captured)).await;
    let service = fake_service::client_for(&base);

    service.evaluate(&night_request()).await.unwrap();

    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        body,
        json!({
            "role": "Doctor",
            "location_class": "External_IP",
            "time_of_day": "Nighttime",
            "purpose": "Lab Results",
            "emergency_override": false,
            "justification": ""
        })
    );
}

#[tokio::test]
async fn emergency_request_transmits_justification() {
    let captured = Captured::default();
    let base = fake_service::spawn(answering("ALLOW", "break-glass", &captured)).await;
    let service = fake_service::client_for(&base);
    let request = AccessRequest::new(
        ClinicalRole::Nurse,
        LocationClass::InternalNetwork,
        TimeOfDay::Nighttime,
        "Patient Record",
        true,
        "Unresponsive patient in ER",
    )
    .unwrap();

    service.evaluate(&request).await.unwrap();

    let body = captured.lock().unwrap().clone().unwrap();
    assert_eq!(body["emergency_override"], true);
    assert_eq!(body["justification"], "Unresponsive patient in ER");
}

#[tokio::test]
async fn restrict_response_reaches_decision_client_verbatim() {
    let captured = Captured::default();
    let base = fake_service::spawn(answering("RESTRICT", "Partial view only", &captured)).await;
    let client = DecisionClient::new(Arc::new(fake_service::client_for(&base)));

    let result = client.submit(&night_request()).await;

    assert_eq!(
        result.outcome,
        DecisionOutcome::resolved(Decision::Restrict, "Partial view only".into())
    );
}

#[tokio::test]
async fn server_error_status_is_a_communication_failure() {
    let router = Router::new().route(
        "/evaluate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"decision": "ALLOW", "log": "x"}))) }),
    );
    let base = fake_service::spawn(router).await;
    let service = fake_service::client_for(&base);

    let err = service.evaluate(&night_request()).await.unwrap_err();

    assert!(matches!(err, AppError::UnexpectedStatus(500)));
    assert!(err.is_communication_failure());
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let router = Router::new().route("/evaluate", post(|| async { "definitely not json" }));
    let base = fake_service::spawn(router).await;
    let service = fake_service::client_for(&base);

    let err = service.evaluate(&night_request()).await.unwrap_err();

    assert!(matches!(err, AppError::MalformedResponse(_)));
}

#[tokio::test]
async fn missing_log_field_is_malformed() {
    let router = Router::new().route(
        "/evaluate",
        post(|| async { Json(json!({ "decision": "ALLOW" })) }),
    );
    let base = fake_service::spawn(router).await;
    let client = DecisionClient::new(Arc::new(fake_service::client_for(&base)));

    let result = client.submit(&night_request()).await;

    assert_eq!(result.outcome, DecisionOutcome::connectivity_failure());
}

#[tokio::test]
async fn unreachable_service_fails_closed() {
    let base = fake_service::unreachable_base_url().await;
    let client = DecisionClient::new(Arc::new(fake_service::client_for(&base)));

    let result = client.submit(&night_request()).await;

    assert_eq!(result.outcome.decision, Decision::Deny);
    assert_eq!(result.outcome, DecisionOutcome::connectivity_failure());
}
