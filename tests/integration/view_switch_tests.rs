//! Integration tests for perspective switching.

use std::sync::Arc;

use ehr_access_console::models::decision::Decision;
use ehr_access_console::view::{Perspective, ViewController};
use ehr_access_console::AppError;

use super::test_helpers::{answer, ScriptedPolicyService};

#[test]
fn starts_in_requester_perspective() {
    let controller = ViewController::new(ScriptedPolicyService::new());
    assert_eq!(controller.perspective(), Perspective::Requester);
    assert!(controller.decisions().outcome().is_none());
}

#[tokio::test]
async fn entering_transparency_refreshes_exactly_once() {
    let service = ScriptedPolicyService::new();
    let mut controller = ViewController::new(Arc::clone(&service) as _);

    let refreshed = controller.switch_to(Perspective::SubjectTransparency).await;

    assert!(refreshed);
    assert_eq!(service.fetch_calls(), 1);
    assert_eq!(controller.perspective(), Perspective::SubjectTransparency);
}

#[tokio::test]
async fn every_visit_to_transparency_refreshes() {
    let service = ScriptedPolicyService::new();
    let mut controller = ViewController::new(Arc::clone(&service) as _);

    controller.switch_to(Perspective::SubjectTransparency).await;
    controller.switch_to(Perspective::Requester).await;
    controller.switch_to(Perspective::SubjectTransparency).await;

    assert_eq!(service.fetch_calls(), 2);
}

#[tokio::test]
async fn leaving_transparency_has_no_side_effect() {
    let service = ScriptedPolicyService::new();
    let mut controller = ViewController::new(Arc::clone(&service) as _);
    controller.switch_to(Perspective::SubjectTransparency).await;

    let refreshed = controller.switch_to(Perspective::Requester).await;

    assert!(!refreshed);
    assert_eq!(service.fetch_calls(), 1);
}

#[tokio::test]
async fn switching_to_current_perspective_is_a_no_op() {
    let service = ScriptedPolicyService::new();
    let mut controller = ViewController::new(Arc::clone(&service) as _);
    controller.switch_to(Perspective::SubjectTransparency).await;

    assert!(!controller.switch_to(Perspective::SubjectTransparency).await);
    assert!(!controller.switch_to(Perspective::Requester).await);
    assert!(!controller.switch_to(Perspective::Requester).await);
    assert_eq!(service.fetch_calls(), 1);
}

#[tokio::test]
async fn round_trip_preserves_decision_and_form() {
    let service = ScriptedPolicyService::new();
    service.push_evaluation(answer("RESTRICT", "limited"));
    let mut controller = ViewController::new(Arc::clone(&service) as _);
    controller.builder_mut().set_purpose("Lab Results");

    controller.submit().await.unwrap();
    controller.switch_to(Perspective::SubjectTransparency).await;
    controller.switch_to(Perspective::Requester).await;

    let shown = controller.decisions().outcome().expect("decision kept");
    assert_eq!(shown.decision, Decision::Restrict);
    assert_eq!(shown.rationale, "limited");
    assert_eq!(controller.builder().purpose(), "Lab Results");
}

#[tokio::test]
async fn blocked_emergency_submission_never_reaches_service() {
    let service = ScriptedPolicyService::new();
    let mut controller = ViewController::new(Arc::clone(&service) as _);
    controller
        .builder_mut()
        .set_emergency_override(true)
        .set_justification("   ");

    let err = controller.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(service.evaluate_calls(), 0);
    assert!(controller.decisions().outcome().is_none());
}

#[tokio::test]
async fn submission_requires_requester_perspective() {
    let service = ScriptedPolicyService::new();
    let mut controller = ViewController::new(Arc::clone(&service) as _);
    controller.switch_to(Perspective::SubjectTransparency).await;

    let err = controller.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(service.evaluate_calls(), 0);
}

#[tokio::test]
async fn stale_justification_is_not_transmitted_after_emergency_is_turned_off() {
    let service = ScriptedPolicyService::new();
    service.push_evaluation(answer("ALLOW", "break-glass granted"));
    service.push_evaluation(answer("DENY", "normal rules"));
    let mut controller = ViewController::new(Arc::clone(&service) as _);

    controller
        .builder_mut()
        .set_emergency_override(true)
        .set_justification("Patient in cardiac arrest");
    controller.submit().await.unwrap();

    controller.builder_mut().set_emergency_override(false);
    controller.submit().await.unwrap();

    let sent = service.requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].justification(), "Patient in cardiac arrest");
    assert!(!sent[1].emergency_override());
    assert_eq!(sent[1].justification(), "");
}

#[tokio::test]
async fn dispatch_submit_returns_while_call_is_in_flight() {
    let service = ScriptedPolicyService::new();
    let gate = service.gate_evaluation();
    let mut controller = ViewController::new(Arc::clone(&service) as _);

    let handle = controller.dispatch_submit().unwrap();
    assert!(controller.decisions().outcome().unwrap().is_pending());

    // The form and the perspective stay usable while the call is held.
    controller.builder_mut().set_purpose("Lab Results");
    assert!(controller.switch_to(Perspective::SubjectTransparency).await);

    gate.send(answer("RESTRICT", "After hours")).unwrap();
    handle.await.unwrap();
    assert_eq!(
        controller.decisions().outcome().unwrap().decision,
        Decision::Restrict
    );
}

#[tokio::test]
async fn dispatch_submit_is_refused_from_subject_perspective() {
    let service = ScriptedPolicyService::new();
    let mut controller = ViewController::new(Arc::clone(&service) as _);
    controller.switch_to(Perspective::SubjectTransparency).await;

    assert!(matches!(
        controller.dispatch_submit(),
        Err(AppError::Validation(_))
    ));
    assert_eq!(service.evaluate_calls(), 0);
    assert!(controller.decisions().outcome().is_none());
}
