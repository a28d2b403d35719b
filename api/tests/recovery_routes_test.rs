//! HTTP tests for reset-code issuance, verification and password reset

#[macro_use]
mod common;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use chrono::Duration;
use serde_json::json;

use common::TestHarness;
use lp_api::create_app;

#[actix_web::test]
async fn test_reset_code_for_unknown_email_is_not_found() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/request-reset-code")
        .set_json(json!({ "email": "ghost@example.com" }))
        .to_request();
    let (status, body) = call_json!(&app, req);

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(harness.notifier.sent_count(), 0);
}

#[actix_web::test]
async fn test_second_request_inside_window_is_rate_limited() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let _ = client_token!(&app, "oscar");

    let first = test::TestRequest::post()
        .uri("/api/auth/request-reset-code")
        .set_json(json!({ "email": "oscar@example.com" }))
        .to_request();
    let (status, body) = call_json!(&app, first);
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["expires_at"].is_string());

    harness.clock.advance(Duration::seconds(5));

    let second = test::TestRequest::post()
        .uri("/api/auth/request-reset-code")
        .set_json(json!({ "email": "OSCAR@example.com" }))
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(harness.notifier.sent_count(), 1);

    harness.clock.advance(Duration::seconds(11));

    let third = test::TestRequest::post()
        .uri("/api/auth/request-reset-code")
        .set_json(json!({ "email": "oscar@example.com" }))
        .to_request();
    let (status, _) = call_json!(&app, third);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(harness.notifier.sent_count(), 2);
}

#[actix_web::test]
async fn test_verify_then_reset_password() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let _ = client_token!(&app, "paula");

    let req = test::TestRequest::post()
        .uri("/api/auth/request-reset-code")
        .set_json(json!({ "email": "paula@example.com" }))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);

    let code = harness.notifier.last_code_for("paula@example.com").unwrap();

    // Verification does not spend the code
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/auth/verify-reset-code")
            .set_json(json!({ "email": "paula@example.com", "code": code }))
            .to_request();
        let (status, _) = call_json!(&app, req);
        assert_eq!(status, StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/reset-password")
        .set_json(json!({
            "email": "paula@example.com",
            "code": code,
            "new_password": "brand-new-pass",
        }))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Password changed successfully.");

    // Spent
    let req = test::TestRequest::post()
        .uri("/api/auth/reset-password")
        .set_json(json!({
            "email": "paula@example.com",
            "code": code,
            "new_password": "another-pass",
        }))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OR_EXPIRED_CODE");

    let token = login_token!(&app, "/api/auth/login_client", "paula", "brand-new-pass");
    assert!(!token.is_empty());

    let req = test::TestRequest::post()
        .uri("/api/auth/login_client")
        .set_json(json!({ "username": "paula", "password": "secret123" }))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expired_code_is_rejected() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let _ = client_token!(&app, "quinn");

    let req = test::TestRequest::post()
        .uri("/api/auth/request-reset-code")
        .set_json(json!({ "email": "quinn@example.com" }))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);
    let code = harness.notifier.last_code_for("quinn@example.com").unwrap();

    harness.clock.advance(Duration::minutes(11));

    let req = test::TestRequest::post()
        .uri("/api/auth/verify-reset-code")
        .set_json(json!({ "email": "quinn@example.com", "code": code }))
        .to_request();
    let (status, body) = call_json!(&app, req);

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OR_EXPIRED_CODE");
}

#[actix_web::test]
async fn test_wrong_code_is_rejected() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let _ = client_token!(&app, "rita");

    let req = test::TestRequest::post()
        .uri("/api/auth/request-reset-code")
        .set_json(json!({ "email": "rita@example.com" }))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);

    let code = harness.notifier.last_code_for("rita@example.com").unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let req = test::TestRequest::post()
        .uri("/api/auth/verify-reset-code")
        .set_json(json!({ "email": "rita@example.com", "code": wrong }))
        .to_request();
    let (status, _) = call_json!(&app, req);

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
