//! HTTP tests for client applications and employee review

#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};

use common::{bearer, loan_body, TestHarness, EMPLOYEE_PASSWORD, EMPLOYEE_USERNAME};
use lp_api::create_app;

#[actix_web::test]
async fn test_apply_and_list_own_loans() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let token = client_token!(&app, "hannah");

    let req = test::TestRequest::post()
        .uri("/api/client/apply")
        .insert_header(bearer(&token))
        .set_json(loan_body(20_000.0))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Applied");
    assert_eq!(body["data"]["incomes"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/client/loans")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["requested_amount"], 20_000.0);
}

#[actix_web::test]
async fn test_other_client_cannot_touch_application() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let owner = client_token!(&app, "ivan");
    let intruder = client_token!(&app, "judy");

    let req = test::TestRequest::post()
        .uri("/api/client/apply")
        .insert_header(bearer(&owner))
        .set_json(loan_body(5_000.0))
        .to_request();
    let (_, body) = call_json!(&app, req);
    let id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/client/loans/{}", id))
        .insert_header(bearer(&intruder))
        .set_json(loan_body(1.0))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/client/loans/{}", id))
        .insert_header(bearer(&intruder))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/client/loans")
        .insert_header(bearer(&intruder))
        .to_request();
    let (_, body) = call_json!(&app, req);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_update_and_delete_while_applied() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let token = client_token!(&app, "kate");

    let req = test::TestRequest::post()
        .uri("/api/client/apply")
        .insert_header(bearer(&token))
        .set_json(loan_body(8_000.0))
        .to_request();
    let (_, body) = call_json!(&app, req);
    let id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/client/loans/{}", id))
        .insert_header(bearer(&token))
        .set_json(loan_body(9_500.0))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["requested_amount"], 9_500.0);
    assert_eq!(body["data"]["status"], "Applied");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/client/loans/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/client/loans/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_client_is_forbidden_on_employee_routes() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let token = client_token!(&app, "leo");

    let req = test::TestRequest::get()
        .uri("/api/employee/loans")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(rejected_status!(&app, req), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/api/employee/summary").to_request();
    assert_eq!(rejected_status!(&app, req), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_employee_review_flow() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let client = client_token!(&app, "mia");
    let employee = login_token!(&app, "/api/auth/login_employee", EMPLOYEE_USERNAME, EMPLOYEE_PASSWORD);

    let req = test::TestRequest::post()
        .uri("/api/client/apply")
        .insert_header(bearer(&client))
        .set_json(loan_body(12_000.0))
        .to_request();
    let (_, body) = call_json!(&app, req);
    let id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/employee/loans/{}/evaluate", id))
        .insert_header(bearer(&employee))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Evaluation");

    // No longer editable by the client
    let req = test::TestRequest::put()
        .uri(&format!("/api/client/loans/{}", id))
        .insert_header(bearer(&client))
        .set_json(loan_body(1_000.0))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/employee/loans/{}/evaluate", id))
        .insert_header(bearer(&employee))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_STATE_TRANSITION");

    let req = test::TestRequest::post()
        .uri(&format!("/api/employee/loans/{}/approve", id))
        .insert_header(bearer(&employee))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Approved");

    let req = test::TestRequest::post()
        .uri(&format!("/api/employee/loans/{}/reject", id))
        .insert_header(bearer(&employee))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/employee/loans/{}", id))
        .insert_header(bearer(&employee))
        .to_request();
    let (_, body) = call_json!(&app, req);
    assert_eq!(body["data"]["status"], "Approved");
}

#[actix_web::test]
async fn test_unknown_action_and_absent_loan_are_not_found() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let employee = login_token!(&app, "/api/auth/login_employee", EMPLOYEE_USERNAME, EMPLOYEE_PASSWORD);

    let req = test::TestRequest::post()
        .uri("/api/employee/loans/1/archive")
        .insert_header(bearer(&employee))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/employee/loans/999")
        .insert_header(bearer(&employee))
        .to_request();
    let (status, body) = call_json!(&app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let req = test::TestRequest::get()
        .uri("/api/employee/loans/abc")
        .insert_header(bearer(&employee))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_summary_counts_every_status() {
    let harness = TestHarness::new().await;
    let app = test::init_service(create_app(harness.state.clone(), harness.verifier.clone(), &harness.cors)).await;

    let client = client_token!(&app, "nina");
    let employee = login_token!(&app, "/api/auth/login_employee", EMPLOYEE_USERNAME, EMPLOYEE_PASSWORD);

    let mut ids = Vec::new();
    for amount in [1_000.0, 2_000.0, 3_000.0] {
        let req = test::TestRequest::post()
            .uri("/api/client/apply")
            .insert_header(bearer(&client))
            .set_json(loan_body(amount))
            .to_request();
        let (_, body) = call_json!(&app, req);
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/employee/loans/{}/reject", ids[0]))
        .insert_header(bearer(&employee))
        .to_request();
    let (status, _) = call_json!(&app, req);
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/employee/summary")
        .insert_header(bearer(&employee))
        .to_request();
    let (status, body) = call_json!(&app, req);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Applied"], 2);
    assert_eq!(body["data"]["Evaluation"], 0);
    assert_eq!(body["data"]["Approved"], 0);
    assert_eq!(body["data"]["Rejected"], 1);

    let req = test::TestRequest::get()
        .uri("/api/employee/loans")
        .insert_header(bearer(&employee))
        .to_request();
    let (_, body) = call_json!(&app, req);
    let listed: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|loan| loan["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
}
