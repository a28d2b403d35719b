//! Shared harness for the HTTP tests: the full application over the
//! in-memory repositories, a manual clock and a recording notifier.

#![allow(dead_code, unused_macros)]

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use serde_json::{json, Value};

use lp_api::AppState;
use lp_core::domain::entities::user::{NewUser, UserRole};
use lp_core::errors::DomainError;
use lp_core::repositories::{MockLoanRepository, MockResetCodeRepository, MockUserRepository, UserRepository};
use lp_core::services::{
    AccountService, AuthVerifier, Clock, CredentialRecoveryService, InMemoryRateLimiter, LoanService,
    ManualClock, NotifierTrait, PasswordHasher, RecoveryServiceConfig, TokenService, TokenServiceConfig,
};
use lp_shared::config::CorsConfig;

/// Call the service and decode the JSON body; evaluates to `(status, body)`
macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service($app, $req).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

/// Status of a request rejected by the authentication middleware
macro_rules! rejected_status {
    ($app:expr, $req:expr) => {{
        match actix_web::test::try_call_service($app, $req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    }};
}

/// Log in through `$path` and evaluate to the bearer token
macro_rules! login_token {
    ($app:expr, $path:expr, $username:expr, $password:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri($path)
            .set_json(serde_json::json!({ "username": $username, "password": $password }))
            .to_request();
        let (status, body) = call_json!($app, req);
        assert_eq!(status, actix_web::http::StatusCode::OK, "login failed: {}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }};
}

/// Register `$username` as a client and evaluate to its bearer token
macro_rules! client_token {
    ($app:expr, $username:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(common::registration($username))
            .to_request();
        let (status, body) = call_json!($app, req);
        assert_eq!(status, actix_web::http::StatusCode::OK, "register failed: {}", body);
        login_token!($app, "/api/auth/login_client", $username, "secret123")
    }};
}

pub type TestState = AppState<MockUserRepository, MockLoanRepository, MockResetCodeRepository>;

pub const EMPLOYEE_USERNAME: &str = "officer";
pub const EMPLOYEE_PASSWORD: &str = "employee-pass";

/// Keeps delivered emails so tests can read the code back
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// The 6-digit code in the last message sent to `email`
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .and_then(|(_, body)| {
                body.split(|c: char| !c.is_ascii_digit())
                    .find(|chunk| chunk.len() == 6)
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl NotifierTrait for RecordingNotifier {
    async fn send(&self, to: &str, _subject: &str, body: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), body.to_string()));
        Ok(format!("test-msg-{}", sent.len()))
    }
}

/// Fast stand-in for bcrypt
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{}", plain))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == format!("hashed:{}", plain))
    }
}

pub struct TestHarness {
    pub state: web::Data<TestState>,
    pub verifier: Arc<dyn AuthVerifier>,
    pub cors: CorsConfig,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub user_repository: Arc<MockUserRepository>,
}

impl TestHarness {
    /// Build the stack and seed one bank employee
    pub async fn new() -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let hasher: Arc<dyn PasswordHasher> = Arc::new(PlainHasher);
        let notifier = Arc::new(RecordingNotifier::default());

        let user_repository = Arc::new(MockUserRepository::new());
        let token_service = Arc::new(TokenService::new(
            TokenServiceConfig {
                jwt_secret: "test-secret-for-http-tests".to_string(),
                ..TokenServiceConfig::default()
            },
            dyn_clock.clone(),
        ));

        user_repository
            .create(NewUser {
                username: EMPLOYEE_USERNAME.to_string(),
                email: "officer@bank.example".to_string(),
                password_hash: hasher.hash(EMPLOYEE_PASSWORD).unwrap(),
                role: UserRole::BankEmployee,
                first_name: "Olive".to_string(),
                last_name: "Officer".to_string(),
                last_login_at: None,
                created_at: clock.now(),
            })
            .await
            .unwrap();

        let state = web::Data::new(AppState {
            account_service: Arc::new(AccountService::new(
                user_repository.clone(),
                hasher.clone(),
                token_service.clone(),
                dyn_clock.clone(),
            )),
            loan_service: Arc::new(LoanService::new(Arc::new(MockLoanRepository::new()), dyn_clock.clone())),
            recovery_service: Arc::new(CredentialRecoveryService::new(
                user_repository.clone(),
                Arc::new(MockResetCodeRepository::new()),
                Arc::new(InMemoryRateLimiter::new(15, dyn_clock.clone())),
                notifier.clone(),
                hasher,
                dyn_clock,
                RecoveryServiceConfig::default(),
            )),
        });

        Self {
            state,
            verifier: token_service,
            cors: CorsConfig::default(),
            clock,
            notifier,
            user_repository,
        }
    }
}

pub fn registration(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "secret123",
        "first_name": "Test",
        "last_name": "User",
    })
}

pub fn loan_body(amount: f64) -> Value {
    json!({
        "father_name": "George",
        "birth_date": "1991-03-14",
        "birth_place": "Thessaloniki",
        "phone_number": "+302310123456",
        "education_level": "Master",
        "marital_status": "Married",
        "requested_amount": amount,
        "currency": "EUR",
        "duration_months": 48,
        "loan_type": "Mortgage",
        "incomes": [
            { "income_type": "Salary", "amount": 2400.0, "currency": "EUR", "since": "2017-09-01" }
        ],
    })
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (actix_web::http::header::AUTHORIZATION, format!("Bearer {}", token))
}
