//! End-to-end flows across the core services over the in-memory repositories

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use lp_core::domain::entities::loan_application::{Income, LoanDetails, LoanEvent, LoanStatus};
use lp_core::errors::{DomainError, LoanError, RecoveryError};
use lp_core::repositories::{MockLoanRepository, MockResetCodeRepository, MockUserRepository};
use lp_core::services::{
    AccountService, BcryptPasswordHasher, Clock, CredentialRecoveryService, InMemoryRateLimiter,
    LoanService, ManualClock, NotifierTrait, PasswordHasher, RecoveryServiceConfig, Registration,
    TokenService, TokenServiceConfig,
};

#[derive(Default)]
struct CollectingNotifier {
    bodies: Mutex<Vec<String>>,
}

#[async_trait]
impl NotifierTrait for CollectingNotifier {
    async fn send(&self, _to: &str, _subject: &str, body: &str) -> Result<String, String> {
        let mut bodies = self.bodies.lock().unwrap();
        bodies.push(body.to_string());
        Ok(format!("collected-{}", bodies.len()))
    }
}

fn details(amount: f64) -> LoanDetails {
    LoanDetails {
        father_name: "Nikos".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1988, 11, 2).unwrap(),
        birth_place: "Patras".to_string(),
        phone_number: "+302610123456".to_string(),
        education_level: "PhD".to_string(),
        marital_status: "Single".to_string(),
        requested_amount: amount,
        currency: "EUR".to_string(),
        duration_months: 24,
        loan_type: "Car".to_string(),
    }
}

fn salary() -> Income {
    Income {
        income_type: "Salary".to_string(),
        amount: 1_800.0,
        currency: "EUR".to_string(),
        since: NaiveDate::from_ymd_opt(2015, 2, 1).unwrap(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_decisions_apply_exactly_once() {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
    let service = Arc::new(LoanService::new(Arc::new(MockLoanRepository::new()), clock));

    let application = service.submit(7, details(30_000.0), vec![salary()]).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = service.clone();
        let event = if i % 2 == 0 { LoanEvent::Approve } else { LoanEvent::Reject };
        handles.push(tokio::spawn(async move {
            service.transition(application.id, event).await.unwrap()
        }));
    }

    let mut applied = 0;
    for handle in handles {
        if handle.await.unwrap() {
            applied += 1;
        }
    }
    assert_eq!(applied, 1);

    let stored = service.get_by_id(application.id).await.unwrap();
    assert!(stored.status.is_terminal());

    let statistics = service.statistics().await.unwrap();
    assert_eq!(statistics.approved + statistics.rejected, 1);
    assert_eq!(statistics.applied, 0);
}

#[tokio::test]
async fn test_terminal_application_is_frozen_for_owner() {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
    let service = LoanService::new(Arc::new(MockLoanRepository::new()), clock);

    let application = service.submit(3, details(4_000.0), Vec::new()).await.unwrap();
    let decided = service.decide(application.id, LoanEvent::Reject).await.unwrap();
    assert_eq!(decided.status, LoanStatus::Rejected);

    let update = service
        .update(application.id, 3, details(5_000.0), vec![salary()])
        .await;
    assert!(matches!(
        update,
        Err(DomainError::Loan(LoanError::NotEditable { .. }))
    ));

    let delete = service.delete(application.id, 3).await;
    assert!(matches!(
        delete,
        Err(DomainError::Loan(LoanError::NotEditable { .. }))
    ));

    assert_eq!(
        service.get_by_id(application.id).await.unwrap().details.requested_amount,
        4_000.0
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_recovery_end_to_end_with_concurrent_requests() {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new(4));
    let users = Arc::new(MockUserRepository::new());
    let notifier = Arc::new(CollectingNotifier::default());

    let accounts = AccountService::new(
        users.clone(),
        hasher.clone(),
        Arc::new(TokenService::new(TokenServiceConfig::default(), clock.clone())),
        clock.clone(),
    );
    accounts
        .register(Registration {
            username: "stella".to_string(),
            email: "stella@example.com".to_string(),
            password: "original-pass".to_string(),
            first_name: "Stella".to_string(),
            last_name: "Marsh".to_string(),
        })
        .await
        .unwrap();

    let recovery = Arc::new(CredentialRecoveryService::new(
        users,
        Arc::new(MockResetCodeRepository::new()),
        Arc::new(InMemoryRateLimiter::new(15, clock.clone())),
        notifier.clone(),
        hasher,
        clock,
        RecoveryServiceConfig::default(),
    ));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let recovery = recovery.clone();
        handles.push(tokio::spawn(async move {
            recovery.request_reset_code("stella@example.com").await
        }));
    }

    let mut issued = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => issued += 1,
            Err(DomainError::Recovery(RecoveryError::RateLimitExceeded { .. })) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(issued, 1);

    let code = {
        let bodies = notifier.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        bodies[0]
            .split(|c: char| !c.is_ascii_digit())
            .find(|chunk| chunk.len() == 6)
            .unwrap()
            .to_string()
    };

    recovery.verify_code("stella@example.com", &code).await.unwrap();
    recovery
        .reset_password("stella@example.com", &code, "changed-pass")
        .await
        .unwrap();

    assert!(accounts
        .login("stella", "changed-pass", lp_core::domain::entities::user::UserRole::Client)
        .await
        .is_ok());
    assert!(recovery.verify_code("stella@example.com", &code).await.is_err());
}
