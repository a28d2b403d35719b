//! Tests for the in-memory reset code repository

use chrono::{Duration, Utc};

use crate::domain::entities::reset_code::ResetCode;
use crate::repositories::reset_code::{MockResetCodeRepository, ResetCodeRepository};

#[tokio::test]
async fn test_find_returns_newest_first() {
    let repo = MockResetCodeRepository::new();
    let now = Utc::now();
    let older = ResetCode::with_code(1, "111111".to_string(), now, 10);
    let newer = ResetCode::with_code(1, "111111".to_string(), now + Duration::minutes(1), 10);
    let other_user = ResetCode::with_code(2, "111111".to_string(), now, 10);

    for code in [&older, &newer, &other_user] {
        repo.create(code).await.unwrap();
    }

    let found = repo.find_by_user_and_code(1, "111111").await.unwrap();
    assert_eq!(found, vec![newer, older]);
}

#[tokio::test]
async fn test_claim_succeeds_once() {
    let repo = MockResetCodeRepository::new();
    let now = Utc::now();
    let code = ResetCode::with_code(1, "222222".to_string(), now, 10);
    repo.create(&code).await.unwrap();

    assert!(repo.claim(code.id, now).await.unwrap());
    assert!(!repo.claim(code.id, now).await.unwrap());

    let stored = repo.find_by_user_and_code(1, "222222").await.unwrap();
    assert!(stored[0].is_used);
}

#[tokio::test]
async fn test_claim_rejects_expired() {
    let repo = MockResetCodeRepository::new();
    let now = Utc::now();
    let code = ResetCode::with_code(1, "333333".to_string(), now, 10);
    repo.create(&code).await.unwrap();

    assert!(!repo.claim(code.id, now + Duration::minutes(11)).await.unwrap());
    assert!(!repo.codes_for_user(1).await[0].is_used);
}

#[tokio::test]
async fn test_release_makes_claimed_code_spendable() {
    let repo = MockResetCodeRepository::new();
    let now = Utc::now();
    let code = ResetCode::with_code(1, "444444".to_string(), now, 10);
    repo.create(&code).await.unwrap();

    assert!(repo.claim(code.id, now).await.unwrap());
    repo.release(code.id).await.unwrap();
    assert!(!repo.codes_for_user(1).await[0].is_used);
    assert!(repo.claim(code.id, now).await.unwrap());
}
