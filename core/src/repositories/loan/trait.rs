//! Loan application repository trait.
//!
//! Every mutation of an existing application is conditional on its current
//! status so that concurrent writers cannot both win: the caller states the
//! status it observed and the write only lands if the stored row still has
//! it. Implementations report a lost race as `Ok(false)`, never as an error.

use async_trait::async_trait;

use crate::domain::entities::loan_application::{LoanApplication, LoanStatus, NewLoanApplication};
use crate::domain::value_objects::LoanStatistics;
use crate::errors::DomainError;

#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Persist a new application with its incomes and return it with its id
    async fn create(&self, application: NewLoanApplication) -> Result<LoanApplication, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<LoanApplication>, DomainError>;

    /// Applications owned by `owner_id`, newest id first
    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<LoanApplication>, DomainError>;

    /// Every application, newest id first
    async fn find_all(&self) -> Result<Vec<LoanApplication>, DomainError>;

    /// Replace the content fields and the full income list of
    /// `application.id` in one atomic step, only if the stored status is
    /// `expected`. Status, owner and creation time are never touched.
    async fn update_if_status(
        &self,
        application: &LoanApplication,
        expected: LoanStatus,
    ) -> Result<bool, DomainError>;

    /// Delete the application and its incomes, only if the stored status is `expected`
    async fn delete_if_status(&self, id: i64, expected: LoanStatus) -> Result<bool, DomainError>;

    /// Move `id` from `expected` to `new_status`; `false` if the stored status differs
    async fn compare_and_set_status(
        &self,
        id: i64,
        expected: LoanStatus,
        new_status: LoanStatus,
    ) -> Result<bool, DomainError>;

    /// Application count for every status
    async fn count_by_status(&self) -> Result<LoanStatistics, DomainError>;
}
