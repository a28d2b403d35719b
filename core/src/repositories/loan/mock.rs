//! In-memory implementation of LoanRepository for tests and local runs

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::loan_application::{LoanApplication, LoanStatus, NewLoanApplication};
use crate::domain::value_objects::LoanStatistics;
use crate::errors::DomainError;

use super::trait_::LoanRepository;

/// Mock loan repository; every conditional write runs under one write lock
#[derive(Clone)]
pub struct MockLoanRepository {
    applications: Arc<RwLock<BTreeMap<i64, LoanApplication>>>,
    next_id: Arc<AtomicI64>,
}

impl MockLoanRepository {
    pub fn new() -> Self {
        Self {
            applications: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Force a stored status, bypassing the state machine
    pub async fn set_status(&self, id: i64, status: LoanStatus) {
        if let Some(app) = self.applications.write().await.get_mut(&id) {
            app.status = status;
        }
    }
}

impl Default for MockLoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRepository for MockLoanRepository {
    async fn create(&self, application: NewLoanApplication) -> Result<LoanApplication, DomainError> {
        let mut applications = self.applications.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let application = application.into_application(id);
        applications.insert(id, application.clone());
        Ok(application)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LoanApplication>, DomainError> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<LoanApplication>, DomainError> {
        let applications = self.applications.read().await;
        Ok(applications
            .values()
            .rev()
            .filter(|app| app.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<LoanApplication>, DomainError> {
        let applications = self.applications.read().await;
        Ok(applications.values().rev().cloned().collect())
    }

    async fn update_if_status(
        &self,
        application: &LoanApplication,
        expected: LoanStatus,
    ) -> Result<bool, DomainError> {
        let mut applications = self.applications.write().await;
        match applications.get_mut(&application.id) {
            Some(stored) if stored.status == expected => {
                stored.details = application.details.clone();
                stored.incomes = application.incomes.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_status(&self, id: i64, expected: LoanStatus) -> Result<bool, DomainError> {
        let mut applications = self.applications.write().await;
        match applications.get(&id) {
            Some(stored) if stored.status == expected => {
                applications.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn compare_and_set_status(
        &self,
        id: i64,
        expected: LoanStatus,
        new_status: LoanStatus,
    ) -> Result<bool, DomainError> {
        let mut applications = self.applications.write().await;
        match applications.get_mut(&id) {
            Some(stored) if stored.status == expected => {
                stored.status = new_status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_by_status(&self) -> Result<LoanStatistics, DomainError> {
        let applications = self.applications.read().await;
        Ok(LoanStatistics::from_counts(
            applications.values().map(|app| (app.status, 1)),
        ))
    }
}
