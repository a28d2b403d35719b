use std::sync::Arc;

use crate::domain::entities::loan_application::{
    Income, LoanApplication, LoanDetails, LoanEvent, LoanStatus, NewLoanApplication,
};
use crate::domain::value_objects::LoanStatistics;
use crate::errors::{DomainError, DomainResult, LoanError};
use crate::repositories::LoanRepository;
use crate::services::clock::Clock;

pub struct LoanService<L: LoanRepository> {
    repository: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L: LoanRepository> LoanService<L> {
    pub fn new(repository: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Submit a new application in `Applied`
    pub async fn submit(
        &self,
        owner_id: i64,
        details: LoanDetails,
        incomes: Vec<Income>,
    ) -> DomainResult<LoanApplication> {
        let application = self
            .repository
            .create(NewLoanApplication::submitted(
                owner_id,
                details,
                incomes,
                self.clock.now(),
            ))
            .await?;

        tracing::info!(
            loan_id = application.id,
            owner_id = owner_id,
            event = "loan_submitted",
            "Loan application submitted"
        );
        Ok(application)
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<LoanApplication> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| LoanError::NotFound { id }.into())
    }

    /// Read guard for the client surface
    pub async fn get_owned(&self, id: i64, requester_id: i64) -> DomainResult<LoanApplication> {
        let application = self.get_by_id(id).await?;
        if !application.is_owned_by(requester_id) {
            tracing::warn!(
                loan_id = id,
                requester_id = requester_id,
                event = "loan_access_denied",
                "Non-owner attempted to read loan application"
            );
            return Err(LoanError::NotOwner { id }.into());
        }
        Ok(application)
    }

    /// Newest first
    pub async fn list_by_owner(&self, owner_id: i64) -> DomainResult<Vec<LoanApplication>> {
        self.repository.find_by_owner(owner_id).await
    }

    /// Employee queue, newest first
    pub async fn list_all(&self) -> DomainResult<Vec<LoanApplication>> {
        self.repository.find_all().await
    }

    /// Replace the content fields and the income list.
    ///
    /// # Errors
    /// * `LoanError::NotFound` - No such application
    /// * `LoanError::NotOwner` - Requester is not the owner
    /// * `LoanError::NotEditable` - Status is past `Applied`
    /// * `LoanError::InvalidStateTransition` - Status changed between read and write
    pub async fn update(
        &self,
        id: i64,
        requester_id: i64,
        details: LoanDetails,
        incomes: Vec<Income>,
    ) -> DomainResult<LoanApplication> {
        let mut application = self.get_by_id(id).await?;
        self.guard_edit(&application, requester_id, "update")?;

        application.details = details;
        application.incomes = incomes;

        if !self
            .repository
            .update_if_status(&application, LoanStatus::Applied)
            .await?
        {
            return Err(self.lost_race(id, application.status).await);
        }

        tracing::info!(
            loan_id = id,
            owner_id = requester_id,
            event = "loan_updated",
            "Loan application updated"
        );
        Ok(application)
    }

    /// Delete an application together with its incomes; same guard as `update`
    pub async fn delete(&self, id: i64, requester_id: i64) -> DomainResult<()> {
        let application = self.get_by_id(id).await?;
        self.guard_edit(&application, requester_id, "delete")?;

        if !self
            .repository
            .delete_if_status(id, LoanStatus::Applied)
            .await?
        {
            return Err(self.lost_race(id, application.status).await);
        }

        tracing::info!(
            loan_id = id,
            owner_id = requester_id,
            event = "loan_deleted",
            "Loan application deleted"
        );
        Ok(())
    }

    /// Apply an employee decision.
    ///
    /// Returns `false` without mutating anything when the application is
    /// missing, the event is not allowed from its current status, or another
    /// transition won the race.
    pub async fn transition(&self, id: i64, event: LoanEvent) -> DomainResult<bool> {
        let Some(application) = self.repository.find_by_id(id).await? else {
            tracing::debug!(
                loan_id = id,
                loan_event = %event,
                event = "loan_transition_missing",
                "Transition on missing loan application"
            );
            return Ok(false);
        };

        let from = application.status;
        let Some(to) = from.next(event) else {
            tracing::warn!(
                loan_id = id,
                loan_event = %event,
                from = %from,
                event = "loan_transition_rejected",
                "Transition not allowed from current status"
            );
            return Ok(false);
        };

        let applied = self
            .repository
            .compare_and_set_status(id, from, to)
            .await?;

        if applied {
            tracing::info!(
                loan_id = id,
                from = %from,
                to = %to,
                event = "loan_status_changed",
                "Loan application status changed"
            );
        } else {
            tracing::warn!(
                loan_id = id,
                loan_event = %event,
                from = %from,
                event = "loan_transition_conflict",
                "Concurrent status change detected"
            );
        }
        Ok(applied)
    }

    /// `transition` for callers that need the outcome as a typed result.
    ///
    /// # Errors
    /// * `LoanError::NotFound` - No such application
    /// * `LoanError::InvalidStateTransition` - The event was not applied
    pub async fn decide(&self, id: i64, event: LoanEvent) -> DomainResult<LoanApplication> {
        let applied = self.transition(id, event).await?;
        let application = self.get_by_id(id).await?;
        if !applied {
            return Err(LoanError::InvalidStateTransition {
                id,
                from: application.status,
                event,
            }
            .into());
        }
        Ok(application)
    }

    /// Counts per status; every status is present
    pub async fn statistics(&self) -> DomainResult<LoanStatistics> {
        self.repository.count_by_status().await
    }

    fn guard_edit(
        &self,
        application: &LoanApplication,
        requester_id: i64,
        action: &'static str,
    ) -> Result<(), LoanError> {
        application.ensure_editable_by(requester_id).map_err(|err| {
            tracing::warn!(
                loan_id = application.id,
                requester_id = requester_id,
                status = %application.status,
                action = action,
                event = "loan_edit_denied",
                "Loan application edit denied"
            );
            err
        })
    }

    async fn lost_race(&self, id: i64, observed: LoanStatus) -> DomainError {
        let current = match self.repository.find_by_id(id).await {
            Ok(Some(app)) => app.status,
            Ok(None) => return LoanError::NotFound { id }.into(),
            Err(err) => return err,
        };
        tracing::warn!(
            loan_id = id,
            observed = %observed,
            current = %current,
            event = "loan_edit_conflict",
            "Loan application changed during edit"
        );
        LoanError::ConcurrentModification { id, status: current }.into()
    }
}
