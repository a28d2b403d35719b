//! Loan application entity and its lifecycle state machine.
//!
//! ```text
//! Applied --evaluate--> Evaluation
//! Applied --approve---> Approved      Evaluation --approve--> Approved
//! Applied --reject----> Rejected      Evaluation --reject---> Rejected
//! ```
//!
//! Approved and Rejected are terminal: no edits, no transitions, no deletion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::LoanError;

/// Status of a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Applied,
    Evaluation,
    Approved,
    Rejected,
}

impl LoanStatus {
    /// Every status, in lifecycle order
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Applied,
        LoanStatus::Evaluation,
        LoanStatus::Approved,
        LoanStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Evaluation => "Evaluation",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Only freshly applied applications accept content edits or deletion
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The transition table. `None` means the event is not allowed here.
    pub fn next(&self, event: LoanEvent) -> Option<LoanStatus> {
        match (self, event) {
            (Self::Applied, LoanEvent::Evaluate) => Some(Self::Evaluation),
            (Self::Applied | Self::Evaluation, LoanEvent::Approve) => Some(Self::Approved),
            (Self::Applied | Self::Evaluation, LoanEvent::Reject) => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown loan status: {}", s))
    }
}

/// Employee decision applied to an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanEvent {
    Evaluate,
    Approve,
    Reject,
}

impl LoanEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluate => "evaluate",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for LoanEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "evaluate" => Ok(Self::Evaluate),
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(format!("Unknown loan event: {}", other)),
        }
    }
}

/// Applicant-editable content of an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    pub father_name: String,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub phone_number: String,
    pub education_level: String,
    pub marital_status: String,
    pub requested_amount: f64,
    pub currency: String,
    pub duration_months: i32,
    pub loan_type: String,
}

/// A declared income source; owned by exactly one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub income_type: String,
    pub amount: f64,
    pub currency: String,
    pub since: NaiveDate,
}

/// Loan application entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    /// Store-assigned, increasing identifier
    pub id: i64,

    /// Id of the client who submitted the application
    pub owner_id: i64,

    #[serde(flatten)]
    pub details: LoanDetails,

    pub incomes: Vec<Income>,

    pub status: LoanStatus,

    /// Set once at submission
    pub created_at: DateTime<Utc>,
}

impl LoanApplication {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// Guard for client-side update and delete
    pub fn ensure_editable_by(&self, user_id: i64) -> Result<(), LoanError> {
        if !self.is_owned_by(user_id) {
            return Err(LoanError::NotOwner { id: self.id });
        }
        if !self.status.is_editable() {
            return Err(LoanError::NotEditable {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

/// Application data prior to persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoanApplication {
    pub owner_id: i64,
    pub details: LoanDetails,
    pub incomes: Vec<Income>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl NewLoanApplication {
    /// A fresh submission always starts in `Applied`
    pub fn submitted(
        owner_id: i64,
        details: LoanDetails,
        incomes: Vec<Income>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            owner_id,
            details,
            incomes,
            status: LoanStatus::Applied,
            created_at,
        }
    }

    /// Attach the store-assigned id
    pub fn into_application(self, id: i64) -> LoanApplication {
        LoanApplication {
            id,
            owner_id: self.owner_id,
            details: self.details,
            incomes: self.incomes,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [LoanEvent; 3] = [LoanEvent::Evaluate, LoanEvent::Approve, LoanEvent::Reject];

    fn sample_application(status: LoanStatus) -> LoanApplication {
        LoanApplication {
            id: 1,
            owner_id: 10,
            details: LoanDetails {
                father_name: "Ion".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
                birth_place: "Cluj".to_string(),
                phone_number: "0700000000".to_string(),
                education_level: "University".to_string(),
                marital_status: "Single".to_string(),
                requested_amount: 25_000.0,
                currency: "EUR".to_string(),
                duration_months: 48,
                loan_type: "Personal".to_string(),
            },
            incomes: vec![],
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_terminal_statuses_reject_every_event() {
        for status in [LoanStatus::Approved, LoanStatus::Rejected] {
            assert!(status.is_terminal());
            for event in EVENTS {
                assert_eq!(status.next(event), None, "{status} accepted {event}");
            }
        }
    }

    #[test]
    fn test_evaluate_only_from_applied() {
        for status in LoanStatus::ALL {
            let expected = (status == LoanStatus::Applied).then_some(LoanStatus::Evaluation);
            assert_eq!(status.next(LoanEvent::Evaluate), expected);
        }
    }

    #[test]
    fn test_decisions_from_open_statuses() {
        for status in [LoanStatus::Applied, LoanStatus::Evaluation] {
            assert_eq!(status.next(LoanEvent::Approve), Some(LoanStatus::Approved));
            assert_eq!(status.next(LoanEvent::Reject), Some(LoanStatus::Rejected));
        }
    }

    #[test]
    fn test_only_applied_is_editable() {
        let editable: Vec<_> = LoanStatus::ALL.into_iter().filter(|s| s.is_editable()).collect();
        assert_eq!(editable, vec![LoanStatus::Applied]);
    }

    #[test]
    fn test_status_and_event_parse() {
        assert_eq!("Evaluation".parse::<LoanStatus>(), Ok(LoanStatus::Evaluation));
        assert!("evaluation".parse::<LoanStatus>().is_err());
        assert_eq!("approve".parse::<LoanEvent>(), Ok(LoanEvent::Approve));
        assert!("cancel".parse::<LoanEvent>().is_err());
    }

    #[test]
    fn test_ensure_editable_by() {
        let app = sample_application(LoanStatus::Applied);
        assert!(app.ensure_editable_by(10).is_ok());
        assert_eq!(
            app.ensure_editable_by(11),
            Err(LoanError::NotOwner { id: 1 })
        );

        let app = sample_application(LoanStatus::Evaluation);
        assert_eq!(
            app.ensure_editable_by(10),
            Err(LoanError::NotEditable {
                id: 1,
                status: LoanStatus::Evaluation
            })
        );
    }

    #[test]
    fn test_serializes_flat_with_status_name() {
        let json = serde_json::to_value(sample_application(LoanStatus::Applied)).unwrap();
        assert_eq!(json["status"], "Applied");
        assert_eq!(json["father_name"], "Ion");
        assert_eq!(json["birth_date"], "1990-05-17");
    }
}
