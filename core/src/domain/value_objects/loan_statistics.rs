//! Per-status application counts for the employee dashboard.

use serde::{Deserialize, Serialize};

use crate::domain::entities::loan_application::LoanStatus;

/// Count of applications per status; every status is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanStatistics {
    #[serde(rename = "Applied")]
    pub applied: u64,
    #[serde(rename = "Evaluation")]
    pub evaluation: u64,
    #[serde(rename = "Approved")]
    pub approved: u64,
    #[serde(rename = "Rejected")]
    pub rejected: u64,
}

impl LoanStatistics {
    /// Build from `(status, count)` pairs; missing statuses count as zero
    pub fn from_counts(counts: impl IntoIterator<Item = (LoanStatus, u64)>) -> Self {
        let mut stats = Self::default();
        for (status, count) in counts {
            *stats.slot(status) += count;
        }
        stats
    }

    pub fn get(&self, status: LoanStatus) -> u64 {
        match status {
            LoanStatus::Applied => self.applied,
            LoanStatus::Evaluation => self.evaluation,
            LoanStatus::Approved => self.approved,
            LoanStatus::Rejected => self.rejected,
        }
    }

    pub fn total(&self) -> u64 {
        LoanStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }

    fn slot(&mut self, status: LoanStatus) -> &mut u64 {
        match status {
            LoanStatus::Applied => &mut self.applied,
            LoanStatus::Evaluation => &mut self.evaluation,
            LoanStatus::Approved => &mut self.approved,
            LoanStatus::Rejected => &mut self.rejected,
        }
    }
}
