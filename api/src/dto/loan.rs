use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use lp_core::domain::entities::loan_application::{Income, LoanDetails};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IncomeRequest {
    #[validate(length(min = 1, max = 64))]
    pub income_type: String,

    #[validate(range(min = 0.0))]
    pub amount: f64,

    #[validate(length(min = 3, max = 8))]
    pub currency: String,

    pub since: NaiveDate,
}

impl From<IncomeRequest> for Income {
    fn from(request: IncomeRequest) -> Self {
        Income {
            income_type: request.income_type,
            amount: request.amount,
            currency: request.currency,
            since: request.since,
        }
    }
}

/// Body of `POST /api/client/apply` and `PUT /api/client/loans/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoanApplicationRequest {
    #[validate(length(min = 1, max = 100))]
    pub father_name: String,

    pub birth_date: NaiveDate,

    #[validate(length(min = 1, max = 100))]
    pub birth_place: String,

    #[validate(length(min = 5, max = 32))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 64))]
    pub education_level: String,

    #[validate(length(min = 1, max = 32))]
    pub marital_status: String,

    #[validate(range(min = 1.0))]
    pub requested_amount: f64,

    #[validate(length(min = 3, max = 8))]
    pub currency: String,

    #[validate(range(min = 1, max = 480))]
    pub duration_months: i32,

    #[validate(length(min = 1, max = 64))]
    pub loan_type: String,

    #[serde(default)]
    #[validate]
    pub incomes: Vec<IncomeRequest>,
}

impl LoanApplicationRequest {
    pub fn into_parts(self) -> (LoanDetails, Vec<Income>) {
        let details = LoanDetails {
            father_name: self.father_name,
            birth_date: self.birth_date,
            birth_place: self.birth_place,
            phone_number: self.phone_number,
            education_level: self.education_level,
            marital_status: self.marital_status,
            requested_amount: self.requested_amount,
            currency: self.currency,
            duration_months: self.duration_months,
            loan_type: self.loan_type,
        };
        let incomes = self.incomes.into_iter().map(Income::from).collect();
        (details, incomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LoanApplicationRequest {
        LoanApplicationRequest {
            father_name: "John".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            birth_place: "Athens".to_string(),
            phone_number: "+302101234567".to_string(),
            education_level: "Bachelor".to_string(),
            marital_status: "Single".to_string(),
            requested_amount: 15_000.0,
            currency: "EUR".to_string(),
            duration_months: 36,
            loan_type: "Personal".to_string(),
            incomes: vec![IncomeRequest {
                income_type: "Salary".to_string(),
                amount: 2_000.0,
                currency: "EUR".to_string(),
                since: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            }],
        }
    }

    #[test]
    fn test_into_parts_keeps_income_order() {
        let mut request = request();
        request.incomes.push(IncomeRequest {
            income_type: "Rent".to_string(),
            amount: 300.0,
            currency: "EUR".to_string(),
            since: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        });

        let (details, incomes) = request.into_parts();
        assert_eq!(details.duration_months, 36);
        assert_eq!(incomes.len(), 2);
        assert_eq!(incomes[1].income_type, "Rent");
    }

    #[test]
    fn test_nested_income_is_validated() {
        let mut request = request();
        request.incomes[0].amount = -5.0;

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let mut request = request();
        request.duration_months = 0;

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("duration_months"));
    }
}
