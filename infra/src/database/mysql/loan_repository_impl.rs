//! MySQL implementation of the LoanRepository trait.
//!
//! Applications live in `loan_applications`, their incomes in `incomes`
//! (cascade-deleted with the parent). Writes that touch both tables run in
//! one transaction, and so do the reads that join them. Status-conditional
//! writes lock the parent row first so the status check and the write see
//! the same version.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{
    mysql::MySqlRow, pool::PoolConnection, Executor, MySql, MySqlConnection, MySqlPool, Row,
};

use lp_core::domain::entities::loan_application::{
    Income, LoanApplication, LoanDetails, LoanStatus, NewLoanApplication,
};
use lp_core::domain::value_objects::LoanStatistics;
use lp_core::errors::DomainError;
use lp_core::repositories::LoanRepository;

use super::{column_error, db_error};

const SELECT_APPLICATION: &str = "SELECT id, owner_id, father_name, birth_date, birth_place, \
     phone_number, education_level, marital_status, requested_amount, currency, duration_months, \
     loan_type, status, created_at FROM loan_applications";

/// MySQL implementation of LoanRepository
pub struct MySqlLoanRepository {
    pool: MySqlPool,
}

impl MySqlLoanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_application(row: &MySqlRow) -> Result<LoanApplication, DomainError> {
        let status: String = row.try_get("status").map_err(|e| column_error("status", e))?;

        Ok(LoanApplication {
            id: row.try_get("id").map_err(|e| column_error("id", e))?,
            owner_id: row.try_get("owner_id").map_err(|e| column_error("owner_id", e))?,
            details: LoanDetails {
                father_name: row.try_get("father_name").map_err(|e| column_error("father_name", e))?,
                birth_date: row
                    .try_get::<NaiveDate, _>("birth_date")
                    .map_err(|e| column_error("birth_date", e))?,
                birth_place: row.try_get("birth_place").map_err(|e| column_error("birth_place", e))?,
                phone_number: row
                    .try_get("phone_number")
                    .map_err(|e| column_error("phone_number", e))?,
                education_level: row
                    .try_get("education_level")
                    .map_err(|e| column_error("education_level", e))?,
                marital_status: row
                    .try_get("marital_status")
                    .map_err(|e| column_error("marital_status", e))?,
                requested_amount: row
                    .try_get("requested_amount")
                    .map_err(|e| column_error("requested_amount", e))?,
                currency: row.try_get("currency").map_err(|e| column_error("currency", e))?,
                duration_months: row
                    .try_get("duration_months")
                    .map_err(|e| column_error("duration_months", e))?,
                loan_type: row.try_get("loan_type").map_err(|e| column_error("loan_type", e))?,
            },
            incomes: Vec::new(),
            status: status.parse::<LoanStatus>().map_err(|e| column_error("status", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
        })
    }

    fn row_to_income(row: &MySqlRow) -> Result<(i64, Income), DomainError> {
        let application_id: i64 = row
            .try_get("loan_application_id")
            .map_err(|e| column_error("loan_application_id", e))?;

        Ok((
            application_id,
            Income {
                income_type: row.try_get("income_type").map_err(|e| column_error("income_type", e))?,
                amount: row.try_get("amount").map_err(|e| column_error("amount", e))?,
                currency: row.try_get("currency").map_err(|e| column_error("currency", e))?,
                since: row
                    .try_get::<NaiveDate, _>("since")
                    .map_err(|e| column_error("since", e))?,
            },
        ))
    }

    /// Load applications matching `filter` with their incomes, newest id first
    async fn load(&self, filter: Option<i64>) -> Result<Vec<LoanApplication>, DomainError> {
        let (application_sql, income_sql) = match filter {
            Some(_) => (
                format!("{} WHERE owner_id = ? ORDER BY id DESC", SELECT_APPLICATION),
                "SELECT i.loan_application_id, i.income_type, i.amount, i.currency, i.since \
                 FROM incomes i JOIN loan_applications a ON a.id = i.loan_application_id \
                 WHERE a.owner_id = ? ORDER BY i.id"
                    .to_string(),
            ),
            None => (
                format!("{} ORDER BY id DESC", SELECT_APPLICATION),
                "SELECT loan_application_id, income_type, amount, currency, since \
                 FROM incomes ORDER BY id"
                    .to_string(),
            ),
        };

        let mut application_query = sqlx::query(&application_sql);
        let mut income_query = sqlx::query(&income_sql);
        if let Some(owner_id) = filter {
            application_query = application_query.bind(owner_id);
            income_query = income_query.bind(owner_id);
        }

        let mut conn = self.snapshot_connection().await?;
        let mut tx = sqlx::Connection::begin(&mut *conn)
            .await
            .map_err(|e| db_error("begin loan read", e))?;
        let application_rows = application_query
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| db_error("list loan applications", e))?;
        let income_rows = income_query
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| db_error("list incomes", e))?;
        tx.commit().await.map_err(|e| db_error("commit loan read", e))?;

        let mut incomes: HashMap<i64, Vec<Income>> = HashMap::new();
        for row in &income_rows {
            let (application_id, income) = Self::row_to_income(row)?;
            incomes.entry(application_id).or_default().push(income);
        }

        application_rows
            .iter()
            .map(|row| {
                let mut application = Self::row_to_application(row)?;
                application.incomes = incomes.remove(&application.id).unwrap_or_default();
                Ok(application)
            })
            .collect()
    }

    /// A pooled connection whose next transaction reads from one snapshot,
    /// so an application and its incomes come from the same committed state
    /// whatever the server's default isolation level.
    async fn snapshot_connection(&self) -> Result<PoolConnection<MySql>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| db_error("acquire connection", e))?;
        (&mut *conn)
            .execute("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .await
            .map_err(|e| db_error("set read isolation", e))?;
        Ok(conn)
    }

    async fn insert_incomes(
        conn: &mut MySqlConnection,
        application_id: i64,
        incomes: &[Income],
    ) -> Result<(), DomainError> {
        for income in incomes {
            sqlx::query(
                "INSERT INTO incomes (loan_application_id, income_type, amount, currency, since) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(application_id)
            .bind(&income.income_type)
            .bind(income.amount)
            .bind(&income.currency)
            .bind(income.since)
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error("insert income", e))?;
        }
        Ok(())
    }

    /// Lock the row and report whether its status is still `expected`
    async fn lock_with_status(
        conn: &mut MySqlConnection,
        id: i64,
        expected: LoanStatus,
    ) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT status FROM loan_applications WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| db_error("lock loan application", e))?;

        match row {
            Some(row) => {
                let status: String = row.try_get("status").map_err(|e| column_error("status", e))?;
                Ok(status == expected.as_str())
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl LoanRepository for MySqlLoanRepository {
    async fn create(&self, application: NewLoanApplication) -> Result<LoanApplication, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        let details = &application.details;
        let result = sqlx::query(
            r#"
            INSERT INTO loan_applications (
                owner_id, father_name, birth_date, birth_place, phone_number, education_level,
                marital_status, requested_amount, currency, duration_months, loan_type,
                status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(application.owner_id)
        .bind(&details.father_name)
        .bind(details.birth_date)
        .bind(&details.birth_place)
        .bind(&details.phone_number)
        .bind(&details.education_level)
        .bind(&details.marital_status)
        .bind(details.requested_amount)
        .bind(&details.currency)
        .bind(details.duration_months)
        .bind(&details.loan_type)
        .bind(application.status.as_str())
        .bind(application.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("create loan application", e))?;

        let id = result.last_insert_id() as i64;
        Self::insert_incomes(&mut *tx, id, &application.incomes).await?;

        tx.commit().await.map_err(|e| db_error("commit loan application", e))?;
        Ok(application.into_application(id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LoanApplication>, DomainError> {
        let mut conn = self.snapshot_connection().await?;
        let mut tx = sqlx::Connection::begin(&mut *conn)
            .await
            .map_err(|e| db_error("begin loan read", e))?;

        let query = format!("{} WHERE id = ?", SELECT_APPLICATION);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("find loan application", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut application = Self::row_to_application(&row)?;

        let income_rows = sqlx::query(
            "SELECT loan_application_id, income_type, amount, currency, since \
             FROM incomes WHERE loan_application_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("find incomes", e))?;
        tx.commit().await.map_err(|e| db_error("commit loan read", e))?;

        application.incomes = income_rows
            .iter()
            .map(|row| Self::row_to_income(row).map(|(_, income)| income))
            .collect::<Result<_, _>>()?;

        Ok(Some(application))
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<LoanApplication>, DomainError> {
        self.load(Some(owner_id)).await
    }

    async fn find_all(&self) -> Result<Vec<LoanApplication>, DomainError> {
        self.load(None).await
    }

    async fn update_if_status(
        &self,
        application: &LoanApplication,
        expected: LoanStatus,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        if !Self::lock_with_status(&mut *tx, application.id, expected).await? {
            return Ok(false);
        }

        let details = &application.details;
        sqlx::query(
            r#"
            UPDATE loan_applications
            SET father_name = ?, birth_date = ?, birth_place = ?, phone_number = ?,
                education_level = ?, marital_status = ?, requested_amount = ?, currency = ?,
                duration_months = ?, loan_type = ?
            WHERE id = ?
            "#,
        )
        .bind(&details.father_name)
        .bind(details.birth_date)
        .bind(&details.birth_place)
        .bind(&details.phone_number)
        .bind(&details.education_level)
        .bind(&details.marital_status)
        .bind(details.requested_amount)
        .bind(&details.currency)
        .bind(details.duration_months)
        .bind(&details.loan_type)
        .bind(application.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("update loan application", e))?;

        sqlx::query("DELETE FROM incomes WHERE loan_application_id = ?")
            .bind(application.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("replace incomes", e))?;
        Self::insert_incomes(&mut *tx, application.id, &application.incomes).await?;

        tx.commit().await.map_err(|e| db_error("commit loan update", e))?;
        Ok(true)
    }

    async fn delete_if_status(&self, id: i64, expected: LoanStatus) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        if !Self::lock_with_status(&mut *tx, id, expected).await? {
            return Ok(false);
        }

        sqlx::query("DELETE FROM loan_applications WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("delete loan application", e))?;

        tx.commit().await.map_err(|e| db_error("commit loan delete", e))?;
        Ok(true)
    }

    async fn compare_and_set_status(
        &self,
        id: i64,
        expected: LoanStatus,
        new_status: LoanStatus,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE loan_applications SET status = ? WHERE id = ? AND status = ?")
            .bind(new_status.as_str())
            .bind(id)
            .bind(expected.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update loan status", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_by_status(&self) -> Result<LoanStatistics, DomainError> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS total FROM loan_applications GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("count loan applications", e))?;

        let mut counts = Vec::with_capacity(rows.len());
        for row in &rows {
            let status: String = row.try_get("status").map_err(|e| column_error("status", e))?;
            let total: i64 = row.try_get("total").map_err(|e| column_error("total", e))?;
            let status = status.parse::<LoanStatus>().map_err(|e| column_error("status", e))?;
            counts.push((status, total.max(0) as u64));
        }

        Ok(LoanStatistics::from_counts(counts))
    }
}
