// src/db/dashboard_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, FromRow, PgPool, Postgres};

use crate::{common::error::AppError, models::dashboard::DueRow};

// Raw window sums over contracts, straight from SQL.
#[derive(Debug, FromRow)]
pub struct ContractTotalsRow {
    pub current_amount: Decimal,
    pub previous_amount: Decimal,
    pub all_amount: Decimal,
    pub current_count: i64,
    pub previous_count: i64,
    pub all_count: i64,
}

#[derive(Debug, FromRow)]
pub struct CollectedTotalsRow {
    pub current_collected: Decimal,
    pub previous_collected: Decimal,
    pub all_collected: Decimal,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Loan totals and contract counts, bucketed by contract_date into
    // [previous_start, current_start) / [current_start, next_start) / all.
    pub async fn contract_totals<'e, E>(
        &self,
        executor: E,
        previous_start: NaiveDate,
        current_start: NaiveDate,
        next_start: NaiveDate,
    ) -> Result<ContractTotalsRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ContractTotalsRow>(
            r#"
            SELECT
                COALESCE(SUM(total_amount) FILTER (
                    WHERE contract_date >= $2 AND contract_date < $3), 0) AS current_amount,
                COALESCE(SUM(total_amount) FILTER (
                    WHERE contract_date >= $1 AND contract_date < $2), 0) AS previous_amount,
                COALESCE(SUM(total_amount), 0) AS all_amount,
                COUNT(*) FILTER (
                    WHERE contract_date >= $2 AND contract_date < $3) AS current_count,
                COUNT(*) FILTER (
                    WHERE contract_date >= $1 AND contract_date < $2) AS previous_count,
                COUNT(*) AS all_count
            FROM contracts
            WHERE deleted_at IS NULL
            "#,
        )
        .bind(previous_start)
        .bind(current_start)
        .bind(next_start)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    // Collected totals, bucketed by the payment timestamp. Rows never
    // paid have no paid_date and count only toward the all-time figure.
    pub async fn collected_totals<'e, E>(
        &self,
        executor: E,
        previous_start: DateTime<Utc>,
        current_start: DateTime<Utc>,
        next_start: DateTime<Utc>,
    ) -> Result<CollectedTotalsRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, CollectedTotalsRow>(
            r#"
            SELECT
                COALESCE(SUM(partial_amount) FILTER (
                    WHERE paid_date >= $2 AND paid_date < $3), 0) AS current_collected,
                COALESCE(SUM(partial_amount) FILTER (
                    WHERE paid_date >= $1 AND paid_date < $2), 0) AS previous_collected,
                COALESCE(SUM(partial_amount), 0) AS all_collected
            FROM transactions
            WHERE deleted_at IS NULL
            "#,
        )
        .bind(previous_start)
        .bind(current_start)
        .bind(next_start)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    // Outstanding balance: per contract, total_amount minus whatever its
    // installments have collected, summed over all active contracts.
    pub async fn outstanding_total<'e, E>(&self, executor: E) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(c.total_amount - COALESCE(t.collected, 0)), 0)
            FROM contracts c
            LEFT JOIN (
                SELECT contract_id, SUM(partial_amount) AS collected
                FROM transactions
                WHERE deleted_at IS NULL
                GROUP BY contract_id
            ) t ON t.contract_id = c.id
            WHERE c.deleted_at IS NULL
            "#,
        )
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    // All three aggregate queries inside one transaction, so the summary
    // is a consistent snapshot.
    pub async fn fetch_totals<'e, A>(
        &self,
        conn: A,
        previous_start: NaiveDate,
        current_start: NaiveDate,
        next_start: NaiveDate,
    ) -> Result<(ContractTotalsRow, CollectedTotalsRow, Decimal), AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        let contracts = self
            .contract_totals(&mut *tx, previous_start, current_start, next_start)
            .await?;
        let collected = self
            .collected_totals(
                &mut *tx,
                day_start_utc(previous_start),
                day_start_utc(current_start),
                day_start_utc(next_start),
            )
            .await?;
        let outstanding = self.outstanding_total(&mut *tx).await?;

        tx.commit().await?;

        Ok((contracts, collected, outstanding))
    }

    // Unpaid installments joined to their active contract and customer,
    // the input of the due-date classifier.
    pub async fn fetch_due_rows<'e, E>(&self, executor: E) -> Result<Vec<DueRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, DueRow>(
            r#"
            SELECT
                t.id AS transaction_id,
                t.amount,
                t.partial_amount,
                t.due_date,
                t.paid_status,
                c.id AS contract_id,
                c.contract_code,
                c.contract_date,
                u.name AS customer_name,
                u.phones
            FROM transactions t
            JOIN contracts c ON c.id = t.contract_id
            JOIN users u ON u.id = c.user_id
            WHERE t.paid_status <> 'PAID_ALL'
              AND t.deleted_at IS NULL
              AND c.deleted_at IS NULL
            ORDER BY t.due_date ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}

fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
