// src/db/transaction_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::transaction::{PaidStatus, Transaction},
    schedule::Installment,
};

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_active_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_txn = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(maybe_txn)
    }

    pub async fn find_for_contract<'e, E>(
        &self,
        executor: E,
        contract_id: Uuid,
    ) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let txns = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE contract_id = $1 AND deleted_at IS NULL
            ORDER BY position ASC
            "#,
        )
        .bind(contract_id)
        .fetch_all(executor)
        .await?;

        Ok(txns)
    }

    // Inserts one row per installment, in schedule order. Runs on the
    // caller's connection so it stays inside the creation transaction.
    pub async fn insert_installments(
        &self,
        conn: &mut PgConnection,
        contract_id: Uuid,
        user_id: Uuid,
        installments: &[Installment],
    ) -> Result<Vec<Transaction>, AppError> {
        let mut created = Vec::with_capacity(installments.len());

        for (i, installment) in installments.iter().enumerate() {
            let txn = sqlx::query_as::<_, Transaction>(
                r#"
                INSERT INTO transactions (contract_id, user_id, position, amount, due_date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(contract_id)
            .bind(user_id)
            .bind(i as i32 + 1)
            .bind(installment.amount)
            .bind(installment.due_date)
            .fetch_one(&mut *conn)
            .await?;

            created.push(txn);
        }

        Ok(created)
    }

    // Overwrites the payment fields of one installment and stamps the
    // paid/updated time.
    pub async fn apply_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        amount: Decimal,
        partial_amount: Decimal,
        paid_status: PaidStatus,
        paid_at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_txn = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET amount = $2,
                partial_amount = $3,
                paid_status = $4,
                paid_date = $5,
                updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(partial_amount)
        .bind(paid_status)
        .bind(paid_at)
        .fetch_optional(executor)
        .await?;

        Ok(maybe_txn)
    }

    // Cascade of a contract soft-delete.
    pub async fn soft_delete_for_contract<'e, E>(
        &self,
        executor: E,
        contract_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET deleted_at = $2, updated_at = $2
            WHERE contract_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(contract_id)
        .bind(deleted_at)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
