// src/db/contract_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::contract::{Contract, ContractType},
};

#[derive(Clone)]
pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_active_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_contract = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(maybe_contract)
    }

    pub async fn code_exists<'e, E>(&self, executor: E, code: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM contracts WHERE contract_code = $1 AND deleted_at IS NULL)",
        )
        .bind(code)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    pub async fn imei_exists<'e, E>(&self, executor: E, imei: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM contracts WHERE device_imei = $1 AND deleted_at IS NULL)",
        )
        .bind(imei)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        contract_date: NaiveDate,
        contract_code: &str,
        contract_type: ContractType,
        device_type: &str,
        device_imei: &str,
        total_amount: Decimal,
        fee: Decimal,
        note: Option<&str>,
        user_id: Uuid,
    ) -> Result<Contract, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (
                contract_date, contract_code, contract_type,
                device_type, device_imei, total_amount, fee, note, user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(contract_date)
        .bind(contract_code)
        .bind(contract_type)
        .bind(device_type)
        .bind(device_imei)
        .bind(total_amount)
        .bind(fee)
        .bind(note)
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // The partial unique indexes settle concurrent creates: the
            // loser of the race lands here instead of the pre-checks.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("contracts_contract_code_active_idx") => {
                            AppError::DuplicateContractCode
                        }
                        Some("contracts_device_imei_active_idx") => AppError::DuplicateDeviceImei,
                        _ => e.into(),
                    };
                }
            }
            e.into()
        })?;

        Ok(contract)
    }

    // Marks a contract deleted; returns None when no active row matched
    // (absent or already soft-deleted).
    pub async fn soft_delete<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(deleted_at)
        .fetch_optional(executor)
        .await?;

        Ok(maybe_contract)
    }

    // Paged listing. The search term matches contract fields and the
    // owning customer's name/phone/address, case-insensitively.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contracts = match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, Contract>(
                    r#"
                    SELECT c.* FROM contracts c
                    JOIN users u ON u.id = c.user_id
                    WHERE c.deleted_at IS NULL
                      AND (
                          c.contract_code ILIKE $1
                          OR c.device_type ILIKE $1
                          OR c.device_imei ILIKE $1
                          OR COALESCE(c.note, '') ILIKE $1
                          OR u.name ILIKE $1
                          OR COALESCE(u.address, '') ILIKE $1
                          OR u.phones::text ILIKE $1
                      )
                    ORDER BY c.created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(executor)
                .await?
            }
            None => {
                sqlx::query_as::<_, Contract>(
                    r#"
                    SELECT * FROM contracts
                    WHERE deleted_at IS NULL
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(executor)
                .await?
            }
        };

        Ok(contracts)
    }

    pub async fn count<'e, E>(&self, executor: E, search: Option<&str>) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM contracts c
                    JOIN users u ON u.id = c.user_id
                    WHERE c.deleted_at IS NULL
                      AND (
                          c.contract_code ILIKE $1
                          OR c.device_type ILIKE $1
                          OR c.device_imei ILIKE $1
                          OR COALESCE(c.note, '') ILIKE $1
                          OR u.name ILIKE $1
                          OR COALESCE(u.address, '') ILIKE $1
                          OR u.phones::text ILIKE $1
                      )
                    "#,
                )
                .bind(pattern)
                .fetch_one(executor)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM contracts WHERE deleted_at IS NULL",
                )
                .fetch_one(executor)
                .await?
            }
        };

        Ok(total)
    }
}
