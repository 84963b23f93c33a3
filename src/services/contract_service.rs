// src/services/contract_service.rs

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContractRepository, TransactionRepository, UserRepository},
    models::contract::{Contract, ContractDetail, ContractPage, ContractType},
    schedule,
};

#[derive(Clone)]
pub struct ContractService {
    contracts: ContractRepository,
    transactions: TransactionRepository,
    users: UserRepository,
}

impl ContractService {
    pub fn new(
        contracts: ContractRepository,
        transactions: TransactionRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            contracts,
            transactions,
            users,
        }
    }

    /// Creates a contract together with its customer (found or created by
    /// phone number) and its full installment schedule, as one database
    /// transaction. Any failure rolls the whole unit back.
    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, A>(
        &self,
        conn: A,
        customer_name: &str,
        customer_phone: &str,
        contract_date: NaiveDate,
        contract_code: &str,
        contract_type: &str,
        device_type: &str,
        device_imei: &str,
        total_amount: Decimal,
        note: Option<&str>,
    ) -> Result<ContractDetail, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let contract_type = ContractType::from_str(contract_type)
            .map_err(|_| AppError::InvalidContractType(contract_type.to_string()))?;

        if total_amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "totalAmount must be positive".to_string(),
            ));
        }

        let mut tx = conn.begin().await?;

        // An early return drops the transaction, which rolls it back.
        let user = match self.users.find_by_phone(&mut *tx, customer_phone).await? {
            Some(user) => user,
            None => {
                self.users
                    .create_customer(&mut *tx, customer_name, customer_phone)
                    .await?
            }
        };

        if self.contracts.code_exists(&mut *tx, contract_code).await? {
            return Err(AppError::DuplicateContractCode);
        }
        if self.contracts.imei_exists(&mut *tx, device_imei).await? {
            return Err(AppError::DuplicateDeviceImei);
        }

        let fee = schedule::calculate_fee(total_amount, schedule::FEE_RATE);

        let contract = self
            .contracts
            .insert(
                &mut *tx,
                contract_date,
                contract_code,
                contract_type,
                device_type,
                device_imei,
                total_amount,
                fee,
                note,
                user.id,
            )
            .await?;

        let installments =
            schedule::calculate_installments(contract_date, contract_type, total_amount);
        let transactions = self
            .transactions
            .insert_installments(&mut *tx, contract.id, user.id, &installments)
            .await?;

        tx.commit().await?;

        tracing::info!(
            contract_code,
            installments = transactions.len(),
            "contract created"
        );

        Ok(ContractDetail {
            contract,
            user,
            transactions,
            due_date: schedule::calculate_due_date(contract_type, contract_date),
        })
    }

    /// Fetches a contract with its customer and installment schedule.
    pub async fn get<'e, A>(&self, conn: A, id: Uuid) -> Result<ContractDetail, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = conn.acquire().await?;

        let contract = self
            .contracts
            .find_active_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::ContractNotFound)?;
        let user = self
            .users
            .find_by_id(&mut *conn, contract.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let transactions = self
            .transactions
            .find_for_contract(&mut *conn, contract.id)
            .await?;
        let due_date = schedule::calculate_due_date(contract.contract_type, contract.contract_date);

        Ok(ContractDetail {
            contract,
            user,
            transactions,
            due_date,
        })
    }

    pub async fn list<'e, A>(
        &self,
        conn: A,
        page: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<ContractPage, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut conn = conn.acquire().await?;

        let items = self
            .contracts
            .list(&mut *conn, search, limit, offset)
            .await?;
        let total = self.contracts.count(&mut *conn, search).await?;

        Ok(ContractPage { items, total })
    }

    /// Soft-deletes a contract and cascades the same timestamp to its
    /// installments, atomically. A second delete on the same id fails
    /// with NotFound because active lookups exclude deleted rows.
    pub async fn delete<'e, A>(&self, conn: A, id: Uuid) -> Result<Contract, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        let now = Utc::now();
        let contract = self
            .contracts
            .soft_delete(&mut *tx, id, now)
            .await?
            .ok_or(AppError::ContractNotFound)?;
        let cascaded = self
            .transactions
            .soft_delete_for_contract(&mut *tx, id, now)
            .await?;

        tx.commit().await?;

        tracing::info!(contract_code = %contract.contract_code, cascaded, "contract soft-deleted");

        Ok(contract)
    }
}

// Store-backed tests run against a per-test database with the schema
// from ./migrations applied.
#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sqlx::PgPool;

    use crate::models::transaction::PaidStatus;

    fn service(pool: &PgPool) -> ContractService {
        ContractService::new(
            ContractRepository::new(pool.clone()),
            TransactionRepository::new(pool.clone()),
            UserRepository::new(pool.clone()),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn count(pool: &PgPool, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
    }

    #[sqlx::test]
    async fn duplicate_contract_code_rolls_back_the_whole_create(pool: PgPool) {
        let svc = service(&pool);

        svc.create(
            &pool,
            "Nguyen Van A",
            "0901000001",
            date(2024, 3, 1),
            "HD-001",
            "loan",
            "iPhone 13",
            "356938035643809",
            dec!(1_000_000),
            None,
        )
        .await
        .unwrap();

        // Same code, but a fresh customer and device. The new user row is
        // written inside the transaction before the code check fires, so a
        // rollback must take it down too.
        let err = svc
            .create(
                &pool,
                "Tran Thi B",
                "0901000002",
                date(2024, 3, 2),
                "HD-001",
                "loan",
                "iPhone 14",
                "356938035643810",
                dec!(2_000_000),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateContractCode));

        assert_eq!(count(&pool, "SELECT COUNT(*) FROM users").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM contracts").await, 1);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM transactions").await, 4);
    }

    #[sqlx::test]
    async fn lease_create_persists_eight_unpaid_installments(pool: PgPool) {
        let svc = service(&pool);

        let created = svc
            .create(
                &pool,
                "Le Van C",
                "0901000003",
                date(2024, 5, 10),
                "HD-010",
                "lease",
                "iPhone 15",
                "356938035643811",
                dec!(4_000_000),
                None,
            )
            .await
            .unwrap();
        assert_eq!(created.transactions.len(), 8);

        // Re-read through the store rather than trusting the create echo.
        let stored = svc.get(&pool, created.contract.id).await.unwrap();
        assert_eq!(stored.transactions.len(), 8);
        for t in &stored.transactions {
            assert_eq!(t.paid_status, PaidStatus::NotPaid);
            assert_eq!(t.partial_amount, Decimal::ZERO);
            assert!(t.paid_date.is_none());
        }
    }

    #[sqlx::test]
    async fn delete_cascades_to_installments_and_is_not_repeatable(pool: PgPool) {
        let svc = service(&pool);

        let created = svc
            .create(
                &pool,
                "Pham Thi D",
                "0901000004",
                date(2024, 7, 20),
                "HD-020",
                "loan",
                "iPhone 12",
                "356938035643812",
                dec!(3_000_000),
                None,
            )
            .await
            .unwrap();
        let id = created.contract.id;

        let deleted = svc.delete(&pool, id).await.unwrap();
        assert!(deleted.deleted_at.is_some());

        let stamped: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE contract_id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(stamped, 4);

        let err = svc.delete(&pool, id).await.unwrap_err();
        assert!(matches!(err, AppError::ContractNotFound));
    }
}
