// src/services/transaction_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TransactionRepository,
    models::transaction::{PaidStatus, Transaction, TransactionUpdate},
};

#[derive(Clone)]
pub struct TransactionService {
    repo: TransactionRepository,
}

impl TransactionService {
    pub fn new(repo: TransactionRepository) -> Self {
        Self { repo }
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_active_by_id(executor, id)
            .await?
            .ok_or(AppError::TransactionNotFound(id))
    }

    /// Applies payment-status updates in input order, stopping at the
    /// first invalid or unknown record. The batch is deliberately NOT a
    /// single database transaction: updates applied before a failure
    /// stay applied, and the caller sees the error for the rest.
    pub async fn apply_updates<'e, A>(
        &self,
        conn: A,
        updates: &[TransactionUpdate],
    ) -> Result<Vec<Transaction>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut conn = conn.acquire().await?;
        let mut applied = Vec::with_capacity(updates.len());

        for update in updates {
            let (id, amount, partial_amount, paid_status) = validate_update(update)?;

            let txn = self
                .repo
                .apply_update(&mut *conn, id, amount, partial_amount, paid_status, Utc::now())
                .await?
                .ok_or(AppError::TransactionNotFound(id))?;

            tracing::debug!(%id, ?paid_status, "transaction updated");
            applied.push(txn);
        }

        Ok(applied)
    }
}

// Per-record validation, before any write touches that record.
fn validate_update(
    update: &TransactionUpdate,
) -> Result<(Uuid, Decimal, Decimal, PaidStatus), AppError> {
    let Some(id) = update.id else {
        return Err(AppError::InvalidInput(
            "Transaction update has incomplete fields: missing id".to_string(),
        ));
    };

    let (Some(amount), Some(partial_amount), Some(paid_status)) =
        (update.amount, update.partial_amount, update.paid_status)
    else {
        return Err(AppError::InvalidInput(format!(
            "Transaction with id {id} has incomplete fields"
        )));
    };

    if paid_status == PaidStatus::PaidAll && partial_amount < amount {
        return Err(AppError::InvalidInput(format!(
            "Transaction with id {id} has invalid amount and partialAmount"
        )));
    }

    if amount < Decimal::ZERO || partial_amount < Decimal::ZERO || partial_amount > amount {
        return Err(AppError::InvalidInput(format!(
            "Transaction with id {id} has invalid amount or partialAmount"
        )));
    }

    Ok((id, amount, partial_amount, paid_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn update(
        amount: Option<Decimal>,
        partial: Option<Decimal>,
        status: Option<PaidStatus>,
    ) -> TransactionUpdate {
        TransactionUpdate {
            id: Some(Uuid::new_v4()),
            amount,
            partial_amount: partial,
            paid_status: status,
        }
    }

    #[test]
    fn accepts_a_full_payment() {
        let u = update(
            Some(dec!(270_000)),
            Some(dec!(270_000)),
            Some(PaidStatus::PaidAll),
        );
        let (id, amount, partial, status) = validate_update(&u).unwrap();
        assert_eq!(Some(id), u.id);
        assert_eq!(amount, dec!(270_000));
        assert_eq!(partial, dec!(270_000));
        assert_eq!(status, PaidStatus::PaidAll);
    }

    #[test]
    fn accepts_a_partial_payment() {
        let u = update(
            Some(dec!(270_000)),
            Some(dec!(100_000)),
            Some(PaidStatus::PartiallyPaid),
        );
        assert!(validate_update(&u).is_ok());
    }

    #[test]
    fn rejects_paid_all_with_partial_below_amount() {
        let u = update(
            Some(dec!(270_000)),
            Some(dec!(100_000)),
            Some(PaidStatus::PaidAll),
        );
        let err = validate_update(&u).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains(&u.id.unwrap().to_string()));
    }

    #[test]
    fn rejects_a_record_without_an_id() {
        let u = TransactionUpdate {
            id: None,
            amount: Some(dec!(270_000)),
            partial_amount: Some(dec!(0)),
            paid_status: Some(PaidStatus::NotPaid),
        };
        let err = validate_update(&u).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("incomplete fields"));
    }

    #[rstest]
    #[case(Some(dec!(-1)), Some(dec!(0)))] // negative amount
    #[case(Some(dec!(100)), Some(dec!(-5)))] // negative partial
    #[case(Some(dec!(100)), Some(dec!(150)))] // partial above amount
    fn rejects_out_of_range_amounts(
        #[case] amount: Option<Decimal>,
        #[case] partial: Option<Decimal>,
    ) {
        let u = update(amount, partial, Some(PaidStatus::NotPaid));
        assert!(matches!(
            validate_update(&u),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[rstest]
    #[case(None, Some(dec!(0)), Some(PaidStatus::NotPaid))]
    #[case(Some(dec!(100)), None, Some(PaidStatus::NotPaid))]
    #[case(Some(dec!(100)), Some(dec!(0)), None)]
    fn rejects_incomplete_records(
        #[case] amount: Option<Decimal>,
        #[case] partial: Option<Decimal>,
        #[case] status: Option<PaidStatus>,
    ) {
        let u = update(amount, partial, status);
        let err = validate_update(&u).unwrap_err();
        assert!(err.to_string().contains("incomplete fields"));
    }
}
