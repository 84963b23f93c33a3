// src/models/transaction.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Maps the paid_status enum in the database
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "paid_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaidStatus {
    #[sqlx(rename = "NOT_PAID")]
    NotPaid,
    #[sqlx(rename = "PARTIALLY_PAID")]
    PartiallyPaid,
    #[sqlx(rename = "PAID_ALL")]
    PaidAll,
}

/// One entry of a bulk payment-status update. Every field is optional
/// on the wire; presence is checked per record so an incomplete entry
/// yields a validation error naming the offending transaction instead
/// of a blanket deserialization failure.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub partial_amount: Option<Decimal>,
    pub paid_status: Option<PaidStatus>,
}

/// One installment of a contract. `amount` is the scheduled value,
/// `partial_amount` is what has actually been collected so far.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub user_id: Uuid,
    /// Installment order within the contract, starting at 1.
    pub position: i32,
    pub amount: Decimal,
    pub partial_amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_date: Option<DateTime<Utc>>,
    pub paid_status: PaidStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}
