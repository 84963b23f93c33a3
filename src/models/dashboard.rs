// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::transaction::PaidStatus;
use crate::models::user::Phone;

/// A summed figure over the three reporting windows, with the
/// month-over-month percentage change.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AmountWindow {
    pub current: Decimal,
    pub previous: Decimal,
    pub all: Decimal,
    pub change: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountWindow {
    pub current: i64,
    pub previous: i64,
    pub all: i64,
    pub change: f64,
}

/// Outstanding balance carries no month bucketing; `all` mirrors
/// `current` to keep the card shape uniform on the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingWindow {
    pub current: Decimal,
    pub all: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub total_loans: AmountWindow,
    pub total_contracts: CountWindow,
    pub total_collected: AmountWindow,
    pub currently_loaned: OutstandingWindow,
}

/// Row fetched for due-date classification: an unpaid installment joined
/// to its (non-deleted) contract and that contract's customer.
#[derive(Debug, Clone, FromRow)]
pub struct DueRow {
    pub transaction_id: Uuid,
    pub amount: Decimal,
    pub partial_amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_status: PaidStatus,
    pub contract_id: Uuid,
    pub contract_code: String,
    pub contract_date: NaiveDate,
    pub customer_name: String,
    pub phones: Json<Vec<Phone>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DueTransaction {
    pub id: Uuid,
    pub amount: Decimal,
    pub partial_amount: Decimal,
    pub due_date: NaiveDate,
    pub status: PaidStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DueEntry {
    pub id: Uuid,
    pub contract_code: String,
    pub contract_date: NaiveDate,
    pub customer_name: String,
    pub customer_phone: String,
    pub transaction: DueTransaction,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DueBuckets {
    pub overdue: Vec<DueEntry>,
    pub due: Vec<DueEntry>,
    pub upcoming: Vec<DueEntry>,
}
