// src/models/contract.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::transaction::Transaction;
use crate::models::user::User;

// Maps the contract_type enum in the database
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "contract_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Loan,
    Lease,
}

impl FromStr for ContractType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loan" => Ok(ContractType::Loan),
            "lease" => Ok(ContractType::Lease),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractType::Loan => write!(f, "loan"),
            ContractType::Lease => write!(f, "lease"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub contract_date: NaiveDate,
    pub contract_code: String,
    pub contract_type: ContractType,
    pub device_type: String,
    pub device_imei: String,
    pub total_amount: Decimal,
    pub fee: Decimal,
    pub note: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Contract with its owner and installment schedule populated, plus the
/// overall due date (the date of the final installment).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    pub contract: Contract,
    pub user: User,
    pub transactions: Vec<Transaction>,
    pub due_date: NaiveDate,
}

/// Paged listing result: one page of contracts plus the unfiltered total.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractPage {
    pub items: Vec<Contract>,
    pub total: i64,
}
