// src/handlers/transactions.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::DueBuckets,
    models::transaction::{Transaction, TransactionUpdate},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateResponse {
    pub message: String,
    pub transactions: Vec<Transaction>,
}

// POST /api/v1/transactions
//
// The batch is applied item by item in input order and is not atomic:
// updates before the first failure stay applied. See DESIGN.md.
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "Transactions",
    request_body = Vec<TransactionUpdate>,
    responses(
        (status = 200, description = "All updates applied", body = BulkUpdateResponse),
        (status = 400, description = "An update is incomplete or out of range; earlier updates stay applied"),
        (status = 404, description = "An update references an unknown transaction")
    )
)]
pub async fn update_transactions(
    State(app_state): State<AppState>,
    Json(updates): Json<Vec<TransactionUpdate>>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = app_state
        .transaction_service
        .apply_updates(&app_state.db_pool, &updates)
        .await?;

    Ok((
        StatusCode::OK,
        Json(BulkUpdateResponse {
            message: "Transactions updated successfully".to_string(),
            transactions,
        }),
    ))
}

// GET /api/v1/transactions
//
// Due-date buckets for the operational dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "Transactions",
    responses(
        (status = 200, description = "Unpaid installments bucketed into overdue / due today / upcoming tomorrow", body = DueBuckets)
    )
)]
pub async fn get_due_schedule(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let buckets = app_state
        .dashboard_service
        .due_schedule(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(buckets)))
}

// GET /api/v1/transactions/{id}
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    params(("id" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Single transaction", body = Transaction),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = app_state
        .transaction_service
        .get(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(transaction)))
}
