// src/handlers/contracts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::contract::{Contract, ContractDetail, ContractPage},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Nguyen Van A")]
    pub customer_name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "0901234567")]
    pub customer_phone: String,

    #[schema(value_type = String, format = Date, example = "2025-08-01")]
    pub contract_date: NaiveDate,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "HD-2025-001")]
    pub contract_code: String,

    // Kept as free text so an unknown value surfaces as a typed
    // InvalidContractType error instead of a deserialization failure.
    #[schema(example = "loan")]
    pub contract_type: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "iPhone 15 Pro")]
    pub device_type: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "356789104321987")]
    pub device_imei: String,

    #[schema(value_type = f64, example = 10_000_000)]
    pub total_amount: Decimal,

    pub note: Option<String>,
}

// POST /api/v1/contracts
#[utoipa::path(
    post,
    path = "/api/v1/contracts",
    tag = "Contracts",
    request_body = CreateContractPayload,
    responses(
        (status = 201, description = "Contract created with its installment schedule", body = ContractDetail),
        (status = 400, description = "Invalid payload or contract type"),
        (status = 409, description = "Contract code or device IMEI already in use")
    )
)]
pub async fn create_contract(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateContractPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let detail = app_state
        .contract_service
        .create(
            &app_state.db_pool,
            &payload.customer_name,
            &payload.customer_phone,
            payload.contract_date,
            &payload.contract_code,
            &payload.contract_type,
            &payload.device_type,
            &payload.device_imei,
            payload.total_amount,
            payload.note.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListContractsParams {
    /// Case-insensitive search over code, device, IMEI, note and customer.
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// GET /api/v1/contracts
#[utoipa::path(
    get,
    path = "/api/v1/contracts",
    tag = "Contracts",
    params(ListContractsParams),
    responses(
        (status = 200, description = "One page of contracts plus the total count", body = ContractPage)
    )
)]
pub async fn list_contracts(
    State(app_state): State<AppState>,
    Query(params): Query<ListContractsParams>,
) -> Result<impl IntoResponse, AppError> {
    let search = params.q.as_deref().filter(|q| !q.is_empty());

    let page = app_state
        .contract_service
        .list(
            &app_state.db_pool,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(10),
            search,
        )
        .await?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/v1/contracts/{id}
#[utoipa::path(
    get,
    path = "/api/v1/contracts/{id}",
    tag = "Contracts",
    params(("id" = Uuid, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract with customer and installments", body = ContractDetail),
        (status = 404, description = "Contract not found")
    )
)]
pub async fn get_contract(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .contract_service
        .get(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/v1/contracts/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/contracts/{id}",
    tag = "Contracts",
    params(("id" = Uuid, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Soft-deleted contract; installments cascade", body = Contract),
        (status = 404, description = "Contract not found or already deleted")
    )
)]
pub async fn delete_contract(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let contract = app_state
        .contract_service
        .delete(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(contract)))
}
