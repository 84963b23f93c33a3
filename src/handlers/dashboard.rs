// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{common::error::AppError, config::AppState, models::dashboard::AggregateSummary};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AggregateParams {
    /// Reporting month as YYYY-MM; defaults to the current month.
    pub month: Option<String>,
}

// GET /api/v1/aggregate
#[utoipa::path(
    get,
    path = "/api/v1/aggregate",
    tag = "Dashboard",
    params(AggregateParams),
    responses(
        (status = 200, description = "Month-bucketed financial summary with month-over-month deltas", body = AggregateSummary),
        (status = 400, description = "Malformed month parameter")
    )
)]
pub async fn get_aggregate(
    State(app_state): State<AppState>,
    Query(params): Query<AggregateParams>,
) -> Result<impl IntoResponse, AppError> {
    let as_of = params
        .month
        .as_deref()
        .map(parse_month)
        .transpose()?;

    let summary = app_state
        .dashboard_service
        .aggregate(&app_state.db_pool, as_of)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

fn parse_month(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid month '{raw}', expected YYYY-MM")))
}
