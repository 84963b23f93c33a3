use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Application error, one variant per failure kind the core can surface.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    // Bulk-update failures name the offending record in the message.
    #[error("{0}")]
    InvalidInput(String),

    #[error("contract code is already in use")]
    DuplicateContractCode,

    #[error("device IMEI is already in use")]
    DuplicateDeviceImei,

    #[error("invalid contract type: {0}")]
    InvalidContractType(String),

    #[error("contract not found")]
    ContractNotFound,

    #[error("transaction not found: {0}")]
    TransactionNotFound(Uuid),

    #[error("user not found")]
    UserNotFound,

    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),

    // Catch-all for anything unexpected; `anyhow::Error` keeps the context.
    #[error("internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every validation detail, keyed by field.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(ref msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidContractType(ref t) => {
                let body = Json(json!({ "error": format!("Invalid contract type: {t}") }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::DuplicateContractCode => {
                (StatusCode::CONFLICT, "This contract code is already in use.")
            }
            AppError::DuplicateDeviceImei => {
                (StatusCode::CONFLICT, "This device IMEI is already in use.")
            }
            AppError::ContractNotFound => (StatusCode::NOT_FOUND, "Contract not found."),
            AppError::TransactionNotFound(id) => {
                let body = Json(json!({
                    "error": format!("Transaction with id {id} does not exist.")
                }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found."),

            // DatabaseError and InternalServerError become opaque 500s:
            // the caller gets a reference id, the detail goes to the log.
            ref e => {
                let reference = Uuid::new_v4();
                tracing::error!(%reference, "internal server error: {e:?}");
                let body = Json(json!({
                    "error": "An unexpected error occurred.",
                    "reference": reference,
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        // Simple one-message errors.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
