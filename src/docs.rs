// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Contracts ---
        handlers::contracts::create_contract,
        handlers::contracts::list_contracts,
        handlers::contracts::get_contract,
        handlers::contracts::delete_contract,

        // --- Transactions ---
        handlers::transactions::update_transactions,
        handlers::transactions::get_due_schedule,
        handlers::transactions::get_transaction,

        // --- Dashboard ---
        handlers::dashboard::get_aggregate,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,
    ),
    components(
        schemas(
            // --- Contracts ---
            models::contract::ContractType,
            models::contract::Contract,
            models::contract::ContractDetail,
            models::contract::ContractPage,
            handlers::contracts::CreateContractPayload,

            // --- Transactions ---
            models::transaction::PaidStatus,
            models::transaction::Transaction,
            models::transaction::TransactionUpdate,
            handlers::transactions::BulkUpdateResponse,

            // --- Dashboard ---
            models::dashboard::AggregateSummary,
            models::dashboard::AmountWindow,
            models::dashboard::CountWindow,
            models::dashboard::OutstandingWindow,
            models::dashboard::DueBuckets,
            models::dashboard::DueEntry,
            models::dashboard::DueTransaction,

            // --- Users ---
            models::user::UserRole,
            models::user::Phone,
            models::user::User,
        )
    ),
    tags(
        (name = "Contracts", description = "Loan/lease contract lifecycle"),
        (name = "Transactions", description = "Installment payments and due schedule"),
        (name = "Dashboard", description = "Financial aggregates"),
        (name = "Users", description = "Customers")
    )
)]
pub struct ApiDoc;
