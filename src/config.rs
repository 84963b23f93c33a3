// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::db::{ContractRepository, DashboardRepository, TransactionRepository, UserRepository};
use crate::services::{ContractService, DashboardService, TransactionService, UserService};

// Shared state, accessible from every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub contract_service: ContractService,
    pub transaction_service: TransactionService,
    pub dashboard_service: DashboardService,
    pub user_service: UserService,
}

impl AppState {
    // Loads configuration from the environment and wires the service
    // graph. The pool is built exactly once here and injected everywhere;
    // there is no ambient connection state.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("database connection established");

        let user_repo = UserRepository::new(db_pool.clone());
        let contract_repo = ContractRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let contract_service = ContractService::new(
            contract_repo,
            transaction_repo.clone(),
            user_repo.clone(),
        );
        let transaction_service = TransactionService::new(transaction_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);
        let user_service = UserService::new(user_repo);

        Ok(Self {
            db_pool,
            contract_service,
            transaction_service,
            dashboard_service,
            user_service,
        })
    }
}
