//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod schedule;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() is fine here: if configuration fails, the app must not start.
    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    // Run pending migrations at startup.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");

    tracing::info!("database migrations applied");

    let contract_routes = Router::new()
        .route(
            "/",
            post(handlers::contracts::create_contract).get(handlers::contracts::list_contracts),
        )
        .route(
            "/{id}",
            get(handlers::contracts::get_contract).delete(handlers::contracts::delete_contract),
        );

    let transaction_routes = Router::new()
        .route(
            "/",
            post(handlers::transactions::update_transactions)
                .get(handlers::transactions::get_due_schedule),
        )
        .route("/{id}", get(handlers::transactions::get_transaction));

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users))
        .route("/{id}", get(handlers::users::get_user));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/v1/aggregate", get(handlers::dashboard::get_aggregate))
        .nest("/api/v1/contracts", contract_routes)
        .nest("/api/v1/transactions", transaction_routes)
        .nest("/api/v1/users", user_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("server listening on {}", addr);
    axum::serve(listener, app).await.expect("axum server error");
}
