pub mod contract_service;
pub use contract_service::ContractService;
pub mod transaction_service;
pub use transaction_service::TransactionService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod user_service;
pub use user_service::UserService;
