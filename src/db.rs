pub mod user_repo;
pub use user_repo::UserRepository;
pub mod contract_repo;
pub use contract_repo::ContractRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
