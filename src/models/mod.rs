pub mod contract;
pub mod dashboard;
pub mod transaction;
pub mod user;
