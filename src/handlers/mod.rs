pub mod contracts;
pub mod dashboard;
pub mod transactions;
pub mod users;
