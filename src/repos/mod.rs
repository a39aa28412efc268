pub mod account_repo;
pub mod error;

#[cfg(test)]
pub mod memory;

pub use account_repo::{Account, AccountStatus, AccountStore, PgAccountRepo};
