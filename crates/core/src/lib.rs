//! PocketLedger Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the ledger: users and their
//! categories, transactions, monthly budgets, stock lots, and the analytics
//! that aggregate them into dashboard series. It is database-agnostic and
//! defines repository traits that are implemented by the `storage-sqlite` crate.

pub mod analytics;
pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod stocks;
pub mod transactions;
pub mod users;
pub mod utils;

#[cfg(test)]
mod test_fixtures;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
