//! SQLite storage implementation for PocketLedger.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `pocketledger-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users, categories, transactions, budgets and stocks
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//! core (domain)         server (http)
//!       │                     │
//!       └──────────┬──────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool. Every write is serialized through a single
//! writer task that wraps each job in an immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod budgets;
pub mod categories;
pub mod stocks;
pub mod transactions;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use stocks::StockRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from pocketledger-core for convenience
pub use pocketledger_core::errors::{DatabaseError, Error, Result};
