//! SQLite storage implementation for PocketLedger.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `pocketledger-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies
//! exist. All other crates are database-agnostic and work with traits.

pub mod db;
mod decimal_text;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod accounts;
pub mod categories;
pub mod investments;
pub mod merchants;
pub mod tags;
pub mod transactions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, write_actor::spawn_writer,
    DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use investments::InvestmentRepository;
pub use merchants::MerchantRepository;
pub use tags::TagRepository;
pub use transactions::TransactionRepository;
