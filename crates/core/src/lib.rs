//! PocketLedger Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for PocketLedger.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate; the aggregator seam is implemented
//! by the `plaid` crate.

pub mod accounts;
pub mod categories;
pub mod errors;
pub mod investments;
pub mod merchants;
pub mod sync;
pub mod tags;
pub mod transactions;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
