//! Plaid API client for PocketLedger.
//!
//! Wraps the Plaid REST endpoints used by the sync pipeline and the linking
//! flow, and implements the core crate's aggregator seam.

mod aggregator;
pub mod client;
pub mod error;
pub mod types;

pub use client::{PlaidClient, PlaidConfig, PlaidEnvironment};
pub use error::{PlaidError, Result};
