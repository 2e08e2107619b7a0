//! Transaction synchronization pipeline.
//!
//! The sync service drives the aggregator's cursor-based transaction feed,
//! runs auto-categorization over incoming rows, reconciles account lists and
//! refreshes investment data. All persistence goes through the repository
//! traits so the pipeline itself stays storage-agnostic.

pub mod aggregator;
pub mod categorization;
pub mod reconciliation;
pub mod sync_model;
pub mod sync_service;


pub use aggregator::*;
pub use categorization::Categorizer;
pub use reconciliation::{plan_account_reconciliation, ReconcileAction};
pub use sync_model::*;
pub use sync_service::SyncService;
