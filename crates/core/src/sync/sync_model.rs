//! Sync result models.

use serde::{Deserialize, Serialize};

/// Aggregate result of a full sync run, returned to the API layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub accounts_synced: usize,
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    /// Total transaction rows stored after the run.
    pub total_in_database: i64,
}

/// Per-institution counts accumulated while paging the transaction feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemSyncCounts {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
}

impl ItemSyncCounts {
    pub fn absorb(&mut self, other: ItemSyncCounts) {
        self.added += other.added;
        self.modified += other.modified;
        self.removed += other.removed;
    }
}
