//! Investment repository trait.

use async_trait::async_trait;

use super::investments_model::{InvestmentTransactionUpsert, SecurityUpsert};
use crate::errors::Result;

#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Upserts securities keyed by provider security id. Must run before the
    /// investment transactions that reference them.
    async fn upsert_securities(&self, securities: Vec<SecurityUpsert>) -> Result<usize>;

    /// Upserts investment transactions keyed by provider transaction id.
    async fn upsert_investment_transactions(
        &self,
        transactions: Vec<InvestmentTransactionUpsert>,
    ) -> Result<usize>;
}
