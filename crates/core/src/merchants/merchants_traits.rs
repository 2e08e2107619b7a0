//! Merchant repository trait.

use async_trait::async_trait;

use super::merchants_model::{Merchant, MerchantDefaultsUpdate, NewMerchant};
use crate::errors::Result;

#[async_trait]
pub trait MerchantRepositoryTrait: Send + Sync {
    /// Looks a merchant up by the provider's stable entity identifier.
    fn find_by_entity_id(&self, entity_id: &str) -> Result<Option<Merchant>>;

    /// Looks a merchant up by exact name.
    fn find_by_name(&self, name: &str) -> Result<Option<Merchant>>;

    /// Creates a merchant row. Racing creators of the same name resolve to
    /// the existing row (first-writer wins on the unique name).
    async fn create(&self, merchant: NewMerchant) -> Result<Merchant>;

    /// Updates a merchant's stored defaults.
    async fn update_defaults(&self, update: MerchantDefaultsUpdate) -> Result<Merchant>;

    fn list(&self) -> Result<Vec<Merchant>>;
}
