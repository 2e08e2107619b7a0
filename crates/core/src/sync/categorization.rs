//! Auto-categorization cascade.
//!
//! Incoming transactions are classified through a fixed priority order:
//! a merchant matched by provider entity id, then a merchant matched by
//! exact name, then a category derived from the provider's detailed
//! classification code, then nothing. Newly seen merchant names are seeded
//! as merchant rows so future transactions from the same merchant inherit
//! the resolved defaults.

use std::sync::Arc;

use log::{debug, warn};

use crate::categories::{derive_category_name, CategoryRepositoryTrait};
use crate::errors::Result;
use crate::merchants::{Merchant, MerchantRepositoryTrait, NewMerchant};
use crate::sync::aggregator::ProviderTransaction;

/// Outcome of the cascade for one transaction. `None` fields mean no
/// classification was resolved on that axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
}

pub struct Categorizer {
    merchant_repo: Arc<dyn MerchantRepositoryTrait>,
    category_repo: Arc<dyn CategoryRepositoryTrait>,
}

impl Categorizer {
    pub fn new(
        merchant_repo: Arc<dyn MerchantRepositoryTrait>,
        category_repo: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            merchant_repo,
            category_repo,
        }
    }

    /// Full cascade for newly added transactions. Seeds a merchant row when
    /// the transaction names a merchant that is not yet known.
    pub async fn resolve_for_added(&self, txn: &ProviderTransaction) -> Result<Classification> {
        let merchant = self.lookup_merchant(txn)?;

        if let Some(merchant) = &merchant {
            if merchant.default_category_id.is_some() || merchant.default_tag_id.is_some() {
                return Ok(Classification {
                    category_id: merchant.default_category_id.clone(),
                    tag_id: merchant.default_tag_id.clone(),
                });
            }
        }

        let code_category = self.resolve_from_code(txn).await?;

        if merchant.is_none() {
            if let Some(name) = txn.merchant_name.as_deref() {
                self.seed_merchant(name, txn, code_category.as_deref())
                    .await?;
            }
        }

        Ok(Classification {
            category_id: code_category,
            tag_id: None,
        })
    }

    /// Reduced cascade for provider-modified transactions. Only a
    /// user-confirmed merchant may override the stored classification;
    /// otherwise the code mapping applies, and with neither the stored
    /// values stay untouched (`None`).
    pub async fn resolve_for_modified(&self, txn: &ProviderTransaction) -> Result<Classification> {
        if let Some(merchant) = self.lookup_merchant(txn)? {
            if merchant.confirmed {
                return Ok(Classification {
                    category_id: merchant.default_category_id,
                    tag_id: merchant.default_tag_id,
                });
            }
        }

        Ok(Classification {
            category_id: self.resolve_from_code(txn).await?,
            tag_id: None,
        })
    }

    fn lookup_merchant(&self, txn: &ProviderTransaction) -> Result<Option<Merchant>> {
        if let Some(entity_id) = txn.merchant_entity_id.as_deref() {
            if let Some(merchant) = self.merchant_repo.find_by_entity_id(entity_id)? {
                return Ok(Some(merchant));
            }
        }
        if let Some(name) = txn.merchant_name.as_deref() {
            return self.merchant_repo.find_by_name(name);
        }
        Ok(None)
    }

    async fn resolve_from_code(&self, txn: &ProviderTransaction) -> Result<Option<String>> {
        let Some(pfc) = &txn.personal_finance_category else {
            return Ok(None);
        };
        let Some(detailed) = pfc.detailed.as_deref().filter(|code| !code.is_empty()) else {
            return Ok(None);
        };

        let name = derive_category_name(pfc.primary.as_deref(), detailed);
        let category = self.category_repo.find_or_create_for_code(detailed, &name).await?;
        Ok(Some(category.id))
    }

    async fn seed_merchant(
        &self,
        name: &str,
        txn: &ProviderTransaction,
        category_id: Option<&str>,
    ) -> Result<()> {
        let confidence = txn
            .personal_finance_category
            .as_ref()
            .and_then(|pfc| pfc.confidence_level.clone());

        let seeded = self
            .merchant_repo
            .create(NewMerchant {
                name: name.to_string(),
                entity_id: txn.merchant_entity_id.clone(),
                default_category_id: category_id.map(str::to_string),
                default_tag_id: None,
                confirmed: false,
                confidence,
                logo_url: txn.logo_url.clone(),
            })
            .await;

        match seeded {
            Ok(merchant) => {
                debug!("Seeded merchant '{}' ({})", merchant.name, merchant.id);
                Ok(())
            }
            // Seeding is best-effort; a lost race or bad row must not fail
            // the transaction it rode in on.
            Err(err) => {
                warn!("Failed to seed merchant '{}': {}", name, err);
                Ok(())
            }
        }
    }
}
