//! Merchant domain models.
//!
//! A merchant is a local normalization entity keyed by name (and optionally
//! by the provider's stable entity identifier). It holds the default
//! category/tag auto-applied to future transactions from the same merchant.
//! Merchants are created lazily the first time a named merchant is seen; a
//! transaction never requires a merchant row to exist.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: String,
    pub name: String,
    /// Provider entity identifier, when known. Unique.
    pub entity_id: Option<String>,
    pub default_category_id: Option<String>,
    pub default_tag_id: Option<String>,
    /// User-confirmed defaults are applied even to provider-modified rows.
    pub confirmed: bool,
    /// Provider confidence hint captured when the merchant was first seen.
    pub confidence: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMerchant {
    pub name: String,
    pub entity_id: Option<String>,
    pub default_category_id: Option<String>,
    pub default_tag_id: Option<String>,
    pub confirmed: bool,
    pub confidence: Option<String>,
    pub logo_url: Option<String>,
}

/// Defaults update used by the bulk-update endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDefaultsUpdate {
    pub merchant_id: String,
    pub default_category_id: Option<String>,
    pub default_tag_id: Option<String>,
    pub confirmed: Option<bool>,
}
