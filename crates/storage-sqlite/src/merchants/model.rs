//! Database model for merchants.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketledger_core::merchants::{Merchant, NewMerchant};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::merchants)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MerchantDB {
    pub id: String,
    pub name: String,
    pub entity_id: Option<String>,
    pub default_category_id: Option<String>,
    pub default_tag_id: Option<String>,
    pub confirmed: bool,
    pub confidence: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<MerchantDB> for Merchant {
    fn from(db: MerchantDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            entity_id: db.entity_id,
            default_category_id: db.default_category_id,
            default_tag_id: db.default_tag_id,
            confirmed: db.confirmed,
            confidence: db.confidence,
            logo_url: db.logo_url,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewMerchant> for MerchantDB {
    fn from(domain: NewMerchant) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: domain.name,
            entity_id: domain.entity_id,
            default_category_id: domain.default_category_id,
            default_tag_id: domain.default_tag_id,
            confirmed: domain.confirmed,
            confidence: domain.confidence,
            logo_url: domain.logo_url,
            created_at: now,
            updated_at: now,
        }
    }
}
