//! Database model for categories.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketledger_core::categories::{Category, NewCategory};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryDB {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub plaid_detailed_category: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            parent_id: db.parent_id,
            plaid_detailed_category: db.plaid_detailed_category,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewCategory> for CategoryDB {
    fn from(domain: NewCategory) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: domain.name,
            parent_id: domain.parent_id,
            plaid_detailed_category: domain.plaid_detailed_category,
            created_at: now,
            updated_at: now,
        }
    }
}
