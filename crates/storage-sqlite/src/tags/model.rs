//! Database model for tags.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use pocketledger_core::tags::{NewTag, Tag};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TagDB {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TagDB> for Tag {
    fn from(db: TagDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            color: db.color,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewTag> for TagDB {
    fn from(domain: NewTag) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: domain.name,
            color: domain.color,
            created_at: now,
            updated_at: now,
        }
    }
}
