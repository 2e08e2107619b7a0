use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, Result, StorageError};
use crate::schema::tags;
use crate::schema::tags::dsl::*;

use super::model::TagDB;
use pocketledger_core::tags::{NewTag, Tag, TagRepositoryTrait};

pub struct TagRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TagRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TagRepositoryTrait for TagRepository {
    fn get_by_id(&self, tag_id: &str) -> Result<Option<Tag>> {
        let mut conn = get_connection(&self.pool)?;

        let row = tags
            .select(TagDB::as_select())
            .find(tag_id)
            .first::<TagDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Tag::from))
    }

    fn list(&self) -> Result<Vec<Tag>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = tags
            .select(TagDB::as_select())
            .order(name.asc())
            .load::<TagDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn create(&self, tag: NewTag) -> Result<Tag> {
        self.writer
            .exec(move |conn| {
                let row: TagDB = tag.into();
                match diesel::insert_into(tags::table).values(&row).execute(conn) {
                    Ok(_) => Ok(row.into()),
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        let winner = tags
                            .select(TagDB::as_select())
                            .filter(name.eq(&row.name))
                            .first::<TagDB>(conn)
                            .into_core()?;
                        Ok(winner.into())
                    }
                    Err(e) => Err(StorageError::QueryFailed(e).into()),
                }
            })
            .await
    }
}
