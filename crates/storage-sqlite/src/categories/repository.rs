use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, Result, StorageError};
use crate::schema::categories;
use crate::schema::categories::dsl::*;

use super::model::CategoryDB;
use pocketledger_core::categories::{Category, CategoryRepositoryTrait, NewCategory};

pub struct CategoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn find_by_detailed_code(&self, detailed_code: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;

        let row = categories
            .select(CategoryDB::as_select())
            .filter(plaid_detailed_category.eq(detailed_code))
            .first::<CategoryDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Category::from))
    }

    fn get_by_id(&self, category_id: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;

        let row = categories
            .select(CategoryDB::as_select())
            .find(category_id)
            .first::<CategoryDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Category::from))
    }

    fn list(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = categories
            .select(CategoryDB::as_select())
            .order(name.asc())
            .load::<CategoryDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn create(&self, category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn| {
                let row: CategoryDB = category.into();
                diesel::insert_into(categories::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(row.into())
            })
            .await
    }

    async fn find_or_create_for_code(&self, detailed_code: &str, display_name: &str) -> Result<Category> {
        let code = detailed_code.to_string();
        let new_name = display_name.to_string();

        self.writer
            .exec(move |conn| {
                if let Some(existing) = categories
                    .select(CategoryDB::as_select())
                    .filter(plaid_detailed_category.eq(&code))
                    .first::<CategoryDB>(conn)
                    .optional()
                    .into_core()?
                {
                    return Ok(existing.into());
                }

                let row: CategoryDB = NewCategory {
                    name: new_name,
                    parent_id: None,
                    plaid_detailed_category: Some(code.clone()),
                }
                .into();

                match diesel::insert_into(categories::table)
                    .values(&row)
                    .execute(conn)
                {
                    Ok(_) => Ok(row.into()),
                    // First writer wins on the unique code; return its row.
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        let winner = categories
                            .select(CategoryDB::as_select())
                            .filter(plaid_detailed_category.eq(&code))
                            .first::<CategoryDB>(conn)
                            .into_core()?;
                        Ok(winner.into())
                    }
                    Err(e) => Err(StorageError::QueryFailed(e).into()),
                }
            })
            .await
    }
}
