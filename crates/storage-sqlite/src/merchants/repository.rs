use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, Result, StorageError};
use crate::schema::merchants;
use crate::schema::merchants::dsl::*;

use super::model::MerchantDB;
use pocketledger_core::merchants::{
    Merchant, MerchantDefaultsUpdate, MerchantRepositoryTrait, NewMerchant,
};

pub struct MerchantRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl MerchantRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl MerchantRepositoryTrait for MerchantRepository {
    fn find_by_entity_id(&self, external_entity_id: &str) -> Result<Option<Merchant>> {
        let mut conn = get_connection(&self.pool)?;

        let row = merchants
            .select(MerchantDB::as_select())
            .filter(entity_id.eq(external_entity_id))
            .first::<MerchantDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Merchant::from))
    }

    fn find_by_name(&self, merchant_name: &str) -> Result<Option<Merchant>> {
        let mut conn = get_connection(&self.pool)?;

        let row = merchants
            .select(MerchantDB::as_select())
            .filter(name.eq(merchant_name))
            .first::<MerchantDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Merchant::from))
    }

    async fn create(&self, merchant: NewMerchant) -> Result<Merchant> {
        self.writer
            .exec(move |conn| {
                let row: MerchantDB = merchant.into();
                match diesel::insert_into(merchants::table)
                    .values(&row)
                    .execute(conn)
                {
                    Ok(_) => Ok(row.into()),
                    // Lost the race on the unique name; hand back the winner.
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        let winner = merchants
                            .select(MerchantDB::as_select())
                            .filter(name.eq(&row.name))
                            .first::<MerchantDB>(conn)
                            .into_core()?;
                        Ok(winner.into())
                    }
                    Err(e) => Err(StorageError::QueryFailed(e).into()),
                }
            })
            .await
    }

    async fn update_defaults(&self, update: MerchantDefaultsUpdate) -> Result<Merchant> {
        self.writer
            .exec(move |conn| {
                let mut row = merchants
                    .select(MerchantDB::as_select())
                    .find(&update.merchant_id)
                    .first::<MerchantDB>(conn)
                    .into_core()?;

                row.default_category_id = update.default_category_id;
                row.default_tag_id = update.default_tag_id;
                if let Some(confirmed_flag) = update.confirmed {
                    row.confirmed = confirmed_flag;
                }
                row.updated_at = chrono::Utc::now().naive_utc();

                diesel::update(merchants.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;

                Ok(row.into())
            })
            .await
    }

    fn list(&self) -> Result<Vec<Merchant>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = merchants
            .select(MerchantDB::as_select())
            .order(name.asc())
            .load::<MerchantDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Merchant::from).collect())
    }
}
