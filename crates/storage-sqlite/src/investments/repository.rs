use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;

use crate::db::WriteHandle;
use crate::errors::{IntoCore, Result};
use crate::schema::{investment_transactions, securities};

use super::model::{InvestmentTransactionDB, SecurityDB};
use pocketledger_core::investments::{
    InvestmentRepositoryTrait, InvestmentTransactionUpsert, SecurityUpsert,
};

pub struct InvestmentRepository {
    #[allow(dead_code)]
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    async fn upsert_securities(&self, items: Vec<SecurityUpsert>) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let mut stored = 0;
                for item in items {
                    let row: SecurityDB = item.into();
                    stored += diesel::insert_into(securities::table)
                        .values(&row)
                        .on_conflict(securities::id)
                        .do_update()
                        .set((
                            securities::name.eq(&row.name),
                            securities::ticker_symbol.eq(&row.ticker_symbol),
                            securities::security_type.eq(&row.security_type),
                            securities::close_price.eq(&row.close_price),
                            securities::close_price_as_of.eq(&row.close_price_as_of),
                            securities::currency.eq(&row.currency),
                            securities::updated_at.eq(row.updated_at),
                        ))
                        .execute(conn)
                        .into_core()?;
                }
                Ok(stored)
            })
            .await
    }

    async fn upsert_investment_transactions(
        &self,
        items: Vec<InvestmentTransactionUpsert>,
    ) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let mut stored = 0;
                for item in items {
                    let row: InvestmentTransactionDB = item.into();
                    stored += diesel::insert_into(investment_transactions::table)
                        .values(&row)
                        .on_conflict(investment_transactions::id)
                        .do_update()
                        .set((
                            investment_transactions::account_id.eq(&row.account_id),
                            investment_transactions::security_id.eq(&row.security_id),
                            investment_transactions::date.eq(row.date),
                            investment_transactions::name.eq(&row.name),
                            investment_transactions::quantity.eq(&row.quantity),
                            investment_transactions::amount.eq(&row.amount),
                            investment_transactions::price.eq(&row.price),
                            investment_transactions::fees.eq(&row.fees),
                            investment_transactions::transaction_type.eq(&row.transaction_type),
                            investment_transactions::subtype.eq(&row.subtype),
                            investment_transactions::currency.eq(&row.currency),
                            investment_transactions::updated_at.eq(row.updated_at),
                        ))
                        .execute(conn)
                        .into_core()?;
                }
                Ok(stored)
            })
            .await
    }
}
