use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;

use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, Result};
use crate::schema::transactions;
use crate::schema::transactions::dsl::*;

use super::model::TransactionDB;
use pocketledger_core::transactions::{
    Transaction, TransactionRepositoryTrait, TransactionUpsert,
};

pub struct TransactionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn upsert(&self, txn: TransactionUpsert) -> Result<()> {
        self.writer
            .exec(move |conn| {
                let existing = transactions
                    .select(TransactionDB::as_select())
                    .find(&txn.id)
                    .first::<TransactionDB>(conn)
                    .optional()
                    .into_core()?;

                let mut row: TransactionDB = txn.into();
                if let Some(existing) = existing {
                    // The provider-reported merchant name is write-once.
                    if existing.plaid_merchant_name.is_some() {
                        row.plaid_merchant_name = existing.plaid_merchant_name;
                    }
                    row.created_at = existing.created_at;
                    diesel::update(transactions.find(&row.id))
                        .set(&row)
                        .execute(conn)
                        .into_core()?;
                } else {
                    diesel::insert_into(transactions::table)
                        .values(&row)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(())
            })
            .await
    }

    async fn apply_modify(&self, txn: TransactionUpsert) -> Result<bool> {
        self.writer
            .exec(move |conn| {
                let Some(existing) = transactions
                    .select(TransactionDB::as_select())
                    .find(&txn.id)
                    .first::<TransactionDB>(conn)
                    .optional()
                    .into_core()?
                else {
                    return Ok(false);
                };

                let mut row: TransactionDB = txn.into();
                if existing.plaid_merchant_name.is_some() {
                    row.plaid_merchant_name = existing.plaid_merchant_name;
                }
                // Unresolved classification leaves the stored values alone.
                if row.category_id.is_none() {
                    row.category_id = existing.category_id;
                }
                if row.tag_id.is_none() {
                    row.tag_id = existing.tag_id;
                }
                row.created_at = existing.created_at;

                diesel::update(transactions.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(true)
            })
            .await
    }

    async fn delete_by_external_id(&self, transaction_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                diesel::delete(transactions.find(&transaction_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.writer
            .exec(move |conn| diesel::delete(transactions).execute(conn).into_core())
            .await
    }

    fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        transactions.count().get_result(&mut conn).into_core()
    }

    fn get_by_external_id(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let row = transactions
            .select(TransactionDB::as_select())
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(row.map(Transaction::from))
    }

    fn list_by_account(&self, account: &str, limit: i64) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = transactions
            .select(TransactionDB::as_select())
            .filter(account_id.eq(account))
            .order(date.desc())
            .limit(limit)
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn backfill_merchant_defaults(
        &self,
        merchant: String,
        category: Option<String>,
        tag: Option<String>,
    ) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                let target = transactions.filter(merchant_name.eq(&merchant));
                let touched = match (&category, &tag) {
                    (Some(cat), Some(t)) => diesel::update(target)
                        .set((
                            category_id.eq(Some(cat.clone())),
                            tag_id.eq(Some(t.clone())),
                            updated_at.eq(now),
                        ))
                        .execute(conn)
                        .into_core()?,
                    (Some(cat), None) => diesel::update(target)
                        .set((category_id.eq(Some(cat.clone())), updated_at.eq(now)))
                        .execute(conn)
                        .into_core()?,
                    (None, Some(t)) => diesel::update(target)
                        .set((tag_id.eq(Some(t.clone())), updated_at.eq(now)))
                        .execute(conn)
                        .into_core()?,
                    (None, None) => 0,
                };
                Ok(touched)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use crate::accounts::AccountRepository;
    use crate::db::{create_pool, init, run_migrations, write_actor::spawn_writer};
    use pocketledger_core::accounts::{AccountRepositoryTrait, NewAccount};

    fn setup_db() -> (
        Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        WriteHandle,
    ) {
        let app_data = tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        let pool = create_pool(&db_path).expect("create pool");
        run_migrations(&pool).expect("migrate db");
        let writer = spawn_writer(pool.as_ref().clone());
        (pool, writer)
    }

    async fn seed_account(
        pool: &Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: &WriteHandle,
    ) -> String {
        let repo = AccountRepository::new(pool.clone(), writer.clone());
        let account = repo
            .create(NewAccount {
                id: None,
                item_id: "item-1".to_string(),
                plaid_account_id: Some("ext-1".to_string()),
                access_token: "token".to_string(),
                institution_name: Some("Test Bank".to_string()),
                name: "Checking".to_string(),
                account_type: "depository".to_string(),
                subtype: Some("checking".to_string()),
                currency: "USD".to_string(),
                current_balance: None,
                available_balance: None,
            })
            .await
            .expect("seed account");
        account.id
    }

    fn upsert_fixture(txn_id: &str, account: &str) -> TransactionUpsert {
        TransactionUpsert {
            id: txn_id.to_string(),
            account_id: account.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            amount: dec!(-12.50),
            name: "ACME COFFEE".to_string(),
            merchant_name: Some("Acme Coffee".to_string()),
            plaid_merchant_name: Some("Acme Coffee".to_string()),
            category_id: None,
            tag_id: None,
            pending: false,
            currency: Some("USD".to_string()),
            location: None,
            payment_meta: None,
            personal_finance_category: None,
            counterparties: None,
            category_confidence: None,
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn reupsert_preserves_provider_merchant_name() {
        let (pool, writer) = setup_db();
        let account = seed_account(&pool, &writer).await;
        let repo = TransactionRepository::new(pool, writer);

        repo.upsert(upsert_fixture("t1", &account)).await.unwrap();

        let mut renamed = upsert_fixture("t1", &account);
        renamed.merchant_name = Some("ACME COFFEE #220".to_string());
        renamed.plaid_merchant_name = Some("ACME COFFEE #220".to_string());
        renamed.amount = dec!(-13.00);
        repo.upsert(renamed).await.unwrap();

        let stored = repo.get_by_external_id("t1").unwrap().unwrap();
        assert_eq!(stored.amount, dec!(-13.00));
        assert_eq!(stored.merchant_name.as_deref(), Some("ACME COFFEE #220"));
        assert_eq!(stored.plaid_merchant_name.as_deref(), Some("Acme Coffee"));
    }

    #[tokio::test]
    async fn modify_missing_row_returns_false_and_writes_nothing() {
        let (pool, writer) = setup_db();
        let account = seed_account(&pool, &writer).await;
        let repo = TransactionRepository::new(pool, writer);

        let applied = repo.apply_modify(upsert_fixture("ghost", &account)).await.unwrap();
        assert!(!applied);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn modify_without_classification_keeps_stored_values() {
        let (pool, writer) = setup_db();
        let account = seed_account(&pool, &writer).await;
        let repo = TransactionRepository::new(pool, writer);

        let mut initial = upsert_fixture("t1", &account);
        initial.category_id = None;
        initial.tag_id = None;
        repo.upsert(initial).await.unwrap();
        repo.backfill_merchant_defaults(
            "Acme Coffee".to_string(),
            None,
            None,
        )
        .await
        .unwrap();

        let mut modified = upsert_fixture("t1", &account);
        modified.pending = true;
        modified.category_id = None;
        modified.tag_id = None;
        let applied = repo.apply_modify(modified).await.unwrap();
        assert!(applied);

        let stored = repo.get_by_external_id("t1").unwrap().unwrap();
        assert!(stored.pending);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_a_noop() {
        let (pool, writer) = setup_db();
        let _account = seed_account(&pool, &writer).await;
        let repo = TransactionRepository::new(pool, writer);

        let deleted = repo.delete_by_external_id("absent".to_string()).await.unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn backfill_touches_only_matching_merchant_rows() {
        let (pool, writer) = setup_db();
        let account = seed_account(&pool, &writer).await;
        let repo = TransactionRepository::new(pool, writer);

        repo.upsert(upsert_fixture("t1", &account)).await.unwrap();
        let mut other = upsert_fixture("t2", &account);
        other.merchant_name = Some("Other Store".to_string());
        repo.upsert(other).await.unwrap();

        let touched = repo
            .backfill_merchant_defaults("Acme Coffee".to_string(), None, None)
            .await
            .unwrap();
        assert_eq!(touched, 0);

        let touched = repo
            .backfill_merchant_defaults("Acme Coffee".to_string(), None, Some("tag-x".to_string()))
            .await;
        // tag-x does not exist; the FK rejects the backfill.
        assert!(touched.is_err());
    }

    #[tokio::test]
    async fn list_by_account_orders_newest_first() {
        let (pool, writer) = setup_db();
        let account = seed_account(&pool, &writer).await;
        let repo = TransactionRepository::new(pool, writer);

        let mut older = upsert_fixture("t-old", &account);
        older.date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        repo.upsert(older).await.unwrap();
        repo.upsert(upsert_fixture("t-new", &account)).await.unwrap();

        let rows = repo.list_by_account(&account, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "t-new");
    }
}
