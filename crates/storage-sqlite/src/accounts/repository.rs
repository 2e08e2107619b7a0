use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use crate::db::{get_connection, WriteHandle};
use crate::decimal_text::opt_decimal_to_text;
use crate::errors::{IntoCore, Result};
use crate::schema::accounts;
use crate::schema::accounts::dsl::*;

use super::model::AccountDB;
use pocketledger_core::accounts::{
    Account, AccountRepositoryTrait, AccountUpdate, NewAccount, SyncStatus,
};

/// Repository for account rows. Reads go through the pool, writes through
/// the serialized writer.
pub struct AccountRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        self.writer
            .exec(move |conn| {
                let account_db: AccountDB = new_account.into();
                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .into_core()?;
                Ok(account_db.into())
            })
            .await
    }

    async fn update(&self, update: AccountUpdate) -> Result<Account> {
        self.writer
            .exec(move |conn| {
                let mut account_db = accounts
                    .select(AccountDB::as_select())
                    .find(&update.id)
                    .first::<AccountDB>(conn)
                    .into_core()?;

                account_db.custom_name = update.custom_name;
                if let Some(hidden_flag) = update.hidden {
                    account_db.hidden = hidden_flag;
                }
                account_db.updated_at = chrono::Utc::now().naive_utc();

                diesel::update(accounts.find(&account_db.id))
                    .set(&account_db)
                    .execute(conn)
                    .into_core()?;

                Ok(account_db.into())
            })
            .await
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        let account = accounts
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(account.into())
    }

    fn list(&self, status: Option<SyncStatus>) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = accounts::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(sync_status.eq(status.as_str()));
        }

        let results = query
            .select(AccountDB::as_select())
            .order((item_id.asc(), name.asc()))
            .load::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(Account::from).collect())
    }

    fn list_by_item(&self, item: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let results = accounts
            .select(AccountDB::as_select())
            .filter(item_id.eq(item))
            .order(name.asc())
            .load::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(Account::from).collect())
    }

    async fn reset_all_cursors(&self) -> Result<()> {
        self.writer
            .exec(move |conn| {
                diesel::update(accounts)
                    .set((
                        cursor.eq::<Option<String>>(None),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    async fn save_item_sync_progress(
        &self,
        item: String,
        item_cursor: Option<String>,
    ) -> Result<()> {
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                diesel::update(accounts.filter(item_id.eq(&item)))
                    .set((
                        cursor.eq(item_cursor),
                        last_synced_at.eq(Some(now)),
                        updated_at.eq(now),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    async fn set_item_status(
        &self,
        item: String,
        status: SyncStatus,
        message: Option<String>,
    ) -> Result<()> {
        self.writer
            .exec(move |conn| {
                diesel::update(accounts.filter(item_id.eq(&item)))
                    .set((
                        sync_status.eq(status.as_str()),
                        error_message.eq(message),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    async fn update_balances(
        &self,
        account_id: String,
        current: Option<Decimal>,
        available: Option<Decimal>,
    ) -> Result<()> {
        self.writer
            .exec(move |conn| {
                diesel::update(accounts.find(&account_id))
                    .set((
                        current_balance.eq(opt_decimal_to_text(current.as_ref())),
                        available_balance.eq(opt_decimal_to_text(available.as_ref())),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    async fn adopt_external_id(&self, account_id: String, external_id: String) -> Result<()> {
        self.writer
            .exec(move |conn| {
                diesel::update(accounts.find(&account_id))
                    .set((
                        plaid_account_id.eq(Some(external_id)),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    async fn deactivate(&self, account_id: String, reason: String) -> Result<()> {
        self.writer
            .exec(move |conn| {
                diesel::update(accounts.find(&account_id))
                    .set((
                        sync_status.eq(SyncStatus::Inactive.as_str()),
                        error_message.eq(Some(reason)),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::db::{create_pool, init, run_migrations, write_actor::spawn_writer};

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

    fn new_account_fixture(item: &str, external: Option<&str>) -> NewAccount {
        NewAccount {
            id: None,
            item_id: item.to_string(),
            plaid_account_id: external.map(str::to_string),
            access_token: "token".to_string(),
            institution_name: Some("Test Bank".to_string()),
            name: "Checking".to_string(),
            account_type: "depository".to_string(),
            subtype: Some("checking".to_string()),
            currency: "USD".to_string(),
            current_balance: None,
            available_balance: None,
        }
    }

    #[tokio::test]
    async fn sync_progress_lands_on_every_account_of_the_item() {
        let (pool, writer) = setup_db();
        let repo = AccountRepository::new(pool, writer);

        let a1 = repo.create(new_account_fixture("item-1", Some("ext-1"))).await.unwrap();
        let a2 = repo.create(new_account_fixture("item-1", Some("ext-2"))).await.unwrap();
        let other = repo.create(new_account_fixture("item-2", Some("ext-3"))).await.unwrap();

        repo.save_item_sync_progress("item-1".to_string(), Some("cursor-1".to_string()))
            .await
            .unwrap();

        for account_id_value in [&a1.id, &a2.id] {
            let stored = repo.get_by_id(account_id_value).unwrap();
            assert_eq!(stored.cursor.as_deref(), Some("cursor-1"));
            assert!(stored.last_synced_at.is_some());
        }
        let untouched = repo.get_by_id(&other.id).unwrap();
        assert!(untouched.cursor.is_none());
    }

    #[tokio::test]
    async fn reset_clears_cursors_everywhere() {
        let (pool, writer) = setup_db();
        let repo = AccountRepository::new(pool, writer);

        let account = repo.create(new_account_fixture("item-1", Some("ext-1"))).await.unwrap();
        repo.save_item_sync_progress("item-1".to_string(), Some("cursor-1".to_string()))
            .await
            .unwrap();
        repo.reset_all_cursors().await.unwrap();

        let stored = repo.get_by_id(&account.id).unwrap();
        assert!(stored.cursor.is_none());
    }

    #[tokio::test]
    async fn duplicate_external_id_is_rejected_while_active() {
        let (pool, writer) = setup_db();
        let repo = AccountRepository::new(pool, writer);

        repo.create(new_account_fixture("item-1", Some("ext-1"))).await.unwrap();
        let duplicate = repo.create(new_account_fixture("item-1", Some("ext-1"))).await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn deactivated_row_frees_its_external_id() {
        let (pool, writer) = setup_db();
        let repo = AccountRepository::new(pool, writer);

        let old = repo.create(new_account_fixture("item-1", Some("ext-1"))).await.unwrap();
        repo.deactivate(old.id.clone(), "closed".to_string()).await.unwrap();

        let replacement = repo.create(new_account_fixture("item-1", Some("ext-1"))).await;
        assert!(replacement.is_ok());

        let stored = repo.get_by_id(&old.id).unwrap();
        assert_eq!(stored.sync_status, SyncStatus::Inactive);
        assert_eq!(stored.error_message.as_deref(), Some("closed"));
    }

    #[tokio::test]
    async fn status_filter_narrows_listing() {
        let (pool, writer) = setup_db();
        let repo = AccountRepository::new(pool, writer);

        repo.create(new_account_fixture("item-1", Some("ext-1"))).await.unwrap();
        let errored = repo.create(new_account_fixture("item-2", Some("ext-2"))).await.unwrap();
        repo.set_item_status(
            "item-2".to_string(),
            SyncStatus::Error,
            Some("boom".to_string()),
        )
        .await
        .unwrap();

        let active = repo.list(Some(SyncStatus::Active)).unwrap();
        assert_eq!(active.len(), 1);
        let all = repo.list(None).unwrap();
        assert_eq!(all.len(), 2);
        let stored = repo.get_by_id(&errored.id).unwrap();
        assert_eq!(stored.error_message.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn adopt_external_id_updates_the_row() {
        let (pool, writer) = setup_db();
        let repo = AccountRepository::new(pool, writer);

        let account = repo.create(new_account_fixture("item-1", Some("old-ext"))).await.unwrap();
        repo.adopt_external_id(account.id.clone(), "new-ext".to_string())
            .await
            .unwrap();

        let stored = repo.get_by_id(&account.id).unwrap();
        assert_eq!(stored.plaid_account_id.as_deref(), Some("new-ext"));
    }
}
