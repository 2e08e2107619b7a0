use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use pocketledger_core::accounts::AccountRepositoryTrait;
use pocketledger_core::categories::CategoryRepositoryTrait;
use pocketledger_core::merchants::MerchantRepositoryTrait;
use pocketledger_core::sync::{AggregatorClient, Categorizer, SyncService};
use pocketledger_core::tags::TagRepositoryTrait;
use pocketledger_core::transactions::TransactionRepositoryTrait;
use pocketledger_plaid::{PlaidClient, PlaidConfig};
use pocketledger_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, AccountRepository, CategoryRepository,
    InvestmentRepository, MerchantRepository, TagRepository, TransactionRepository,
};

pub struct AppState {
    pub account_repo: Arc<dyn AccountRepositoryTrait>,
    pub transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    pub merchant_repo: Arc<dyn MerchantRepositoryTrait>,
    pub category_repo: Arc<dyn CategoryRepositoryTrait>,
    pub tag_repo: Arc<dyn TagRepositoryTrait>,
    pub sync_service: Arc<SyncService>,
    pub plaid: Arc<PlaidClient>,
    pub config: Config,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("PL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = init(&config.data_dir)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer(pool.as_ref().clone());

    let account_repo: Arc<dyn AccountRepositoryTrait> =
        Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let transaction_repo: Arc<dyn TransactionRepositoryTrait> =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let merchant_repo: Arc<dyn MerchantRepositoryTrait> =
        Arc::new(MerchantRepository::new(pool.clone(), writer.clone()));
    let category_repo: Arc<dyn CategoryRepositoryTrait> =
        Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let tag_repo: Arc<dyn TagRepositoryTrait> =
        Arc::new(TagRepository::new(pool.clone(), writer.clone()));
    let investment_repo = Arc::new(InvestmentRepository::new(pool.clone(), writer.clone()));

    let plaid = Arc::new(PlaidClient::new(PlaidConfig {
        client_id: config.plaid_client_id.clone(),
        secret: config.plaid_secret.clone(),
        environment: config.plaid_environment,
    })?);

    let aggregator: Arc<dyn AggregatorClient> = plaid.clone();
    let categorizer = Categorizer::new(merchant_repo.clone(), category_repo.clone());
    let sync_service = Arc::new(SyncService::new(
        aggregator,
        account_repo.clone(),
        transaction_repo.clone(),
        investment_repo,
        categorizer,
    ));

    Ok(Arc::new(AppState {
        account_repo,
        transaction_repo,
        merchant_repo,
        category_repo,
        tag_repo,
        sync_service,
        plaid,
        config: config.clone(),
        db_path,
    }))
}
