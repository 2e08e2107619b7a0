use pocketledger_plaid::PlaidEnvironment;

/// Server configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Directory holding the SQLite database file.
    pub data_dir: String,
    pub plaid_client_id: String,
    pub plaid_secret: String,
    pub plaid_environment: PlaidEnvironment,
    /// Name shown by the aggregator's linking UI.
    pub link_client_name: String,
    /// When false, webhook payloads are accepted without signature checks.
    pub verify_webhooks: bool,
}

impl Config {
    pub fn from_env() -> Self {
        // Missing .env is fine; real env vars still apply.
        let _ = dotenvy::dotenv();

        let listen_addr =
            std::env::var("PL_LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3500".to_string());
        let data_dir = std::env::var("PL_DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        let plaid_client_id = std::env::var("PLAID_CLIENT_ID").unwrap_or_default();
        let plaid_secret = std::env::var("PLAID_SECRET").unwrap_or_default();
        let plaid_environment =
            PlaidEnvironment::parse(&std::env::var("PLAID_ENV").unwrap_or_default());
        let link_client_name =
            std::env::var("PL_LINK_CLIENT_NAME").unwrap_or_else(|_| "PocketLedger".to_string());
        let verify_webhooks = std::env::var("PL_VERIFY_WEBHOOKS")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Self {
            listen_addr,
            data_dir,
            plaid_client_id,
            plaid_secret,
            plaid_environment,
            link_client_name,
            verify_webhooks,
        }
    }
}
