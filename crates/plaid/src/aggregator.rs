//! [`AggregatorClient`] implementation backed by the Plaid API.

use async_trait::async_trait;
use chrono::NaiveDate;
use pocketledger_core::sync::{
    AggregatorClient, InvestmentsPage, ProviderAccount, SyncPage,
};
use pocketledger_core::Result;

use crate::client::PlaidClient;

#[async_trait]
impl AggregatorClient for PlaidClient {
    async fn transactions_sync(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<SyncPage> {
        let response = self.transactions_sync_page(access_token, cursor).await?;
        Ok(SyncPage {
            added: response.added.into_iter().map(Into::into).collect(),
            modified: response.modified.into_iter().map(Into::into).collect(),
            removed: response.removed.into_iter().map(Into::into).collect(),
            next_cursor: response.next_cursor,
            has_more: response.has_more,
        })
    }

    async fn account_snapshot(&self, access_token: &str) -> Result<Vec<ProviderAccount>> {
        let accounts = self.get_balances(access_token).await?;
        Ok(accounts.into_iter().map(Into::into).collect())
    }

    async fn investments(
        &self,
        access_token: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<InvestmentsPage> {
        let (mut securities, transactions) = self
            .get_investment_transactions(access_token, start_date, end_date)
            .await?;

        // Holdings carry fresher close prices than the transaction feed;
        // prefer them when the same security appears in both.
        match self.get_holdings(access_token).await {
            Ok(holdings) => {
                for security in holdings.securities {
                    match securities
                        .iter_mut()
                        .find(|s| s.security_id == security.security_id)
                    {
                        Some(existing) => *existing = security,
                        None => securities.push(security),
                    }
                }
            }
            Err(err) => {
                log::warn!("Holdings fetch failed, keeping feed securities: {}", err);
            }
        }

        Ok(InvestmentsPage {
            securities: securities.into_iter().map(Into::into).collect(),
            investment_transactions: transactions.into_iter().map(Into::into).collect(),
        })
    }
}
