//! Account reconciliation planning.
//!
//! Compares the locally stored accounts of one institution item against the
//! aggregator's current snapshot and produces the actions that bring the
//! local set in line. Planning is pure; the sync service applies the plan.

use crate::accounts::Account;
use crate::sync::aggregator::ProviderAccount;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileAction {
    /// Refresh balances and descriptive fields on a matched account.
    UpdateMatched {
        account_id: String,
        provider: ProviderAccount,
    },
    /// The institution's only local account has never stored an external
    /// id and the provider reports exactly one account: adopt its id.
    AdoptExternalId {
        account_id: String,
        provider: ProviderAccount,
    },
    /// A provider account with no local counterpart.
    CreateAccount(ProviderAccount),
    /// A local account the provider no longer reports.
    Deactivate { account_id: String },
}

/// Plans reconciliation for one item. `local` is the item's non-inactive
/// account set; `provider` is the aggregator snapshot.
pub fn plan_account_reconciliation(
    local: &[Account],
    provider: &[ProviderAccount],
) -> Vec<ReconcileAction> {
    let mut actions = Vec::new();
    let mut unmatched_local: Vec<&Account> = Vec::new();
    let mut matched_provider_ids: Vec<&str> = Vec::new();

    for account in local {
        let matched = account.plaid_account_id.as_deref().and_then(|external_id| {
            provider.iter().find(|p| p.account_id == external_id)
        });
        match matched {
            Some(provider_account) => {
                matched_provider_ids.push(provider_account.account_id.as_str());
                actions.push(ReconcileAction::UpdateMatched {
                    account_id: account.id.clone(),
                    provider: provider_account.clone(),
                });
            }
            None => unmatched_local.push(account),
        }
    }

    let unmatched_provider: Vec<&ProviderAccount> = provider
        .iter()
        .filter(|p| !matched_provider_ids.contains(&p.account_id.as_str()))
        .collect();

    // Id adoption is only for the pre-migration shape: a single local
    // account that never stored an external id, alone against a single
    // provider account. An account whose stored id the provider dropped is
    // a different real-world account and must not inherit the new id.
    if local.len() == 1
        && provider.len() == 1
        && unmatched_local.len() == 1
        && unmatched_provider.len() == 1
        && unmatched_local[0].plaid_account_id.is_none()
    {
        actions.push(ReconcileAction::AdoptExternalId {
            account_id: unmatched_local[0].id.clone(),
            provider: unmatched_provider[0].clone(),
        });
        return actions;
    }

    for provider_account in unmatched_provider {
        actions.push(ReconcileAction::CreateAccount(provider_account.clone()));
    }
    for account in unmatched_local {
        actions.push(ReconcileAction::Deactivate {
            account_id: account.id.clone(),
        });
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::SyncStatus;
    use chrono::NaiveDateTime;

    fn local_account(id: &str, external: Option<&str>) -> Account {
        let now = NaiveDateTime::default();
        Account {
            id: id.to_string(),
            item_id: "item-1".to_string(),
            plaid_account_id: external.map(str::to_string),
            access_token: "token".to_string(),
            institution_name: Some("Test Bank".to_string()),
            name: "Checking".to_string(),
            custom_name: None,
            hidden: false,
            account_type: "depository".to_string(),
            subtype: Some("checking".to_string()),
            currency: "USD".to_string(),
            current_balance: None,
            available_balance: None,
            cursor: None,
            sync_status: SyncStatus::Active,
            error_message: None,
            last_synced_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn provider_account(id: &str) -> ProviderAccount {
        ProviderAccount {
            account_id: id.to_string(),
            name: Some("Checking".to_string()),
            official_name: None,
            account_type: Some("depository".to_string()),
            subtype: Some("checking".to_string()),
            currency: Some("USD".to_string()),
            current_balance: None,
            available_balance: None,
        }
    }

    #[test]
    fn matched_accounts_get_balance_updates() {
        let local = vec![local_account("a1", Some("ext-1"))];
        let provider = vec![provider_account("ext-1")];
        let plan = plan_account_reconciliation(&local, &provider);
        assert_eq!(plan.len(), 1);
        assert!(matches!(
            &plan[0],
            ReconcileAction::UpdateMatched { account_id, .. } if account_id == "a1"
        ));
    }

    #[test]
    fn sole_unlinked_account_adopts_the_provider_id() {
        let local = vec![local_account("a1", None)];
        let provider = vec![provider_account("ext-1")];
        let plan = plan_account_reconciliation(&local, &provider);
        assert_eq!(plan.len(), 1);
        assert!(matches!(
            &plan[0],
            ReconcileAction::AdoptExternalId { account_id, provider }
                if account_id == "a1" && provider.account_id == "ext-1"
        ));
    }

    #[test]
    fn dropped_external_id_is_replaced_not_adopted() {
        let local = vec![local_account("a1", Some("old-ext"))];
        let provider = vec![provider_account("new-ext")];
        let plan = plan_account_reconciliation(&local, &provider);
        assert_eq!(plan.len(), 2);
        assert!(plan.contains(&ReconcileAction::CreateAccount(provider_account("new-ext"))));
        assert!(plan.contains(&ReconcileAction::Deactivate {
            account_id: "a1".to_string()
        }));
    }

    #[test]
    fn unlinked_duplicate_next_to_a_matched_account_is_deactivated() {
        let local = vec![
            local_account("a1", Some("ext-1")),
            local_account("a2", None),
        ];
        let provider = vec![provider_account("ext-1"), provider_account("ext-new")];
        let plan = plan_account_reconciliation(&local, &provider);
        assert_eq!(plan.len(), 3);
        assert!(plan.contains(&ReconcileAction::CreateAccount(provider_account("ext-new"))));
        assert!(plan.contains(&ReconcileAction::Deactivate {
            account_id: "a2".to_string()
        }));
        assert!(!plan
            .iter()
            .any(|a| matches!(a, ReconcileAction::AdoptExternalId { .. })));
    }

    #[test]
    fn new_and_vanished_accounts_create_and_deactivate() {
        let local = vec![
            local_account("a1", Some("ext-1")),
            local_account("a2", Some("gone-ext")),
        ];
        let provider = vec![
            provider_account("ext-1"),
            provider_account("new-ext-1"),
            provider_account("new-ext-2"),
        ];
        let plan = plan_account_reconciliation(&local, &provider);
        assert_eq!(plan.len(), 4);
        let creates = plan
            .iter()
            .filter(|a| matches!(a, ReconcileAction::CreateAccount(_)))
            .count();
        let deactivates = plan
            .iter()
            .filter(|a| matches!(a, ReconcileAction::Deactivate { .. }))
            .count();
        assert_eq!(creates, 2);
        assert_eq!(deactivates, 1);
    }
}
