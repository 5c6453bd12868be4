//! Wallet session: the connected account, its balance, and the active network.
//!
//! Every fetch fully replaces the relevant piece of state — there is no merge,
//! so overlapping calls resolve last-write-wins and the session always
//! reflects the most recent successful provider query.

use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::mpsc;

use crate::error::{Result, WalletError};
use crate::provider::{ProviderEvent, WalletProvider};
use crate::registry;

/// What an out-of-band provider notification did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Accounts changed; the session re-ran `connect`.
    Reconnected { account: Option<Address> },
    /// The chain changed; all session state was discarded and rebuilt.
    Reloaded { network_key: String },
}

pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    /// Held for the lifetime of the session; dropped on teardown, which
    /// unsubscribes from the provider.
    events: mpsc::UnboundedReceiver<ProviderEvent>,
    account: Option<Address>,
    balance_wei: u128,
    network_key: String,
}

impl WalletSession {
    pub fn new(provider: Arc<dyn WalletProvider>, initial_network_key: &str) -> Self {
        let events = provider.subscribe();
        Self {
            provider,
            events,
            account: None,
            balance_wei: 0,
            network_key: initial_network_key.to_string(),
        }
    }

    /// The connected account, absent until `connect` succeeds.
    pub fn account(&self) -> Option<Address> {
        self.account
    }

    /// Last fetched native balance, in wei.
    pub fn balance_wei(&self) -> u128 {
        self.balance_wei
    }

    /// Registry key of the active network.
    pub fn network_key(&self) -> &str {
        &self.network_key
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    /// Request account access and populate the session.
    ///
    /// Sets the account to the first address the provider exposes and fetches
    /// a fresh balance. If the provider's current chain id maps to a known
    /// network, the active network follows it; otherwise it is left alone.
    /// On any failure the session keeps its pre-call state.
    pub async fn connect(&mut self) -> Result<()> {
        let accounts = self.provider.request_accounts().await?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| WalletError::Provider("The provider returned no accounts.".into()))?;
        let balance = self.provider.balance(account).await?;

        self.account = Some(account);
        self.balance_wei = balance;

        match self.provider.chain_id().await {
            Ok(id) => {
                if let Some(entry) = registry::lookup_chain_id(id) {
                    self.network_key = entry.key;
                }
            }
            Err(e) => log::debug!("chain id query after connect failed: {e}"),
        }
        Ok(())
    }

    /// Switch the provider to a known network.
    ///
    /// When the provider has never seen the chain (code 4902) it is asked to
    /// add it from the full registry entry, and a successful add counts as a
    /// successful switch. Any other provider error aborts with the active
    /// network unchanged. After a switch the balance is refetched best-effort.
    pub async fn switch_network(&mut self, key: &str) -> Result<()> {
        let entry =
            registry::lookup(key).ok_or_else(|| WalletError::UnknownNetwork(key.to_string()))?;

        match self.provider.switch_chain(entry.chain_id).await {
            Ok(()) => {}
            Err(err) if err.is_unrecognized_chain() => {
                self.provider.add_chain(&entry).await?;
            }
            Err(err) => return Err(err.into()),
        }

        self.network_key = entry.key.clone();

        if let Some(account) = self.account {
            match self.provider.balance(account).await {
                Ok(wei) => self.balance_wei = wei,
                Err(e) => log::warn!("balance refresh after network switch failed: {e}"),
            }
        }
        Ok(())
    }

    /// Refetch the balance for the connected account, replacing the old value.
    pub async fn refresh_balance(&mut self) -> Result<u128> {
        let account = self.account.ok_or(WalletError::NotConnected)?;
        let wei = self.provider.balance(account).await?;
        self.balance_wei = wei;
        Ok(wei)
    }

    /// Drain queued provider notifications and apply them.
    ///
    /// An account change re-runs `connect`. A chain change is handled bluntly:
    /// all session state is discarded and the session reconnects from scratch
    /// rather than reconciling incrementally. Handler failures are logged and
    /// swallowed; the returned updates let the view announce what happened.
    pub async fn process_events(&mut self) -> Vec<SessionUpdate> {
        let mut pending = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            pending.push(event);
        }

        let mut updates = Vec::new();
        for event in pending {
            match event {
                ProviderEvent::AccountsChanged(_) => {
                    if let Err(e) = self.connect().await {
                        log::warn!("reconnect after account change failed: {e}");
                    }
                    updates.push(SessionUpdate::Reconnected {
                        account: self.account,
                    });
                }
                ProviderEvent::ChainChanged(_) => {
                    self.account = None;
                    self.balance_wei = 0;
                    if let Err(e) = self.connect().await {
                        log::warn!("session reload after chain change failed: {e}");
                    }
                    updates.push(SessionUpdate::Reloaded {
                        network_key: self.network_key.clone(),
                    });
                }
            }
        }
        updates
    }
}
