/// Wallet-provider capability — the seam between the wallet UI and whatever
/// actually holds keys and talks to the chain.
///
/// In a browser this would be the injected `window.ethereum` object; here it
/// is an explicit dependency so a fake provider can be substituted in tests.
mod rpc;

#[cfg(test)]
pub(crate) mod mock;

pub use rpc::RpcProvider;

use alloy_primitives::Address;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::registry::NetworkEntry;

/// EIP-1193: the user rejected the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;
/// EIP-1193: a request of this type is already awaiting user action.
pub const REQUEST_ALREADY_PENDING: i64 = -32002;
/// The requested chain has not been added to the provider.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// Error surfaced by a provider call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// No provider is reachable at all. First-class: the UI must detect this
    /// and prompt the user to install a wallet / start a node.
    #[error("no wallet provider is available")]
    Unavailable,

    /// The provider answered with a JSON-RPC / EIP-1193 error object.
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },

    /// The request never produced a provider answer.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for the recoverable "chain not added yet" switch failure.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.code() == Some(UNRECOGNIZED_CHAIN)
    }
}

/// Provider-level notification, delivered out of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The set of exposed accounts changed; the first entry is the active one.
    AccountsChanged(Vec<Address>),
    /// The provider moved to a different chain.
    ChainChanged(u64),
}

/// A transaction to submit through the provider's signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub to: Address,
    pub value_wei: u128,
    /// ABI-encoded calldata; empty for a plain value transfer.
    pub data: Vec<u8>,
}

/// Receipt returned once a submitted transaction has one confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub success: bool,
}

/// Capability object for account access, chain management, and transaction
/// submission. The signer lives behind this trait: `send_transaction` implies
/// signing by the provider-held key for `from`.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request account access; returns the exposed accounts, active first.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// The chain id the provider is currently on.
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Native balance of `address` in wei, at the latest block.
    async fn balance(&self, address: Address) -> Result<u128, ProviderError>;

    /// Ask the provider to move to `chain_id`. Fails with code 4902 when the
    /// chain has not been registered with the provider.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// Register a chain from full metadata and make it active.
    async fn add_chain(&self, entry: &NetworkEntry) -> Result<(), ProviderError>;

    /// Sign and submit a transaction from `from`; returns the transaction hash.
    async fn send_transaction(
        &self,
        from: Address,
        request: &TransactionRequest,
    ) -> Result<String, ProviderError>;

    /// Wait until the transaction has one confirmation. Runs to completion or
    /// failure; there is no timeout wrapper and no cancellation.
    async fn wait_for_confirmation(&self, tx_hash: &str)
        -> Result<TransactionReceipt, ProviderError>;

    /// Subscribe to provider notifications. Dropping the receiver
    /// unsubscribes.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_chain_is_recoverable() {
        let err = ProviderError::Rpc {
            code: UNRECOGNIZED_CHAIN,
            message: "Unrecognized chain ID".into(),
        };
        assert!(err.is_unrecognized_chain());
        assert_eq!(err.code(), Some(4902));
    }

    #[test]
    fn transport_has_no_code() {
        assert_eq!(ProviderError::Transport("boom".into()).code(), None);
        assert_eq!(ProviderError::Unavailable.code(), None);
    }
}
