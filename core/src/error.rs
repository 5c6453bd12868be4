//! Domain error type for wallet operations.

use thiserror::Error;

use crate::provider::{self, ProviderError};

/// Typed error enum for wallet operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No injected provider / reachable wallet endpoint.
    #[error("No wallet provider found. Install a wallet extension or start a local node, then retry.")]
    ProviderUnavailable,

    /// The user rejected the request in the wallet (EIP-1193 code 4001).
    #[error("The request was rejected in the wallet.")]
    UserRejected,

    /// The wallet already has a request awaiting user action (code -32002).
    #[error("The wallet already has a pending request. Resolve it in the wallet and try again.")]
    PendingRequest,

    /// Sender balance cannot cover value plus gas.
    #[error("Insufficient funds for this transfer.")]
    InsufficientFunds,

    /// The node rejected the transaction nonce.
    #[error("Stale nonce. Reconnect the session and try again.")]
    StaleNonce,

    /// Network key not present in the registry.
    #[error("Unknown network '{0}'. Use 'networks' to list the available keys.")]
    UnknownNetwork(String),

    /// A second submission was attempted while one is still pending.
    #[error("A transfer is already in progress. Wait for it to finish.")]
    SubmissionInProgress,

    /// Operation requires a connected account.
    #[error("No account connected. Run 'connect' first.")]
    NotConnected,

    /// Unclassified provider or transport failure, carrying the original message.
    #[error("{0}")]
    Provider(String),

    /// Invalid user input (address, amount).
    #[error("{0}")]
    InvalidInput(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Classify a provider failure into the user-facing taxonomy.
///
/// Error codes win over message sniffing: 4001 is user rejection even when the
/// message happens to mention "nonce".
impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable => WalletError::ProviderUnavailable,
            ProviderError::Rpc { code, message } => match code {
                provider::USER_REJECTED_REQUEST => WalletError::UserRejected,
                provider::REQUEST_ALREADY_PENDING => WalletError::PendingRequest,
                _ => {
                    let lower = message.to_lowercase();
                    if lower.contains("insufficient funds") {
                        WalletError::InsufficientFunds
                    } else if lower.contains("nonce") {
                        WalletError::StaleNonce
                    } else {
                        WalletError::Provider(message)
                    }
                }
            },
            ProviderError::Transport(message) => WalletError::Provider(message),
        }
    }
}

/// Alias for `std::result::Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;
