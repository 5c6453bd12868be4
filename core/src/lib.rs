pub mod commands;
pub mod display;
pub mod error;
pub mod history;
pub mod provider;
pub mod registry;
pub mod service;
pub mod session;
pub mod transfer;

pub use commands::Command;
pub use error::WalletError;
pub use history::{ExplorerClient, HistoryKind, HistoryRecord, HistoryStatus, IndexerClient};
pub use provider::{
    ProviderError, ProviderEvent, RpcProvider, TransactionReceipt, TransactionRequest,
    WalletProvider,
};
pub use registry::{NativeCurrency, NetworkEntry};
pub use service::{StatusReport, WalletService};
pub use session::{SessionUpdate, WalletSession};
pub use transfer::{TransferRequest, TransferSubmitter, DEFAULT_TRANSFER_LOG_CONTRACT};

pub use alloy_primitives::Address;

/// Reject node URLs that are neither HTTPS nor loopback unless `allow_insecure`
/// is set.
pub fn validate_node_url(url: &str, allow_insecure: bool) -> anyhow::Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        let host = url
            .trim_start_matches("http://")
            .split(['/', ':'])
            .next()
            .unwrap_or("");
        if allow_insecure || host == "127.0.0.1" || host == "localhost" {
            return Ok(());
        }
        anyhow::bail!(
            "Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections."
        );
    }
    anyhow::bail!("Invalid node URL scheme: {url}\nExpected an https:// URL.");
}
