use std::sync::Arc;

use alloy_primitives::Address;

use crate::error::{Result, WalletError};
use crate::history::{ExplorerClient, HistoryRecord, IndexerClient};
use crate::provider::{TransactionReceipt, WalletProvider};
use crate::registry::{self, NetworkEntry};
use crate::session::{SessionUpdate, WalletSession};
use crate::transfer::{TransferRequest, TransferSubmitter};

/// Snapshot of the session for the `status` command.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub account: Option<Address>,
    pub balance_wei: u128,
    pub network: NetworkEntry,
    pub provider_chain_id: Option<u64>,
}

/// Facade tying the session, the transfer submitter, and both history
/// backends together. After every successful transfer the matching history
/// fetcher runs exactly once with the current account, and the balance is
/// refetched, regardless of what earlier fetches returned.
pub struct WalletService {
    session: WalletSession,
    submitter: TransferSubmitter,
    explorer: ExplorerClient,
    indexer: IndexerClient,
}

impl WalletService {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        initial_network_key: &str,
        contract: Address,
        explorer: ExplorerClient,
        indexer: IndexerClient,
    ) -> Self {
        Self {
            session: WalletSession::new(provider.clone(), initial_network_key),
            submitter: TransferSubmitter::new(provider, contract),
            explorer,
            indexer,
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.session.account()
    }

    pub fn balance_wei(&self) -> u128 {
        self.session.balance_wei()
    }

    pub fn network_key(&self) -> &str {
        self.session.network_key()
    }

    pub fn contract(&self) -> Address {
        self.submitter.contract()
    }

    pub async fn connect(&mut self) -> Result<()> {
        self.session.connect().await
    }

    pub async fn switch_network(&mut self, key: &str) -> Result<()> {
        self.session.switch_network(key).await
    }

    pub async fn refresh_balance(&mut self) -> Result<u128> {
        self.session.refresh_balance().await
    }

    /// Submit a native transfer, then refetch balance and explorer history.
    pub async fn send_native(
        &mut self,
        request: &TransferRequest,
    ) -> Result<(TransactionReceipt, Vec<HistoryRecord>)> {
        let account = self.session.account().ok_or(WalletError::NotConnected)?;
        let receipt = self.submitter.send_native(request).await?;
        self.refresh_after_transfer().await;
        let history = self.explorer.fetch(account).await;
        Ok((receipt, history))
    }

    /// Submit a contract transfer, then refetch balance and indexer history.
    pub async fn send_contract(
        &mut self,
        request: &TransferRequest,
    ) -> Result<(TransactionReceipt, Vec<HistoryRecord>)> {
        if self.session.account().is_none() {
            return Err(WalletError::NotConnected);
        }
        let receipt = self.submitter.send_contract(request).await?;
        self.refresh_after_transfer().await;
        let history = self.indexer.fetch().await;
        Ok((receipt, history))
    }

    async fn refresh_after_transfer(&mut self) {
        if let Err(e) = self.session.refresh_balance().await {
            log::warn!("balance refresh after transfer failed: {e}");
        }
    }

    /// Explorer-backed native-transfer history for the connected account.
    pub async fn native_history(&self) -> Result<Vec<HistoryRecord>> {
        let account = self.session.account().ok_or(WalletError::NotConnected)?;
        Ok(self.explorer.fetch(account).await)
    }

    /// Indexer-backed contract-transfer history. Account-agnostic by design
    /// of the upstream query.
    pub async fn contract_history(&self) -> Vec<HistoryRecord> {
        self.indexer.fetch().await
    }

    pub async fn status(&self) -> Result<StatusReport> {
        let network = registry::lookup(self.session.network_key())
            .ok_or_else(|| WalletError::UnknownNetwork(self.session.network_key().to_string()))?;
        let provider_chain_id = self.session.provider().chain_id().await.ok();
        Ok(StatusReport {
            account: self.session.account(),
            balance_wei: self.session.balance_wei(),
            network,
            provider_chain_id,
        })
    }

    /// Drain queued provider notifications; see `WalletSession::process_events`.
    pub async fn process_events(&mut self) -> Vec<SessionUpdate> {
        self.session.process_events().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::testserver::TestServer;
    use crate::provider::mock::{test_address, MockProvider};
    use crate::provider::ProviderError;
    use crate::transfer::DEFAULT_TRANSFER_LOG_CONTRACT;
    use serde_json::json;

    fn contract() -> Address {
        DEFAULT_TRANSFER_LOG_CONTRACT.parse().unwrap()
    }

    fn request() -> TransferRequest {
        TransferRequest {
            to: test_address(0x22),
            amount_wei: 10_000_000_000_000_000,
        }
    }

    fn service_with(
        mock: MockProvider,
        explorer: ExplorerClient,
        indexer: IndexerClient,
    ) -> (Arc<MockProvider>, WalletService) {
        let provider = Arc::new(mock);
        let service = WalletService::new(provider.clone(), "local", contract(), explorer, indexer);
        (provider, service)
    }

    fn explorer_body() -> String {
        json!({
            "status": "1",
            "result": [{
                "hash": "0x01",
                "from": "0xaaa",
                "to": "0xbbb",
                "value": "10000000000000000",
                "timeStamp": "1700000000",
                "txreceipt_status": "1",
            }],
        })
        .to_string()
    }

    fn indexer_body() -> String {
        json!({
            "data": {"transferLogs": [{
                "id": "log-1",
                "from": "0xaaa",
                "to": "0xbbb",
                "amount": "10000000000000000",
                "timestamp": "1700000000",
            }]},
        })
        .to_string()
    }

    #[tokio::test]
    async fn native_transfer_refreshes_history_exactly_once_with_account() {
        let server = TestServer::spawn(&explorer_body());
        let (_, mut service) = service_with(
            MockProvider::new(),
            ExplorerClient::new(Some(server.url.clone()), None),
            IndexerClient::new(None, None),
        );
        service.connect().await.unwrap();

        let (receipt, history) = service.send_native(&request()).await.unwrap();
        assert!(receipt.success);
        assert_eq!(history.len(), 1);
        assert_eq!(server.hits(), 1);
        // The refresh queries the connected account
        assert!(server
            .last_request()
            .contains(&test_address(0x11).to_string()));
    }

    #[tokio::test]
    async fn contract_transfer_refreshes_indexer_history_exactly_once() {
        let server = TestServer::spawn(&indexer_body());
        let (_, mut service) = service_with(
            MockProvider::new(),
            ExplorerClient::new(None, None),
            IndexerClient::new(Some(server.url.clone()), None),
        );
        service.connect().await.unwrap();

        let (receipt, history) = service.send_contract(&request()).await.unwrap();
        assert!(receipt.success);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "log-1");
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn failed_transfer_does_not_refresh_history() {
        let server = TestServer::spawn(&explorer_body());
        let (_, mut service) = service_with(
            MockProvider::new().fail_send(ProviderError::Rpc {
                code: 4001,
                message: "User rejected the request.".into(),
            }),
            ExplorerClient::new(Some(server.url.clone()), None),
            IndexerClient::new(None, None),
        );
        service.connect().await.unwrap();

        let err = service.send_native(&request()).await.unwrap_err();
        assert!(matches!(err, WalletError::UserRejected));
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn transfer_without_account_is_rejected_before_submission() {
        let (provider, mut service) = service_with(
            MockProvider::new(),
            ExplorerClient::new(None, None),
            IndexerClient::new(None, None),
        );
        let err = service.send_native(&request()).await.unwrap_err();
        assert!(matches!(err, WalletError::NotConnected));
        assert_eq!(provider.call_count("send_transaction"), 0);

        let err = service.send_contract(&request()).await.unwrap_err();
        assert!(matches!(err, WalletError::NotConnected));
        assert_eq!(provider.call_count("send_transaction"), 0);
    }

    #[tokio::test]
    async fn balance_is_refetched_after_transfer() {
        let (provider, mut service) = service_with(
            MockProvider::new().with_balance(100),
            ExplorerClient::new(None, None),
            IndexerClient::new(None, None),
        );
        service.connect().await.unwrap();
        assert_eq!(service.balance_wei(), 100);

        provider.set_balance(58);
        service.send_native(&request()).await.unwrap();
        assert_eq!(service.balance_wei(), 58);
    }

    #[tokio::test]
    async fn native_history_requires_account() {
        let (_, service) = service_with(
            MockProvider::new(),
            ExplorerClient::new(None, None),
            IndexerClient::new(None, None),
        );
        assert!(matches!(
            service.native_history().await.unwrap_err(),
            WalletError::NotConnected
        ));
        // Contract history is account-agnostic and always answers
        assert!(service.contract_history().await.is_empty());
    }

    #[tokio::test]
    async fn status_reports_active_network() {
        let (_, mut service) = service_with(
            MockProvider::new(),
            ExplorerClient::new(None, None),
            IndexerClient::new(None, None),
        );
        service.connect().await.unwrap();
        let status = service.status().await.unwrap();
        assert_eq!(status.network.key, "local");
        assert_eq!(status.provider_chain_id, Some(31337));
        assert_eq!(status.account, Some(test_address(0x11)));
    }
}
