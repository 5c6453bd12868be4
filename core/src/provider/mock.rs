//! Scriptable in-memory provider for unit tests. Records every call so tests
//! can assert on call counts and ordering.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    ProviderError, ProviderEvent, TransactionReceipt, TransactionRequest, WalletProvider,
    UNRECOGNIZED_CHAIN,
};
use crate::registry::NetworkEntry;

pub(crate) struct MockProvider {
    accounts: Mutex<Vec<Address>>,
    chain_id: Mutex<u64>,
    balance_wei: Mutex<u128>,
    registered_chains: Mutex<HashSet<u64>>,
    accounts_error: Mutex<Option<ProviderError>>,
    balance_error: Mutex<Option<ProviderError>>,
    send_error: Mutex<Option<ProviderError>>,
    add_chain_error: Mutex<Option<ProviderError>>,
    confirm_success: Mutex<bool>,
    next_hash: AtomicU64,
    calls: Mutex<Vec<String>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ProviderEvent>>>,
}

pub(crate) fn test_address(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

impl MockProvider {
    /// One account, 1 ETH, on the local dev chain.
    pub(crate) fn new() -> Self {
        Self {
            accounts: Mutex::new(vec![test_address(0x11)]),
            chain_id: Mutex::new(31337),
            balance_wei: Mutex::new(1_000_000_000_000_000_000),
            registered_chains: Mutex::new(HashSet::from([31337])),
            accounts_error: Mutex::new(None),
            balance_error: Mutex::new(None),
            send_error: Mutex::new(None),
            add_chain_error: Mutex::new(None),
            confirm_success: Mutex::new(true),
            next_hash: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_accounts(self, accounts: Vec<Address>) -> Self {
        *self.accounts.lock().unwrap() = accounts;
        self
    }

    pub(crate) fn with_chain_id(self, chain_id: u64) -> Self {
        *self.chain_id.lock().unwrap() = chain_id;
        self
    }

    pub(crate) fn with_balance(self, wei: u128) -> Self {
        *self.balance_wei.lock().unwrap() = wei;
        self
    }

    pub(crate) fn unavailable(self) -> Self {
        *self.accounts_error.lock().unwrap() = Some(ProviderError::Unavailable);
        self
    }

    pub(crate) fn fail_accounts(self, err: ProviderError) -> Self {
        *self.accounts_error.lock().unwrap() = Some(err);
        self
    }

    pub(crate) fn fail_send(self, err: ProviderError) -> Self {
        *self.send_error.lock().unwrap() = Some(err);
        self
    }

    pub(crate) fn fail_add_chain(self, err: ProviderError) -> Self {
        *self.add_chain_error.lock().unwrap() = Some(err);
        self
    }

    /// Confirmations report the transaction as reverted.
    pub(crate) fn with_reverted_receipt(self) -> Self {
        *self.confirm_success.lock().unwrap() = false;
        self
    }

    pub(crate) fn set_balance(&self, wei: u128) {
        *self.balance_wei.lock().unwrap() = wei;
    }

    pub(crate) fn set_balance_error(&self, err: Option<ProviderError>) {
        *self.balance_error.lock().unwrap() = err;
    }

    pub(crate) fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub(crate) fn set_chain_id(&self, chain_id: u64) {
        *self.chain_id.lock().unwrap() = chain_id;
    }

    pub(crate) fn emit(&self, event: ProviderEvent) {
        let mut subs = self.subscribers.lock().unwrap();
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("request_accounts");
        if let Some(err) = self.accounts_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record("chain_id");
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn balance(&self, _address: Address) -> Result<u128, ProviderError> {
        self.record("balance");
        if let Some(err) = self.balance_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(*self.balance_wei.lock().unwrap())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.record(format!("switch_chain:{chain_id}"));
        if !self.registered_chains.lock().unwrap().contains(&chain_id) {
            return Err(ProviderError::Rpc {
                code: UNRECOGNIZED_CHAIN,
                message: format!("Unrecognized chain ID 0x{chain_id:x}."),
            });
        }
        *self.chain_id.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn add_chain(&self, entry: &NetworkEntry) -> Result<(), ProviderError> {
        self.record(format!("add_chain:{}", entry.chain_id));
        if let Some(err) = self.add_chain_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.registered_chains.lock().unwrap().insert(entry.chain_id);
        *self.chain_id.lock().unwrap() = entry.chain_id;
        Ok(())
    }

    async fn send_transaction(
        &self,
        from: Address,
        request: &TransactionRequest,
    ) -> Result<String, ProviderError> {
        self.record(format!(
            "send_transaction:{from}:{}:{}:{}",
            request.to,
            request.value_wei,
            request.data.len()
        ));
        if let Some(err) = self.send_error.lock().unwrap().clone() {
            return Err(err);
        }
        let n = self.next_hash.fetch_add(1, Ordering::Relaxed);
        Ok(format!("0xmock{n:064}"))
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: &str,
    ) -> Result<TransactionReceipt, ProviderError> {
        self.record(format!("wait_for_confirmation:{tx_hash}"));
        Ok(TransactionReceipt {
            tx_hash: tx_hash.to_string(),
            block_number: 1,
            success: *self.confirm_success.lock().unwrap(),
        })
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}
