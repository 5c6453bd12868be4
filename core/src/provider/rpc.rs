//! JSON-RPC-backed provider: an HTTP client pointed at a node that manages
//! its own accounts (a dev node or wallet daemon).
//!
//! Chain switching is provider-local: the provider keeps a table of chains it
//! has been given and swaps the active endpoint, answering with code 4902 for
//! chains it has never seen — the same contract a browser wallet exposes via
//! `wallet_switchEthereumChain` / `wallet_addEthereumChain`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::{hex, Address};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use super::{
    ProviderError, ProviderEvent, TransactionReceipt, TransactionRequest, WalletProvider,
    UNRECOGNIZED_CHAIN,
};
use crate::registry::NetworkEntry;

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

struct ChainTable {
    active_chain_id: u64,
    rpc_urls: HashMap<u64, String>,
}

pub struct RpcProvider {
    http: reqwest::Client,
    chains: Mutex<ChainTable>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ProviderEvent>>>,
    next_id: AtomicU64,
}

impl RpcProvider {
    /// Create a provider seeded with one known chain, which becomes active.
    pub fn new(entry: &NetworkEntry) -> anyhow::Result<Self> {
        let url = entry
            .rpc_url()
            .ok_or_else(|| anyhow::anyhow!("Network '{}' has no RPC URL", entry.key))?
            .to_string();

        let mut rpc_urls = HashMap::new();
        rpc_urls.insert(entry.chain_id, url);

        Ok(Self {
            http: reqwest::Client::new(),
            chains: Mutex::new(ChainTable {
                active_chain_id: entry.chain_id,
                rpc_urls,
            }),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        })
    }

    fn active_url(&self) -> String {
        let chains = self.chains.lock().expect("chain table lock poisoned");
        chains.rpc_urls[&chains.active_chain_id].clone()
    }

    fn emit(&self, event: ProviderEvent) {
        let mut subs = self.subscribers.lock().expect("subscriber lock poisoned");
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let url = self.active_url();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        log::debug!("rpc {method} -> {url}");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(method, &e))?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("{method}: malformed response: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }
}

/// A refused connection on the account-access call means there is no wallet
/// endpoint at all; everything else stays a plain transport failure.
fn transport_error(method: &str, err: &reqwest::Error) -> ProviderError {
    if method == "eth_accounts" && err.is_connect() {
        return ProviderError::Unavailable;
    }
    ProviderError::Transport(format!("{method}: {err}"))
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

fn expect_str(value: &Value, what: &str) -> Result<String, ProviderError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Transport(format!("expected string {what}, got {value}")))
}

fn parse_hex_u64(s: &str) -> Result<u64, ProviderError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::Transport(format!("invalid hex quantity '{s}': {e}")))
}

fn parse_hex_u128(s: &str) -> Result<u128, ProviderError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u128::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::Transport(format!("invalid hex quantity '{s}': {e}")))
}

#[async_trait]
impl WalletProvider for RpcProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let result = self.rpc_call("eth_accounts", json!([])).await?;
        let raw = result
            .as_array()
            .ok_or_else(|| ProviderError::Transport("eth_accounts: expected array".into()))?;

        let mut accounts = Vec::with_capacity(raw.len());
        for item in raw {
            let s = expect_str(item, "account")?;
            let addr: Address = s
                .parse()
                .map_err(|e| ProviderError::Transport(format!("invalid account '{s}': {e}")))?;
            accounts.push(addr);
        }
        Ok(accounts)
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let result = self.rpc_call("eth_chainId", json!([])).await?;
        parse_hex_u64(&expect_str(&result, "chain id")?)
    }

    async fn balance(&self, address: Address) -> Result<u128, ProviderError> {
        let result = self
            .rpc_call("eth_getBalance", json!([address.to_string(), "latest"]))
            .await?;
        parse_hex_u128(&expect_str(&result, "balance")?)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        {
            let mut chains = self.chains.lock().expect("chain table lock poisoned");
            if !chains.rpc_urls.contains_key(&chain_id) {
                return Err(ProviderError::Rpc {
                    code: UNRECOGNIZED_CHAIN,
                    message: format!(
                        "Unrecognized chain ID 0x{chain_id:x}. Try adding the chain first."
                    ),
                });
            }
            chains.active_chain_id = chain_id;
        }
        self.emit(ProviderEvent::ChainChanged(chain_id));
        Ok(())
    }

    async fn add_chain(&self, entry: &NetworkEntry) -> Result<(), ProviderError> {
        let url = entry.rpc_url().ok_or_else(|| ProviderError::Rpc {
            code: -32602,
            message: format!("Chain '{}' has no RPC URL", entry.key),
        })?;
        {
            let mut chains = self.chains.lock().expect("chain table lock poisoned");
            chains.rpc_urls.insert(entry.chain_id, url.to_string());
            chains.active_chain_id = entry.chain_id;
        }
        self.emit(ProviderEvent::ChainChanged(entry.chain_id));
        Ok(())
    }

    async fn send_transaction(
        &self,
        from: Address,
        request: &TransactionRequest,
    ) -> Result<String, ProviderError> {
        let mut tx = json!({
            "from": from.to_string(),
            "to": request.to.to_string(),
            "value": format!("0x{:x}", request.value_wei),
        });
        if !request.data.is_empty() {
            tx["data"] = json!(format!("0x{}", hex::encode(&request.data)));
        }

        let result = self.rpc_call("eth_sendTransaction", json!([tx])).await?;
        expect_str(&result, "transaction hash")
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: &str,
    ) -> Result<TransactionReceipt, ProviderError> {
        loop {
            let result = self
                .rpc_call("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if !result.is_null() {
                let block_number = result
                    .get("blockNumber")
                    .and_then(|v| v.as_str())
                    .map(parse_hex_u64)
                    .transpose()?
                    .unwrap_or(0);
                let success = result
                    .get("status")
                    .and_then(|v| v.as_str())
                    .map(|s| s == "0x1")
                    .unwrap_or(true);
                return Ok(TransactionReceipt {
                    tx_hash: tx_hash.to_string(),
                    block_number,
                    success,
                });
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ProviderEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .push(tx);
        rx
    }
}
