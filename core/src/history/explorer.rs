//! Block-explorer-backed history for native transfers.

use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{HistoryKind, HistoryRecord, HistoryStatus};
use crate::display;

/// Number of records kept from the explorer response.
pub const NATIVE_HISTORY_LIMIT: usize = 10;

/// Client for an etherscan-style account API
/// (`GET /api?module=account&action=txlist&address=...&sort=desc`).
pub struct ExplorerClient {
    http: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl ExplorerClient {
    pub fn new(api_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// Fetch the account's most recent native transactions, newest first.
    ///
    /// Never fails: transport errors, non-success payload status, and
    /// malformed payloads all yield an empty list, logged internally.
    pub async fn fetch(&self, account: Address) -> Vec<HistoryRecord> {
        let Some(base) = self.api_url.as_deref() else {
            log::debug!("no explorer API configured; skipping native history fetch");
            return Vec::new();
        };
        match self.try_fetch(base, account).await {
            Ok(records) => records,
            Err(err) => {
                log::warn!("explorer history fetch failed: {err:#}");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, base: &str, account: Address) -> Result<Vec<HistoryRecord>> {
        let mut query: Vec<(&str, String)> = vec![
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", account.to_string()),
            ("sort", "desc".to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        let url = format!("{}/api", base.trim_end_matches('/'));
        let payload: Value = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("explorer request failed")?
            .json()
            .await
            .context("explorer payload is not JSON")?;

        Ok(parse_payload(&payload))
    }
}

/// Item shape of the explorer's `result` array.
#[derive(Deserialize)]
struct ExplorerTx {
    hash: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    /// Wei as a decimal string.
    value: String,
    #[serde(rename = "timeStamp")]
    time_stamp: String,
    #[serde(rename = "txreceipt_status", default)]
    receipt_status: Option<String>,
}

/// Extract records from an explorer payload. Anything that does not look like
/// a success response (`status` "1" with an array `result`) yields nothing.
fn parse_payload(payload: &Value) -> Vec<HistoryRecord> {
    if payload.get("status").and_then(Value::as_str) != Some("1") {
        return Vec::new();
    }
    let Some(items) = payload.get("result").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(record_from_item)
        .take(NATIVE_HISTORY_LIMIT)
        .collect()
}

fn record_from_item(item: &Value) -> Option<HistoryRecord> {
    let tx: ExplorerTx = serde_json::from_value(item.clone()).ok()?;
    let wei: u128 = tx.value.parse().ok()?;
    let secs: i64 = tx.time_stamp.parse().ok()?;
    let status = match tx.receipt_status.as_deref() {
        Some("1") => HistoryStatus::Success,
        Some("0") => HistoryStatus::Failed,
        _ => HistoryStatus::Pending,
    };
    Some(HistoryRecord {
        id: tx.hash,
        from: tx.from,
        to: tx.to,
        amount_eth: display::wei_to_eth(wei),
        timestamp: display::format_timestamp(secs),
        status,
        kind: HistoryKind::Native,
    })
}
