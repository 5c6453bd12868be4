//! Indexer-backed history for contract transfers.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{HistoryKind, HistoryRecord, HistoryStatus};
use crate::display;

/// Fixed count requested from the indexer.
pub const CONTRACT_HISTORY_LIMIT: usize = 5;

// The query is account-agnostic: it returns the latest transfer logs across
// all senders, not just the connected account. Kept as observed in the
// deployed subgraph consumer.
const TRANSFER_LOGS_QUERY: &str = "{ transferLogs(first: 5) { id from to amount timestamp } }";

/// Client for a subgraph-style indexing query endpoint. The endpoint and
/// bearer token are supplied externally; without an endpoint every fetch is
/// empty.
pub struct IndexerClient {
    http: reqwest::Client,
    url: Option<String>,
    bearer_token: Option<String>,
}

impl IndexerClient {
    pub fn new(url: Option<String>, bearer_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            bearer_token,
        }
    }

    /// Fetch the latest contract-transfer logs, newest first.
    ///
    /// Never fails: transport and parse errors yield an empty list with
    /// internal logging only. The previous list is always fully replaced.
    pub async fn fetch(&self) -> Vec<HistoryRecord> {
        let Some(url) = self.url.as_deref() else {
            log::debug!("no indexer endpoint configured; skipping contract history fetch");
            return Vec::new();
        };
        match self.try_fetch(url).await {
            Ok(records) => records,
            Err(err) => {
                log::warn!("indexer history fetch failed: {err:#}");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<HistoryRecord>> {
        let body = json!({
            "query": TRANSFER_LOGS_QUERY,
            "operationName": "Subgraphs",
            "variables": {},
        });

        let mut request = self.http.post(url).json(&body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let payload: Value = request
            .send()
            .await
            .context("indexer request failed")?
            .json()
            .await
            .context("indexer payload is not JSON")?;

        Ok(parse_payload(&payload))
    }
}

#[derive(Deserialize)]
struct TransferLog {
    id: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    /// Wei as a decimal string.
    amount: String,
    /// Unix seconds as a decimal string.
    timestamp: String,
}

fn parse_payload(payload: &Value) -> Vec<HistoryRecord> {
    let Some(logs) = payload
        .get("data")
        .and_then(|d| d.get("transferLogs"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    logs.iter()
        .filter_map(record_from_log)
        .take(CONTRACT_HISTORY_LIMIT)
        .collect()
}

fn record_from_log(log: &Value) -> Option<HistoryRecord> {
    let entry: TransferLog = serde_json::from_value(log.clone()).ok()?;
    let wei: u128 = entry.amount.parse().ok()?;
    let secs: i64 = entry.timestamp.parse().ok()?;
    Some(HistoryRecord {
        id: entry.id,
        from: entry.from,
        to: entry.to,
        amount_eth: display::wei_to_eth(wei),
        timestamp: display::format_timestamp(secs),
        // Indexed events only exist for executed transactions
        status: HistoryStatus::Success,
        kind: HistoryKind::Contract,
    })
}
