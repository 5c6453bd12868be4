/// Output formatting — ETH denomination conversion and display helpers.
///
/// The native currency uses 18 decimal places. 1 ETH = 10^18 wei.
use alloy_primitives::Address;

use crate::history::{HistoryRecord, HistoryStatus};
use crate::service::StatusReport;

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Convert wei to a human-readable ETH string with trailing zeros trimmed.
/// Examples: 10_000_000_000_000_000 -> "0.01", 10^18 -> "1.0"
#[must_use]
pub fn wei_to_eth(wei: u128) -> String {
    let whole = wei / WEI_PER_ETH;
    let frac = wei % WEI_PER_ETH;
    let frac_str = format!("{frac:018}");
    let trimmed = frac_str.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Format a balance for display.
#[must_use]
pub fn format_balance(wei: u128) -> String {
    format!("{} ETH", wei_to_eth(wei))
}

/// Parse a human-readable ETH amount string into wei.
/// Accepts: "1.5" -> 1.5 * 10^18, "1" -> 10^18, "0.01" -> 10^16
#[must_use = "parsing result should be checked"]
pub fn parse_eth_amount(input: &str) -> Result<u128, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }

    if input.starts_with('-') {
        return Err("Amount must be positive".to_string());
    }

    // Bare integers are whole ETH units
    if let Ok(eth) = input.parse::<u128>() {
        return eth
            .checked_mul(WEI_PER_ETH)
            .ok_or_else(|| "Amount too large".to_string());
    }

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() > 2 {
        return Err("Invalid amount format. Use ETH units like '1.5' or '0.01'.".to_string());
    }

    let whole: u128 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid whole part: '{}'", parts[0]))?;

    let frac_wei = if parts.len() == 2 {
        let frac_str = parts[1];
        if frac_str.is_empty() {
            // Trailing dot: "1." is treated as "1.0"
            0
        } else if frac_str.len() > 18 {
            return Err("Too many decimal places. ETH supports up to 18.".to_string());
        } else {
            // Pad to 18 digits
            let padded = format!("{frac_str:0<18}");
            padded
                .parse::<u128>()
                .map_err(|_| format!("Invalid fractional part: '{frac_str}'"))?
        }
    } else {
        0
    };

    whole
        .checked_mul(WEI_PER_ETH)
        .and_then(|w| w.checked_add(frac_wei))
        .ok_or_else(|| "Amount too large".to_string())
}

/// Shorten a checksummed address for prompts: "0x1234...abcd".
#[must_use]
pub fn short_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

/// Render a unix timestamp (seconds) as local time.
#[must_use]
pub fn format_timestamp(secs: i64) -> String {
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(utc) => utc
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => secs.to_string(),
    }
}

/// Format a list of history records for display.
#[must_use]
pub fn format_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut lines = Vec::with_capacity(records.len());
    for rec in records {
        let status = match rec.status {
            HistoryStatus::Success => "ok",
            HistoryStatus::Failed => "failed",
            HistoryStatus::Pending => "pending",
        };
        let from = rec.from.as_deref().unwrap_or("-");
        let to = rec.to.as_deref().unwrap_or("-");
        lines.push(format!(
            "{}  {from} -> {to}  {} ETH  {status:<7}  {}",
            rec.timestamp, rec.amount_eth, rec.id,
        ));
    }
    lines.join("\n")
}

/// Format the session status for display.
#[must_use]
pub fn format_status(status: &StatusReport) -> String {
    let account = match &status.account {
        Some(addr) => addr.to_string(),
        None => "(not connected)".to_string(),
    };
    let chain = match status.provider_chain_id {
        Some(id) => id.to_string(),
        None => "?".to_string(),
    };
    format!(
        "  Account:  {account}\n  Balance:  {}\n  Network:  {} ({}, chain id {})\n  Node:     {}\n  Provider chain id: {chain}",
        format_balance(status.balance_wei),
        status.network.key,
        status.network.display_name,
        status.network.chain_id,
        status.network.rpc_url().unwrap_or("-"),
    )
}

/// Format balance as JSON.
#[must_use]
pub fn format_balance_json(wei: u128) -> String {
    serde_json::json!({
        "balance_wei": wei.to_string(),
        "balance_eth": wei_to_eth(wei),
    })
    .to_string()
}

/// Format address as JSON.
#[must_use]
pub fn format_address_json(address: &str) -> String {
    serde_json::json!({
        "address": address,
    })
    .to_string()
}
