use anyhow::Result;

use super::help::help_text;
use super::Command;
use crate::display;
use crate::error::WalletError;
use crate::history::{HistoryKind, HistoryRecord, HistoryStatus};
use crate::registry;
use crate::service::WalletService;
use crate::transfer::TransferRequest;

fn history_json(records: &[HistoryRecord]) -> Vec<serde_json::Value> {
    records
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "from": r.from,
                "to": r.to,
                "amount_eth": r.amount_eth,
                "timestamp": r.timestamp,
                "status": match r.status {
                    HistoryStatus::Success => "success",
                    HistoryStatus::Failed => "failed",
                    HistoryStatus::Pending => "pending",
                },
                "kind": match r.kind {
                    HistoryKind::Native => "native",
                    HistoryKind::Contract => "contract",
                },
            })
        })
        .collect()
}

impl Command {
    /// Execute a command and return the output string.
    pub async fn execute(&self, service: &mut WalletService, json_output: bool) -> Result<String> {
        match self {
            Command::Connect => {
                service.connect().await?;
                let account = service
                    .account()
                    .ok_or_else(|| anyhow::anyhow!("connect succeeded without an account"))?;
                if json_output {
                    Ok(serde_json::json!({
                        "address": account.to_string(),
                        "balance_wei": service.balance_wei().to_string(),
                        "balance_eth": display::wei_to_eth(service.balance_wei()),
                        "network": service.network_key(),
                    })
                    .to_string())
                } else {
                    Ok(format!(
                        "Connected. Account: {account}\n  Balance: {}\n  Network: {}",
                        display::format_balance(service.balance_wei()),
                        service.network_key(),
                    ))
                }
            }

            Command::Balance => {
                let wei = service.refresh_balance().await?;
                if json_output {
                    Ok(display::format_balance_json(wei))
                } else {
                    Ok(display::format_balance(wei))
                }
            }

            Command::Address => {
                let account = service.account().ok_or(WalletError::NotConnected)?;
                if json_output {
                    Ok(display::format_address_json(&account.to_string()))
                } else {
                    Ok(account.to_string())
                }
            }

            Command::Networks => {
                let active = service.network_key().to_string();
                if json_output {
                    let list: Vec<serde_json::Value> = registry::entries()
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "key": e.key,
                                "chain_id": e.chain_id,
                                "display_name": e.display_name,
                                "active": e.key == active,
                            })
                        })
                        .collect();
                    Ok(serde_json::to_string_pretty(&list)?)
                } else {
                    let lines: Vec<String> = registry::entries()
                        .iter()
                        .map(|e| {
                            let marker = if e.key == active { "*" } else { " " };
                            format!(
                                "{marker} {:<8} chain {:<9} {}",
                                e.key, e.chain_id, e.display_name
                            )
                        })
                        .collect();
                    Ok(lines.join("\n"))
                }
            }

            Command::Network { key } => match key {
                None => {
                    let status = service.status().await?;
                    if json_output {
                        Ok(serde_json::json!({
                            "key": status.network.key,
                            "chain_id": status.network.chain_id,
                            "display_name": status.network.display_name,
                        })
                        .to_string())
                    } else {
                        Ok(format!(
                            "{} ({}, chain id {})",
                            status.network.key, status.network.display_name, status.network.chain_id,
                        ))
                    }
                }
                Some(key) => {
                    service.switch_network(key).await?;
                    let entry = registry::lookup(key)
                        .ok_or_else(|| anyhow::anyhow!("network '{key}' vanished from registry"))?;
                    if json_output {
                        Ok(serde_json::json!({
                            "switched_to": entry.key,
                            "chain_id": entry.chain_id,
                            "balance_wei": service.balance_wei().to_string(),
                        })
                        .to_string())
                    } else {
                        let mut out =
                            format!("Switched to {} ({}).", entry.key, entry.display_name);
                        if service.account().is_some() {
                            out.push_str(&format!(
                                "\n  Balance: {}",
                                display::format_balance(service.balance_wei())
                            ));
                        }
                        Ok(out)
                    }
                }
            },

            Command::Transfer { to, amount_wei } => {
                let request = TransferRequest {
                    to: *to,
                    amount_wei: *amount_wei,
                };
                let (receipt, history) = service.send_native(&request).await?;
                if json_output {
                    Ok(serde_json::json!({
                        "tx_hash": receipt.tx_hash,
                        "block_number": receipt.block_number,
                        "amount_wei": amount_wei.to_string(),
                        "amount_eth": display::wei_to_eth(*amount_wei),
                        "to": to.to_string(),
                        "history": history_json(&history),
                    })
                    .to_string())
                } else {
                    Ok(format!(
                        "Transfer confirmed!\n  Hash:   {}\n  Block:  {}\n  Amount: {} -> {to}\n\nRecent transfers:\n{}",
                        receipt.tx_hash,
                        receipt.block_number,
                        display::format_balance(*amount_wei),
                        display::format_history(&history),
                    ))
                }
            }

            Command::ContractTransfer { to, amount_wei } => {
                let request = TransferRequest {
                    to: *to,
                    amount_wei: *amount_wei,
                };
                let (receipt, history) = service.send_contract(&request).await?;
                if json_output {
                    Ok(serde_json::json!({
                        "tx_hash": receipt.tx_hash,
                        "block_number": receipt.block_number,
                        "amount_wei": amount_wei.to_string(),
                        "amount_eth": display::wei_to_eth(*amount_wei),
                        "to": to.to_string(),
                        "contract": service.contract().to_string(),
                        "history": history_json(&history),
                    })
                    .to_string())
                } else {
                    Ok(format!(
                        "Contract transfer confirmed!\n  Hash:   {}\n  Block:  {}\n  Amount: {} -> {to} (via {})\n\nContract transfers:\n{}",
                        receipt.tx_hash,
                        receipt.block_number,
                        display::format_balance(*amount_wei),
                        service.contract(),
                        display::format_history(&history),
                    ))
                }
            }

            Command::History => {
                let records = service.native_history().await?;
                if json_output {
                    Ok(serde_json::to_string_pretty(&history_json(&records))?)
                } else {
                    Ok(display::format_history(&records))
                }
            }

            Command::ContractHistory => {
                let records = service.contract_history().await;
                if json_output {
                    Ok(serde_json::to_string_pretty(&history_json(&records))?)
                } else {
                    Ok(display::format_history(&records))
                }
            }

            Command::Swap { .. } => Ok("Token swap is not available yet.".to_string()),

            Command::Status => {
                let status = service.status().await?;
                if json_output {
                    Ok(serde_json::json!({
                        "account": status.account.map(|a| a.to_string()),
                        "balance_wei": status.balance_wei.to_string(),
                        "balance_eth": display::wei_to_eth(status.balance_wei),
                        "network": status.network.key,
                        "chain_id": status.network.chain_id,
                        "provider_chain_id": status.provider_chain_id,
                    })
                    .to_string())
                } else {
                    Ok(display::format_status(&status))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),
        }
    }
}
