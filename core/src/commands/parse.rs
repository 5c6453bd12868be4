use alloy_primitives::Address;
use anyhow::{anyhow, bail, Context, Result};

use super::Command;
use crate::display;

fn parse_address(input: &str) -> Result<Address> {
    input
        .parse::<Address>()
        .map_err(|e| anyhow!("Invalid address '{input}': {e}"))
}

fn parse_amount(input: &str) -> Result<u128> {
    let amount = display::parse_eth_amount(input)
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("Invalid amount '{input}'"))?;
    if amount == 0 {
        bail!("Cannot send 0 ETH.");
    }
    Ok(amount)
}

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let mut parts = input.splitn(3, char::is_whitespace);
        let cmd = parts.next().unwrap().to_lowercase();
        let arg1 = parts.next().map(|s| s.trim());
        let arg2 = parts.next().map(|s| s.trim());

        match cmd.as_str() {
            "connect" => Ok(Command::Connect),

            "balance" | "bal" => Ok(Command::Balance),

            "address" | "addr" => Ok(Command::Address),

            "networks" => Ok(Command::Networks),

            "network" | "net" => Ok(Command::Network {
                key: arg1.map(|s| s.to_string()),
            }),

            "transfer" | "send" => {
                let addr_str = arg1.ok_or_else(|| {
                    anyhow!("Missing recipient. Usage: transfer <address> <amount>")
                })?;
                let amount_str = arg2.ok_or_else(|| {
                    anyhow!("Missing amount. Usage: transfer <address> <amount>")
                })?;
                Ok(Command::Transfer {
                    to: parse_address(addr_str)?,
                    amount_wei: parse_amount(amount_str)?,
                })
            }

            "ctransfer" | "csend" => {
                let addr_str = arg1.ok_or_else(|| {
                    anyhow!("Missing recipient. Usage: ctransfer <address> <amount>")
                })?;
                let amount_str = arg2.ok_or_else(|| {
                    anyhow!("Missing amount. Usage: ctransfer <address> <amount>")
                })?;
                Ok(Command::ContractTransfer {
                    to: parse_address(addr_str)?,
                    amount_wei: parse_amount(amount_str)?,
                })
            }

            "history" | "txs" => Ok(Command::History),

            "chistory" | "ctxs" => Ok(Command::ContractHistory),

            "swap" => Ok(Command::Swap {
                amount: arg1.map(|s| s.to_string()),
            }),

            "status" => Ok(Command::Status),

            "help" | "?" => Ok(Command::Help {
                command: arg1.map(|s| s.to_string()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}
