/// Command definitions and parsing for the wallet REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use alloy_primitives::Address;

use crate::display;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Connect to the wallet provider and load account + balance
    Connect,
    /// Show the native balance
    Balance,
    /// Show the connected account address
    Address,
    /// List the known networks
    Networks,
    /// Show or switch the active network: network [key]
    Network { key: Option<String> },
    /// Native transfer: transfer <address> <amount>
    Transfer { to: Address, amount_wei: u128 },
    /// Contract-mediated transfer: ctransfer <address> <amount>
    ContractTransfer { to: Address, amount_wei: u128 },
    /// Native-transfer history from the block explorer
    History,
    /// Contract-transfer history from the indexing service
    ContractHistory,
    /// Token swap placeholder: swap [amount]
    Swap { amount: Option<String> },
    /// Show session status
    Status,
    /// Print help
    Help { command: Option<String> },
    /// Exit the wallet
    Exit,
}

impl Command {
    /// Returns a confirmation prompt if this command should ask before executing.
    pub fn confirmation_prompt(&self) -> Option<String> {
        match self {
            Command::Transfer { to, amount_wei } => Some(format!(
                "Send {} to {to}?",
                display::format_balance(*amount_wei),
            )),
            Command::ContractTransfer { to, amount_wei } => Some(format!(
                "Send {} through the transfer-log contract to {to}?",
                display::format_balance(*amount_wei),
            )),
            _ => None,
        }
    }
}
