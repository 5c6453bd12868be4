#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("connect") => {
            "connect\n  Request account access from the wallet provider and load the\n  account, balance, and current network.".to_string()
        }
        Some("balance") | Some("bal") => {
            "balance\n  Show the native balance for the connected account.\n  Alias: bal".to_string()
        }
        Some("address") | Some("addr") => {
            "address\n  Show the connected account address.\n  Alias: addr".to_string()
        }
        Some("networks") => {
            "networks\n  List the known networks. The active one is marked with '*'.".to_string()
        }
        Some("network") | Some("net") => {
            "network [key]\n  Show the active network, or switch to another one.\n  If the provider does not know the chain yet it is asked to add it.\n  Example: network testnet\n  Alias: net".to_string()
        }
        Some("transfer") | Some("send") => {
            "transfer <address> <amount>\n  Send ETH to an address. Amount is in ETH (e.g. '0.01').\n  Waits for one confirmation, then refreshes the history.\n  Example: transfer 0xbd6e...1f00 0.01\n  Alias: send".to_string()
        }
        Some("ctransfer") | Some("csend") => {
            "ctransfer <address> <amount>\n  Send ETH through the transfer-log contract so the transfer is\n  indexed. Amount is in ETH and attached as value.\n  Alias: csend".to_string()
        }
        Some("history") | Some("txs") => {
            "history\n  Show recent native transfers for the connected account,\n  fetched from the block explorer.\n  Alias: txs".to_string()
        }
        Some("chistory") | Some("ctxs") => {
            "chistory\n  Show recent contract transfers from the indexing service.\n  Alias: ctxs".to_string()
        }
        Some("swap") => {
            "swap [amount]\n  Token swap. Not available yet.".to_string()
        }
        Some("status") => {
            "status\n  Show account, balance, active network, and node.".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit the wallet.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("No help for '{other}'. Type 'help' for a list of commands."),
        None => "\
Commands:
  connect                        Connect to the wallet provider
  balance (bal)                  Show native balance
  address (addr)                 Show account address
  networks                       List known networks
  network [key] (net)            Show or switch the active network
  transfer <address> <amount>    Send ETH (alias: send)
  ctransfer <address> <amount>   Send ETH via the transfer-log contract (alias: csend)
  history (txs)                  Native-transfer history
  chistory (ctxs)                Contract-transfer history
  swap [amount]                  Token swap (not available yet)
  status                         Show session status
  help [command]                 Show help
  exit (quit, q)                 Exit

Type 'help <command>' for details."
            .to_string(),
    }
}
