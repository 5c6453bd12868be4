use crate::Cli;
/// REPL shell — Reedline-based interactive wallet session.
use anyhow::Result;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use web3_wallet_core::commands::Command;
use web3_wallet_core::display;
use web3_wallet_core::service::WalletService;
use web3_wallet_core::session::SessionUpdate;

fn build_prompt(service: &WalletService) -> DefaultPrompt {
    let label = match service.account() {
        Some(account) => format!("[wallet {}]", display::short_address(&account)),
        None => "[wallet -]".to_string(),
    };
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(label),
        DefaultPromptSegment::Empty,
    )
}

/// Print what queued provider notifications did to the session.
fn announce_updates(updates: &[SessionUpdate]) {
    for update in updates {
        match update {
            SessionUpdate::Reconnected { account } => match account {
                Some(account) => println!("Account changed. Now connected as {account}."),
                None => println!("Account changed. No account connected."),
            },
            SessionUpdate::Reloaded { network_key } => {
                println!("Network changed. Session reloaded on '{network_key}'.");
            }
        }
    }
}

pub async fn run_repl(cli: &Cli) -> Result<()> {
    println!("Web3 Wallet v{}", env!("CARGO_PKG_VERSION"));

    let mut service = cli.build_service()?;
    println!("Network: {}", service.network_key());
    println!();

    // Connect on launch, like the page did on mount. A failure is surfaced
    // but leaves the shell usable; 'connect' retries.
    match service.connect().await {
        Ok(()) => {
            if let Some(account) = service.account() {
                println!("Connected. Account: {account}");
                println!("Balance: {}", display::format_balance(service.balance_wei()));
            }
        }
        Err(e) => eprintln!("Error: {e}"),
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let mut prompt = build_prompt(&service);

    let commands: Vec<String> = vec![
        "connect".into(),
        "balance".into(),
        "bal".into(),
        "address".into(),
        "addr".into(),
        "networks".into(),
        "network".into(),
        "net".into(),
        "transfer".into(),
        "send".into(),
        "ctransfer".into(),
        "csend".into(),
        "history".into(),
        "txs".into(),
        "chistory".into(),
        "ctxs".into(),
        "swap".into(),
        "status".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        if let Some(prompt_msg) = cmd.confirmation_prompt() {
                            if !prompt_confirm(&prompt_msg) {
                                println!("Cancelled.");
                                continue;
                            }
                        }
                        match cmd.execute(&mut service, cli.json).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }

                // Apply provider notifications queued during the command
                let updates = service.process_events().await;
                announce_updates(&updates);
                prompt = build_prompt(&service);
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}
