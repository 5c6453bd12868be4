mod repl;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use web3_wallet_core::commands::Command;
use web3_wallet_core::history::{ExplorerClient, IndexerClient};
use web3_wallet_core::registry::{self, NetworkEntry};
use web3_wallet_core::service::WalletService;
use web3_wallet_core::transfer::DEFAULT_TRANSFER_LOG_CONTRACT;
use web3_wallet_core::{validate_node_url, Address, RpcProvider};

#[derive(Parser)]
#[command(name = "web3-wallet", about = "Demo wallet REPL for EVM networks", version)]
pub(crate) struct Cli {
    /// Network key to start on ("local" or "testnet")
    #[arg(long, default_value = "local")]
    network: String,

    /// Custom JSON-RPC node URL (overrides the network's default)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Allow connecting to non-HTTPS node URLs
    #[arg(long)]
    insecure: bool,

    /// Block-explorer API key for native-transfer history
    #[arg(long, env = "EXPLORER_API_KEY")]
    explorer_api_key: Option<String>,

    /// Indexing-service query endpoint for contract-transfer history
    #[arg(long, env = "INDEXER_URL")]
    indexer_url: Option<String>,

    /// Bearer token for the indexing service
    #[arg(long, env = "INDEXER_TOKEN")]
    indexer_token: Option<String>,

    /// Address of the transfer-log contract
    #[arg(long, env = "TRANSFER_LOG_CONTRACT")]
    contract: Option<String>,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// The startup network, with the RPC URL override applied.
    fn network_entry(&self) -> Result<NetworkEntry> {
        let mut entry = registry::lookup(&self.network).ok_or_else(|| {
            let keys: Vec<String> = registry::entries().into_iter().map(|e| e.key).collect();
            anyhow::anyhow!(
                "Unknown network '{}'. Available: {}",
                self.network,
                keys.join(", ")
            )
        })?;
        if let Some(url) = &self.rpc_url {
            validate_node_url(url, self.insecure)?;
            entry.rpc_urls = vec![url.clone()];
        }
        Ok(entry)
    }

    fn contract_address(&self) -> Result<Address> {
        let raw = self
            .contract
            .as_deref()
            .unwrap_or(DEFAULT_TRANSFER_LOG_CONTRACT);
        raw.parse()
            .map_err(|e| anyhow::anyhow!("Invalid contract address '{raw}': {e}"))
    }

    fn build_service(&self) -> Result<WalletService> {
        let entry = self.network_entry()?;
        let provider = RpcProvider::new(&entry).context("Failed to create provider")?;
        let explorer = ExplorerClient::new(
            entry.explorer_api_url().map(str::to_string),
            self.explorer_api_key.clone(),
        );
        let indexer = IndexerClient::new(self.indexer_url.clone(), self.indexer_token.clone());
        Ok(WalletService::new(
            Arc::new(provider),
            &entry.key,
            self.contract_address()?,
            explorer,
            indexer,
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(cmd_str) = &cli.cmd {
        run_oneshot(&cli, cmd_str).await
    } else {
        repl::run_repl(&cli).await
    }
}

async fn run_oneshot(cli: &Cli, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    let mut service = cli.build_service()?;
    // The session is connected on startup, as the interactive shell does on
    // launch. Commands that need no account still work if this fails.
    if let Err(e) = service.connect().await {
        if command == Command::Connect {
            bail!("{e}");
        }
        log::warn!("connect on startup failed: {e}");
    }

    let output = command.execute(&mut service, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
