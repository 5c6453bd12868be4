//! Transfer submission: plain value transfers and the logged contract call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};

use crate::error::{Result, WalletError};
use crate::provider::{TransactionReceipt, TransactionRequest, WalletProvider};

// Forwards the attached value to `recipient` and emits an indexed log entry.
sol! {
    function transferAndLog(address recipient) external payable;
}

/// Transfer-log contract deployed on Sepolia. Override with `--contract`.
pub const DEFAULT_TRANSFER_LOG_CONTRACT: &str = "0xbd6e267D816703Eb532C64a7c185dDcb8f4E1f00";

/// Validated transfer input: recipient and amount in wei.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    pub amount_wei: u128,
}

/// Builds and submits transfers through the provider's signer, waiting for
/// one confirmation. Holds an explicit in-flight flag so a second submission
/// is rejected instead of double-spending while one is still pending. No
/// failure class is retried.
pub struct TransferSubmitter {
    provider: Arc<dyn WalletProvider>,
    contract: Address,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the submission resolves, on every path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TransferSubmitter {
    pub fn new(provider: Arc<dyn WalletProvider>, contract: Address) -> Self {
        Self {
            provider,
            contract,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Address of the transfer-log contract used by `send_contract`.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// True while a submission is awaiting confirmation.
    pub fn submission_in_progress(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(WalletError::SubmissionInProgress);
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    /// Submit a native-currency transfer and wait for one confirmation.
    /// Failures are classified per provider error code and message.
    pub async fn send_native(&self, request: &TransferRequest) -> Result<TransactionReceipt> {
        let _guard = self.begin()?;
        self.submit(request.to, request.amount_wei, Vec::new()).await
    }

    /// Submit through `transferAndLog(address)` on the configured contract,
    /// with the amount attached as value. Failures are surfaced generically,
    /// with the cause preserved in the message and the log.
    pub async fn send_contract(&self, request: &TransferRequest) -> Result<TransactionReceipt> {
        let _guard = self.begin()?;
        let data = transferAndLogCall { recipient: request.to }.abi_encode();
        match self.submit(self.contract, request.amount_wei, data).await {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                log::warn!("contract transfer failed: {err}");
                Err(WalletError::Provider(format!("Contract transfer failed: {err}")))
            }
        }
    }

    async fn submit(
        &self,
        to: Address,
        value_wei: u128,
        data: Vec<u8>,
    ) -> Result<TransactionReceipt> {
        let accounts = self.provider.request_accounts().await?;
        let from = accounts
            .first()
            .copied()
            .ok_or_else(|| WalletError::Provider("The provider returned no accounts.".into()))?;

        let request = TransactionRequest {
            to,
            value_wei,
            data,
        };
        let tx_hash = self.provider.send_transaction(from, &request).await?;
        let receipt = self.provider.wait_for_confirmation(&tx_hash).await?;
        if !receipt.success {
            return Err(WalletError::Provider(format!(
                "Transaction {tx_hash} reverted on-chain."
            )));
        }
        Ok(receipt)
    }
}
