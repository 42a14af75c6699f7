use std::time::Duration;

use alloy::primitives::B256;
use alloy::primitives::utils::format_ether;
use alloy::rpc::types::TransactionReceipt;
use alloy::signers::local::PrivateKeySigner;
use clap::{Args, Parser, Subcommand};
use evm_rpc_client::reqwest::ReqwestClient;
use evm_rpc_client::{Client, EvmRpcClient};

use crate::constant::{RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL};
use crate::error::{Error, Result};
use crate::transaction::{BatchOpts, SignArgs};

/// CLI tool for submitting atomic call batches through the Batch precompile
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct BatchCallerCli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an ETH Wallet
    GenerateWallet,

    /// Submit the batch transaction and wait for its receipt
    Submit(SubmitArgs),

    /// Sign the batch transaction and print the raw bytes without submitting
    Sign(SignArgs),
}

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub opts: BatchOpts,
}

impl SubmitArgs {
    pub async fn exec(&self) -> anyhow::Result<()> {
        let client = EvmRpcClient::new(ReqwestClient::new(self.opts.rpc_url.clone()));
        let wallet = get_wallet(&self.opts.signing_key)?;

        info!("preparing batch from {}", wallet.address());
        let prepared = self.opts.prepare(&client, &wallet).await?;
        info!(
            "batch of {} calls carrying {} ether total",
            prepared.calls,
            format_ether(prepared.total_value)
        );

        let tx_hash = client.send_raw_transaction(&prepared.envelope).await?;
        println!("Batch transaction sent: {tx_hash}");

        let receipt = wait_for_receipt(
            &client,
            tx_hash,
            RECEIPT_POLL_ATTEMPTS,
            RECEIPT_POLL_INTERVAL,
        )
        .await?;
        println!(
            "Batch transaction mined: {} (block {}, gas used {})",
            receipt.transaction_hash,
            receipt.block_number.unwrap_or_default(),
            receipt.gas_used
        );

        Ok(())
    }
}

/// Polls for the transaction receipt until it is available, the poll budget
/// runs out, or the transaction turns out reverted.
async fn wait_for_receipt<C: Client>(
    client: &EvmRpcClient<C>,
    hash: B256,
    attempts: u32,
    interval: Duration,
) -> anyhow::Result<TransactionReceipt> {
    for attempt in 1..=attempts {
        if let Some(receipt) = client.get_transaction_receipt(hash).await? {
            if !receipt.status() {
                return Err(Error::TransactionReverted(hash).into());
            }
            return Ok(receipt);
        }
        debug!("receipt for {hash} not available yet (attempt {attempt})");
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(Error::TransactionNotFinalized(hash).into())
}

/// Parse an existing wallet
pub fn get_wallet(signing_key: &str) -> Result<PrivateKeySigner> {
    let key_bytes = hex::decode(signing_key.trim_start_matches("0x"))?;
    let wallet = PrivateKeySigner::from_slice(&key_bytes)?;
    Ok(wallet)
}

/// generate a brand new wallet
pub fn generate_wallet() -> Result<PrivateKeySigner> {
    let wallet = PrivateKeySigner::random();
    let signer_hex = hex::encode(wallet.credential().to_bytes());
    let public_key_hex = hex::encode(wallet.credential().verifying_key().to_sec1_bytes());
    println!(
        "Wallet:\n  Private Key = {}\n  Public Key = {}\n  Address = {}",
        signer_hex,
        public_key_hex,
        wallet.address(),
    );
    Ok(wallet)
}
