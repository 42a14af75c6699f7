use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::BlockNumberOrTag;
use alloy::network::TxSignerSync;
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, TxKind, U256};
use alloy::signers::local::PrivateKeySigner;
use clap::Args;
use evm_rpc_client::{Client, EvmRpcClient};
use evm_rpc_client::reqwest::ReqwestClient;

use crate::batch::{BatchCall, consumer_batch};
use crate::cli::get_wallet;
use crate::constant::{BATCH_PRECOMPILE, DEFAULT_GAS_LIMIT, DEFAULT_RPC_URL};
use crate::error::{Error, Result};

/// Options shared by every command that assembles the batch transaction.
#[derive(Args)]
pub struct BatchOpts {
    /// JSON-RPC endpoint of the target network
    #[arg(short = 'u', long = "rpc-url", default_value_t = String::from(DEFAULT_RPC_URL))]
    pub rpc_url: String,

    /// wallet signing key
    #[arg(short = 'k', long = "key")]
    pub signing_key: String,

    /// Address of the deployed consumer contract
    #[arg(short = 'c', long = "consumer")]
    pub consumer: Address,

    /// Address granted access to the data and model NFTs
    #[arg(long = "user")]
    pub user: Address,

    /// Native value attached to the usage payment, in ether units
    #[arg(short = 'p', long = "payment", default_value = "0.1")]
    pub payment: String,

    /// Gas limit of the outer transaction
    #[arg(short = 'g', long = "gas")]
    pub gas: Option<u64>,

    /// Gas price in wei; queried from the node when missing
    #[arg(short = 'l', long = "gas-price")]
    pub gas_price: Option<u128>,

    /// Nonce; queried from the node when missing
    #[arg(short = 'n', long = "nonce")]
    pub nonce: Option<u64>,

    /// Gas forwarded to each sub-call; all remaining gas when missing
    #[arg(long = "call-gas")]
    pub call_gas: Option<u64>,
}

/// A signed batch transaction ready for submission.
#[derive(Debug)]
pub struct PreparedBatch {
    pub envelope: TxEnvelope,
    pub total_value: U256,
    pub calls: usize,
}

impl BatchOpts {
    /// Resolves missing parameters from the node, runs the balance preflight
    /// and signs the batch transaction.
    pub async fn prepare<C: Client>(
        &self,
        client: &EvmRpcClient<C>,
        wallet: &PrivateKeySigner,
    ) -> anyhow::Result<PreparedBatch> {
        let payment = parse_ether(&self.payment).map_err(Error::PaymentAmount)?;
        let batch = consumer_batch(self.consumer, self.user, payment, self.call_gas);
        let total_value = batch.total_value()?;
        let calls = batch.len();
        let address = wallet.address();

        let chain_id = client.get_chain_id().await?;
        debug!("chain id: {chain_id}");

        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => {
                client
                    .get_transaction_count(address, BlockNumberOrTag::Pending)
                    .await?
            }
        };
        let gas_price = match self.gas_price {
            Some(price) => price,
            None => {
                let price = client.gas_price().await?;
                price
                    .try_into()
                    .map_err(|_| Error::GasPriceOverflow(price))?
            }
        };
        debug!("nonce: {nonce}, gas price: {gas_price}");

        // Covers the carried value only; gas is paid on top of it.
        let balance = client.get_balance(address, BlockNumberOrTag::Latest).await?;
        if balance < total_value {
            return Err(Error::InsufficientBalance {
                balance,
                required: total_value,
            }
            .into());
        }

        let envelope = BatchTransactionBuilder {
            wallet,
            batch,
            chain_id,
            nonce,
            gas_price,
            gas_limit: self.gas.unwrap_or(DEFAULT_GAS_LIMIT),
        }
        .build()?;

        Ok(PreparedBatch {
            envelope,
            total_value,
            calls,
        })
    }
}

pub struct BatchTransactionBuilder<'a> {
    pub wallet: &'a PrivateKeySigner,
    pub batch: BatchCall,
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
}

impl<'a> BatchTransactionBuilder<'a> {
    /// Builds a signed legacy transaction targeting the Batch precompile.
    pub fn build(self) -> Result<TxEnvelope> {
        let input = self.batch.encode()?;
        let value = self.batch.total_value()?;

        let mut transaction = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(BATCH_PRECOMPILE),
            value,
            input,
        };

        let signature = self.wallet.sign_transaction_sync(&mut transaction)?;

        Ok(TxEnvelope::Legacy(transaction.into_signed(signature)))
    }
}

#[derive(Args)]
pub struct SignArgs {
    #[command(flatten)]
    pub opts: BatchOpts,
}

impl SignArgs {
    /// Builds and signs the batch transaction, printing the raw bytes
    /// instead of submitting them.
    pub async fn exec(&self) -> anyhow::Result<()> {
        use alloy::eips::eip2718::Encodable2718;

        let client = EvmRpcClient::new(ReqwestClient::new(self.opts.rpc_url.clone()));
        let wallet = get_wallet(&self.opts.signing_key)?;
        let prepared = self.opts.prepare(&client, &wallet).await?;

        println!("Transaction hash: {}", prepared.envelope.tx_hash());
        println!(
            "Signed transaction: 0x{}",
            hex::encode(prepared.envelope.encoded_2718())
        );

        Ok(())
    }
}
