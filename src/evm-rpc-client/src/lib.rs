use std::future::Future;
use std::pin::Pin;

use alloy::consensus::TxEnvelope;
use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256, U64, U256};
use alloy::rpc::types::TransactionReceipt;
use anyhow::Context;
pub use jsonrpc_core::{
    Call, Failure, Id, MethodCall, Output, Params, Request, Response, Success, Version,
};
use serde::de::DeserializeOwned;

#[cfg(feature = "reqwest")]
pub mod reqwest;

const ETH_CHAIN_ID_METHOD: &str = "eth_chainId";
const ETH_GAS_PRICE_METHOD: &str = "eth_gasPrice";
const ETH_GET_BALANCE_METHOD: &str = "eth_getBalance";
const ETH_GET_TRANSACTION_COUNT_METHOD: &str = "eth_getTransactionCount";
const ETH_GET_TRANSACTION_RECEIPT_METHOD: &str = "eth_getTransactionReceipt";
const ETH_SEND_RAW_TRANSACTION_METHOD: &str = "eth_sendRawTransaction";

macro_rules! make_params_array {
    ($($items:expr),*) => {
        Params::Array(vec![$(serde_json::to_value($items)?, )*])
    };
}

/// A client for interacting with an Ethereum node over JSON-RPC.
#[derive(Clone)]
pub struct EvmRpcClient<C: Client> {
    client: C,
}

impl<C: Client> EvmRpcClient<C> {
    /// Create a new client over the given transport.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Returns chain id
    pub async fn get_chain_id(&self) -> anyhow::Result<u64> {
        self.single_request::<U64>(
            ETH_CHAIN_ID_METHOD.to_string(),
            Params::Array(vec![]),
            Id::Str(ETH_CHAIN_ID_METHOD.to_string()),
        )
        .await
        .map(|v| v.to())
    }

    /// Returns the gas price
    pub async fn gas_price(&self) -> anyhow::Result<U256> {
        self.single_request(
            ETH_GAS_PRICE_METHOD.to_string(),
            make_params_array!(),
            Id::Str(ETH_GAS_PRICE_METHOD.to_string()),
        )
        .await
    }

    /// Returns balance of the address.
    pub async fn get_balance(
        &self,
        address: Address,
        block: BlockNumberOrTag,
    ) -> anyhow::Result<U256> {
        self.single_request(
            ETH_GET_BALANCE_METHOD.to_string(),
            make_params_array!(address, block),
            Id::Str(ETH_GET_BALANCE_METHOD.to_string()),
        )
        .await
    }

    /// Returns transaction count of the address.
    pub async fn get_transaction_count(
        &self,
        address: Address,
        block: BlockNumberOrTag,
    ) -> anyhow::Result<u64> {
        self.single_request::<U64>(
            ETH_GET_TRANSACTION_COUNT_METHOD.to_string(),
            make_params_array!(address, block),
            Id::Str(ETH_GET_TRANSACTION_COUNT_METHOD.to_string()),
        )
        .await
        .map(|v| v.to())
    }

    /// Returns the receipt of a transaction, or `None` while it is not mined.
    pub async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> anyhow::Result<Option<TransactionReceipt>> {
        self.single_request(
            ETH_GET_TRANSACTION_RECEIPT_METHOD.to_string(),
            make_params_array!(hash),
            Id::Str(hash.to_string()),
        )
        .await
    }

    /// Sends raw transaction and returns the transaction hash
    pub async fn send_raw_transaction(&self, transaction: &TxEnvelope) -> anyhow::Result<B256> {
        use alloy::eips::eip2718::Encodable2718;
        self.send_raw_transaction_bytes(&transaction.encoded_2718())
            .await
    }

    /// Sends raw transaction and takes the arguments in bytes.
    pub async fn send_raw_transaction_bytes(&self, transaction: &[u8]) -> anyhow::Result<B256> {
        let transaction = format!("0x{}", hex::encode(transaction));
        self.single_request(
            ETH_SEND_RAW_TRANSACTION_METHOD.to_string(),
            make_params_array!(transaction),
            Id::Str(ETH_SEND_RAW_TRANSACTION_METHOD.to_string()),
        )
        .await
    }

    /// Performs a request.
    pub async fn request(&self, request: Request) -> anyhow::Result<Response> {
        self.client.send_rpc_request(request).await
    }

    /// Performs a single request.
    pub async fn single_request<R: DeserializeOwned>(
        &self,
        method: String,
        params: Params,
        // For some reason some JSON RPC services fail to parse requests with null id
        id: Id,
    ) -> anyhow::Result<R> {
        let request = Request::Single(Call::MethodCall(MethodCall {
            jsonrpc: Some(Version::V2),
            method,
            params,
            id,
        }));

        let response = self.client.send_rpc_request(request).await?;

        match response {
            Response::Single(response) => match response {
                Output::Success(result) => {
                    serde_json::from_value(result.result).context("failed to deserialize value")
                }
                Output::Failure(err) => Err(anyhow::format_err!("{err:?}")),
            },
            Response::Batch(_) => Err(anyhow::format_err!("unexpected response type: batch")),
        }
    }
}

pub trait Client: Clone + Send + Sync {
    /// Send RPC request.
    fn send_rpc_request(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Response>> + Send>>;
}
