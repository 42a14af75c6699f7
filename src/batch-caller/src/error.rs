use alloy::primitives::utils::UnitsError;
use alloy::primitives::{B256, U256};
use alloy::signers::k256::ecdsa;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("signing key is not valid hex: {0}")]
    KeyEncoding(#[from] hex::FromHexError),
    #[error("invalid signing key: {0}")]
    SigningKey(#[from] ecdsa::Error),
    #[error("signer error: {0}")]
    Signer(#[from] alloy::signers::Error),
    #[error("invalid payment amount: {0}")]
    PaymentAmount(#[from] UnitsError),

    #[error("gas price {0} does not fit into u128")]
    GasPriceOverflow(U256),

    #[error("batch contains no calls")]
    EmptyBatch,
    #[error("batch value overflows U256")]
    ValueOverflow,
    #[error("insufficient balance: account holds {balance} wei, batch carries {required} wei")]
    InsufficientBalance { balance: U256, required: U256 },

    #[error("transaction not finalized {0}")]
    TransactionNotFinalized(B256),
    #[error("transaction {0} reverted")]
    TransactionReverted(B256),
}
