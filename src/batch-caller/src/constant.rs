use std::time::Duration;

use alloy::primitives::{Address, address};

/// The Batch precompile lives at the same fixed address on every
/// Moonbeam-family network.
pub const BATCH_PRECOMPILE: Address = address!("0000000000000000000000000000000000000808");

/// Default JSON-RPC endpoint (Moonbase Alpha testnet)
pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.moonbeam.network";

/// Default GAS LIMIT for the outer transaction
pub const DEFAULT_GAS_LIMIT: u64 = 30_000_000;

/// Interval between receipt polls after submission
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Number of receipt polls before giving up on the transaction
pub const RECEIPT_POLL_ATTEMPTS: u32 = 40;
