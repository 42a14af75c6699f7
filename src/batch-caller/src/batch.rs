use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::contracts::{Batch, ModelConsumer};
use crate::error::{Error, Result};

/// A single sub-call executed by the Batch precompile.
pub struct SubCall {
    pub to: Address,
    pub value: U256,
    pub call_data: Bytes,
    /// Gas forwarded to this sub-call. `None` forwards all remaining gas.
    pub gas_limit: Option<u64>,
}

/// Ordered list of sub-calls submitted as one atomic `batchAll` invocation.
#[derive(Default)]
pub struct BatchCall {
    calls: Vec<SubCall>,
}

impl BatchCall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: SubCall) {
        self.calls.push(call);
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Native value the outer transaction must carry: the sum of all
    /// sub-call values.
    pub fn total_value(&self) -> Result<U256> {
        self.calls
            .iter()
            .try_fold(U256::ZERO, |acc, call| acc.checked_add(call.value))
            .ok_or(Error::ValueOverflow)
    }

    /// ABI-encodes the batch as `batchAll` calldata.
    ///
    /// The argument arrays are all derived from the same sub-call list, so
    /// they always have matching lengths. When no sub-call sets a gas limit
    /// the `gasLimit` array is left empty and the precompile forwards all
    /// remaining gas to each sub-call.
    pub fn encode(&self) -> Result<Bytes> {
        if self.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let gas_limit = if self.calls.iter().all(|call| call.gas_limit.is_none()) {
            Vec::new()
        } else {
            self.calls
                .iter()
                .map(|call| call.gas_limit.unwrap_or(0))
                .collect()
        };

        let call = Batch::batchAllCall {
            to: self.calls.iter().map(|call| call.to).collect(),
            value: self.calls.iter().map(|call| call.value).collect(),
            callData: self.calls.iter().map(|call| call.call_data.clone()).collect(),
            gasLimit: gas_limit,
        };

        Ok(call.abi_encode().into())
    }
}

/// The batch of the consumer flow: pay for model usage (carrying `payment`),
/// then grant the user access to the data and model NFTs.
pub fn consumer_batch(
    consumer: Address,
    user: Address,
    payment: U256,
    call_gas: Option<u64>,
) -> BatchCall {
    let mut batch = BatchCall::new();
    batch.push(SubCall {
        to: consumer,
        value: payment,
        call_data: ModelConsumer::payForModelUsageCall {}.abi_encode().into(),
        gas_limit: call_gas,
    });
    batch.push(SubCall {
        to: consumer,
        value: U256::ZERO,
        call_data: ModelConsumer::grantAccessToDataNFTCall { user }
            .abi_encode()
            .into(),
        gas_limit: call_gas,
    });
    batch.push(SubCall {
        to: consumer,
        value: U256::ZERO,
        call_data: ModelConsumer::grantAccessToModelNFTCall { user }
            .abi_encode()
            .into(),
        gas_limit: call_gas,
    });
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumer() -> Address {
        Address::repeat_byte(0x11)
    }

    fn user() -> Address {
        Address::repeat_byte(0x22)
    }

    #[test]
    fn should_encode_consumer_batch_as_batch_all() {
        let payment = U256::from(100_000_000_000_000_000u128);
        let batch = consumer_batch(consumer(), user(), payment, None);
        assert_eq!(batch.len(), 3);

        let encoded = batch.encode().unwrap();
        assert_eq!(encoded[..4], Batch::batchAllCall::SELECTOR);

        let decoded = Batch::batchAllCall::abi_decode(&encoded, true).unwrap();
        assert_eq!(decoded.to, vec![consumer(); 3]);
        assert_eq!(decoded.value, vec![payment, U256::ZERO, U256::ZERO]);
        assert!(decoded.gasLimit.is_empty());

        assert_eq!(
            decoded.callData[0][..4],
            ModelConsumer::payForModelUsageCall::SELECTOR
        );
        let grant_data =
            ModelConsumer::grantAccessToDataNFTCall::abi_decode(&decoded.callData[1], true)
                .unwrap();
        assert_eq!(grant_data.user, user());
        let grant_model =
            ModelConsumer::grantAccessToModelNFTCall::abi_decode(&decoded.callData[2], true)
                .unwrap();
        assert_eq!(grant_model.user, user());
    }

    #[test]
    fn should_populate_gas_limit_array_when_call_gas_is_set() {
        let batch = consumer_batch(consumer(), user(), U256::ZERO, Some(50_000));
        let encoded = batch.encode().unwrap();

        let decoded = Batch::batchAllCall::abi_decode(&encoded, true).unwrap();
        assert_eq!(decoded.gasLimit, vec![50_000; 3]);
    }

    #[test]
    fn should_sum_sub_call_values() {
        let batch = consumer_batch(consumer(), user(), U256::from(7), None);
        assert_eq!(batch.total_value().unwrap(), U256::from(7));

        let mut batch = batch;
        batch.push(SubCall {
            to: consumer(),
            value: U256::from(5),
            call_data: Bytes::new(),
            gas_limit: None,
        });
        assert_eq!(batch.total_value().unwrap(), U256::from(12));
    }

    #[test]
    fn should_fail_on_value_overflow() {
        let mut batch = consumer_batch(consumer(), user(), U256::MAX, None);
        batch.push(SubCall {
            to: consumer(),
            value: U256::from(1),
            call_data: Bytes::new(),
            gas_limit: None,
        });
        assert!(matches!(batch.total_value(), Err(Error::ValueOverflow)));
    }

    #[test]
    fn should_refuse_to_encode_empty_batch() {
        let batch = BatchCall::new();
        assert!(matches!(batch.encode(), Err(Error::EmptyBatch)));
    }

    #[test]
    fn zero_payment_is_allowed() {
        let batch = consumer_batch(consumer(), user(), U256::ZERO, None);
        assert_eq!(batch.total_value().unwrap(), U256::ZERO);
        batch.encode().unwrap();
    }
}
