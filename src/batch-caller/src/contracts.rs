use alloy::sol;

sol! {
    /// Network-level precompile executing a list of sub-calls atomically
    /// within one transaction.
    interface Batch {
        function batchAll(address[] memory to, uint256[] memory value, bytes[] memory callData, uint64[] memory gasLimit) external;
    }

    /// Consumer contract: usage payment plus NFT access grants.
    interface ModelConsumer {
        function payForModelUsage() external payable;
        function grantAccessToDataNFT(address user) external;
        function grantAccessToModelNFT(address user) external;
    }
}
